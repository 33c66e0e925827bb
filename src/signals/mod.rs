// Signal construction
// Detectors hand in candidates; the generator decides which become signals

pub mod confidence;
pub mod generator;
pub mod precision;

pub use confidence::{blend_confidence, chart_pattern_confidence, Confluence};
pub use generator::{MarketSnapshot, SignalGenerator};
pub use precision::price_precision;

use crate::models::Bias;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a candidate's confidence becomes the signal's confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceRule {
    /// Base confidence capped by the market confluence blend
    Blended,
    /// Confidence already scored by the detector, used as is
    Scored,
}

/// A detector's request to emit a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub pattern: String,
    pub bias: Bias,
    /// Start time of the candle or swing the pattern is anchored to
    pub origin: DateTime<Utc>,
    pub base_confidence: u32,
    pub rule: ConfidenceRule,
}

impl SignalCandidate {
    /// Smart-money event, blended with market confluence
    pub fn smc(pattern: &str, bias: Bias, origin: DateTime<Utc>, base_confidence: u32) -> Self {
        Self {
            pattern: pattern.to_string(),
            bias,
            origin,
            base_confidence,
            rule: ConfidenceRule::Blended,
        }
    }

    /// Chart pattern with its own confidence score
    pub fn chart(pattern: &str, bias: Bias, origin: DateTime<Utc>, confidence: u32) -> Self {
        Self {
            pattern: pattern.to_string(),
            bias,
            origin,
            base_confidence: confidence,
            rule: ConfidenceRule::Scored,
        }
    }
}
