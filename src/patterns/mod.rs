// Chart-pattern detectors
// Geometric patterns over peak/trough lists of a fixed recent window

pub mod extrema;
pub mod flags;
pub mod geometry;
pub mod history;
pub mod reversal;

pub use extrema::{find_peaks, find_troughs};
pub use flags::detect_flag;
pub use geometry::{detect_channel, detect_triangles, detect_wedges};
pub use history::PatternLog;
pub use reversal::{detect_double_top_bottom, detect_head_and_shoulders};

use crate::models::{Bias, Candle, Timeframe};
use crate::settings::PatternConfig;
use crate::signals::{chart_pattern_confidence, SignalCandidate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw detector hit
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub name: &'static str,
    pub bias: Bias,
    /// Neckline or reference level when the pattern defines one
    pub level: Option<f64>,
}

impl PatternMatch {
    pub fn new(name: &'static str, bias: Bias) -> Self {
        Self { name, bias, level: None }
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = Some(level);
        self
    }
}

/// Recorded chart pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPattern {
    pub name: String,
    pub bias: Bias,
    pub timeframe: Timeframe,
    pub confidence: u32,
    /// Close of the newest candle when detected
    pub price: f64,
    pub level: Option<f64>,
    pub detected_at: DateTime<Utc>,
}

/// Run every chart-pattern detector over `window`, in a fixed order
pub fn detect_chart_patterns(window: &[Candle]) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    found.extend(detect_triangles(window));
    found.extend(detect_head_and_shoulders(window, false));
    found.extend(detect_head_and_shoulders(window, true));
    found.extend(detect_double_top_bottom(window, true));
    found.extend(detect_double_top_bottom(window, false));
    found.extend(detect_wedges(window));
    found.extend(detect_flag(window, true));
    found.extend(detect_flag(window, false));
    found.extend(detect_channel(window));
    found
}

/// Detect patterns on the recent window, record new ones and return their candidates
///
/// Neutral patterns are recorded but never become candidates.
pub fn scan_chart_patterns(
    candles: &[Candle],
    timeframe: Timeframe,
    config: &PatternConfig,
    log: &mut PatternLog,
    now: DateTime<Utc>,
) -> Vec<SignalCandidate> {
    log.expire(now);

    let mut candidates = Vec::new();
    if candles.len() < config.min_candles {
        return candidates;
    }
    let window = &candles[candles.len().saturating_sub(config.window)..];
    let Some(last) = window.last() else {
        return candidates;
    };

    for found in detect_chart_patterns(window) {
        let confidence = chart_pattern_confidence(window, found.bias);
        let recorded = log.record(ChartPattern {
            name: found.name.to_string(),
            bias: found.bias,
            timeframe,
            confidence,
            price: last.close,
            level: found.level,
            detected_at: now,
        });

        if !recorded {
            continue;
        }
        tracing::debug!("{} detected on {} ({}%)", found.name, timeframe, confidence);

        if found.bias != Bias::Neutral {
            candidates.push(SignalCandidate::chart(found.name, found.bias, last.time, confidence));
        }
    }

    candidates
}
