/// Persistent price zones
///
/// Zones survive across analysis cycles and carry lifecycle state (touches, fill, sweep).
/// Their identity is the origin candle time, which stays valid when the buffer evicts.

use super::Bias;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last opposite-colour candle before a decisive move
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderBlock {
    pub bias: Bias,
    pub top: f64,
    pub bottom: f64,
    pub time: DateTime<Utc>,
    pub strength: u32,
    pub touches: u32,
    pub mitigated: bool,
}

/// Mitigated order block with inverted bias
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Breaker {
    pub bias: Bias,
    pub top: f64,
    pub bottom: f64,
    pub time: DateTime<Utc>,
    pub touches: u32,
    pub mitigated: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FvgQuality {
    High,
    Medium,
}

/// Three-candle imbalance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FairValueGap {
    pub bias: Bias,
    pub top: f64,
    pub bottom: f64,
    /// Start time of the middle candle
    pub time: DateTime<Utc>,
    pub quality: FvgQuality,
    pub fill_pct: f64,
    pub filled: bool,
}

impl FairValueGap {
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityKind {
    EqualHighs,
    EqualLows,
}

impl LiquidityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiquidityKind::EqualHighs => "equal_highs",
            LiquidityKind::EqualLows => "equal_lows",
        }
    }
}

/// Cluster of near-equal swing extremes
///
/// `bias` is the direction price must travel to run the resting orders: up into equal
/// highs, down into equal lows. A sweep reverses against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidityZone {
    pub kind: LiquidityKind,
    pub price: f64,
    /// Start times of the two swings forming the cluster
    pub origins: [DateTime<Utc>; 2],
    pub bias: Bias,
    pub strength: usize,
    pub swept: bool,
}

impl LiquidityZone {
    pub fn latest_origin(&self) -> DateTime<Utc> {
        self.origins[0].max(self.origins[1])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquiditySweep {
    pub kind: LiquidityKind,
    pub price: f64,
    pub time: DateTime<Utc>,
    /// Reversal direction after the sweep
    pub bias: Bias,
}
