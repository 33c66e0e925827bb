use super::{Bias, MarketStructure, PriceZone, Timeframe, Trend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a signal, set by whoever tracks it after emission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    #[default]
    Active,
    Success,
    Failed,
    Breakeven,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Active => "active",
            SignalStatus::Success => "success",
            SignalStatus::Failed => "failed",
            SignalStatus::Breakeven => "breakeven",
        }
    }
}

/// Trade idea produced by the signal generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub id: Uuid,
    pub symbol: String,
    pub pattern: String,
    pub bias: Bias,
    pub timeframe: Timeframe,
    pub entry: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub stop_loss: f64,
    pub risk_reward: f64,
    pub confidence: u32,
    pub market_structure: MarketStructure,
    pub trend: Trend,
    pub zone: Option<PriceZone>,
    pub created_at: DateTime<Utc>,
    /// Decimals used when displaying prices
    pub precision: usize,
    #[serde(default)]
    pub status: SignalStatus,
}

/// Price fields rendered at the signal's precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDisplay {
    pub entry: String,
    pub tp1: String,
    pub tp2: String,
    pub tp3: String,
    pub stop_loss: String,
    pub risk_reward: String,
    pub zone: String,
}

impl Signal {
    pub fn display(&self) -> SignalDisplay {
        let p = self.precision;
        SignalDisplay {
            entry: format!("{:.*}", p, self.entry),
            tp1: format!("{:.*}", p, self.tp1),
            tp2: format!("{:.*}", p, self.tp2),
            tp3: format!("{:.*}", p, self.tp3),
            stop_loss: format!("{:.*}", p, self.stop_loss),
            risk_reward: format!("{:.2}", self.risk_reward),
            zone: self
                .zone
                .map(|z| z.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}
