use super::{Bias, Trend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakOfStructure {
    pub bias: Bias,
    pub index: usize,
    pub break_price: f64,
    pub new_price: f64,
    pub time: DateTime<Utc>,
    pub strength: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeOfCharacter {
    pub bias: Bias,
    pub index: usize,
    pub reversal_price: f64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmartMoneyReversal {
    pub bias: Bias,
    pub index: usize,
    pub price: f64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InducementZone {
    pub bias: Bias,
    pub index: usize,
    pub price: f64,
    pub time: DateTime<Utc>,
}

/// Retracement entry band inside a high-quality FVG
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimalTradeEntry {
    pub bias: Bias,
    /// 50% level
    pub price: f64,
    /// 38.2% level
    pub low: f64,
    /// 61.8% level
    pub high: f64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KillZone {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub active: bool,
    pub bias: Trend,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceZone {
    Premium,
    Equilibrium,
    Discount,
}

impl PriceZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceZone::Premium => "premium",
            PriceZone::Equilibrium => "equilibrium",
            PriceZone::Discount => "discount",
        }
    }
}

/// Fibonacci split of the recent swing range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PremiumDiscount {
    pub high: f64,
    pub low: f64,
    pub equilibrium: f64,
    pub premium: f64,
    pub discount: f64,
    pub current_zone: PriceZone,
}
