use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod events;
pub mod signal;
pub mod zones;

pub use events::{
    BreakOfStructure, ChangeOfCharacter, InducementZone, KillZone, OptimalTradeEntry,
    PremiumDiscount, PriceZone, SmartMoneyReversal,
};
pub use signal::{Signal, SignalDisplay, SignalStatus};
pub use zones::{
    Breaker, FairValueGap, FvgQuality, LiquidityKind, LiquiditySweep, LiquidityZone, OrderBlock,
};

/// OHLC candlestick for one period
///
/// `time` is the period start. A candle inside a `SeriesBuffer` always satisfies
/// `high >= max(open, close)` and `low <= min(open, close)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Flat candle opened by a single tick
    pub fn from_tick(time: DateTime<Utc>, price: f64) -> Self {
        Self::new(time, price, price, price, price)
    }

    /// True when all prices are finite and the wicks enclose the body
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite())
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Directional bias of a zone, event or signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    pub fn opposite(self) -> Self {
        match self {
            Bias::Bullish => Bias::Bearish,
            Bias::Bearish => Bias::Bullish,
            Bias::Neutral => Bias::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bias::Bullish => "bullish",
            Bias::Bearish => "bearish",
            Bias::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candle period in seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Timeframe(u32);

impl Timeframe {
    pub const M1: Timeframe = Timeframe(60);
    pub const M5: Timeframe = Timeframe(300);
    pub const M15: Timeframe = Timeframe(900);
    pub const M30: Timeframe = Timeframe(1800);
    pub const H1: Timeframe = Timeframe(3600);
    pub const H4: Timeframe = Timeframe(14400);
    pub const D1: Timeframe = Timeframe(86400);

    /// Zero-length periods are clamped to one second
    pub fn from_secs(secs: u32) -> Self {
        Timeframe(secs.max(1))
    }

    pub fn secs(&self) -> i64 {
        self.0 as i64
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.secs())
    }

    /// Start of the period containing `time`
    pub fn period_start(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        let secs = time.timestamp();
        let start = secs.div_euclid(self.secs()) * self.secs();
        DateTime::from_timestamp(start, 0).unwrap_or(time)
    }

    pub fn label(&self) -> String {
        match self.0 {
            60 => "1M".to_string(),
            300 => "5M".to_string(),
            900 => "15M".to_string(),
            1800 => "30M".to_string(),
            3600 => "1H".to_string(),
            14400 => "4H".to_string(),
            86400 => "1D".to_string(),
            other => format!("{}s", other),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Identity of one analysis context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContextKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl ContextKey {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.timeframe)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

/// Local extremum found by the swing detector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwingPoint {
    pub index: usize,
    pub kind: SwingKind,
    pub price: f64,
    pub time: DateTime<Utc>,
    pub strength: usize,
}

/// Trend label derived from swing structure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketStructure {
    Uptrend,
    Downtrend,
    Ranging,
}

impl MarketStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStructure::Uptrend => "uptrend",
            MarketStructure::Downtrend => "downtrend",
            MarketStructure::Ranging => "ranging",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StrongBull,
    Bull,
    Neutral,
    Bear,
    StrongBear,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::StrongBull => "strong_bull",
            Trend::Bull => "bull",
            Trend::Neutral => "neutral",
            Trend::Bear => "bear",
            Trend::StrongBear => "strong_bear",
        }
    }

    /// Whether the trend points the same way as `bias`
    pub fn aligns_with(&self, bias: Bias) -> bool {
        matches!(
            (self, bias),
            (Trend::StrongBull | Trend::Bull, Bias::Bullish)
                | (Trend::StrongBear | Trend::Bear, Bias::Bearish)
        )
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, Trend::StrongBull | Trend::StrongBear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_candle_well_formed() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(Candle::new(t, 100.0, 101.0, 99.0, 100.5).is_well_formed());
        assert!(!Candle::new(t, 100.0, 100.2, 99.0, 100.5).is_well_formed());
        assert!(!Candle::new(t, 100.0, 101.0, 100.1, 100.5).is_well_formed());
        assert!(!Candle::new(t, f64::NAN, 101.0, 99.0, 100.5).is_well_formed());
    }

    #[test]
    fn test_period_start() {
        let tf = Timeframe::M5;
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 10, 7, 42).unwrap();
        let start = tf.period_start(t);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap());
    }

    #[test]
    fn test_timeframe_labels() {
        assert_eq!(Timeframe::M1.label(), "1M");
        assert_eq!(Timeframe::H4.label(), "4H");
        assert_eq!(Timeframe::from_secs(120).label(), "120s");
        assert_eq!(Timeframe::from_secs(0).secs(), 1);
    }

    #[test]
    fn test_trend_alignment() {
        assert!(Trend::StrongBull.aligns_with(Bias::Bullish));
        assert!(Trend::Bear.aligns_with(Bias::Bearish));
        assert!(!Trend::Neutral.aligns_with(Bias::Bullish));
        assert!(!Trend::Bull.aligns_with(Bias::Bearish));
    }
}
