/// Trendline patterns: triangles, wedges and channels
///
/// Upper line through recent peaks of highs, lower line through recent troughs of lows.
/// Slopes are per extremum relative to the window's mean close.

use super::extrema::{find_peaks, find_troughs, relative_slope};
use super::PatternMatch;
use crate::models::{Bias, Candle};

const MIN_CANDLES: usize = 20;
const CHANNEL_MIN_CANDLES: usize = 30;
const LINE_POINTS: usize = 3;
const CHANNEL_POINTS: usize = 4;
const TREND_BIAS_WINDOW: usize = 20;

const SLOPING: f64 = 0.001;
const FLAT: f64 = 0.002;
const PARALLEL: f64 = 0.001;
const CHANNEL_TILT: f64 = 0.002;

struct Lines {
    highs: Vec<f64>,
    lows: Vec<f64>,
    peaks: Vec<usize>,
    troughs: Vec<usize>,
    scale: f64,
}

impl Lines {
    fn new(candles: &[Candle]) -> Option<Self> {
        if candles.is_empty() {
            return None;
        }
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let scale = candles.iter().map(|c| c.close).sum::<f64>() / candles.len() as f64;
        Some(Self {
            peaks: find_peaks(&highs),
            troughs: find_troughs(&lows),
            highs,
            lows,
            scale,
        })
    }

    fn has_points(&self, n: usize) -> bool {
        self.peaks.len() >= n && self.troughs.len() >= n
    }

    /// (upper, lower) slopes over the last `take` extrema
    fn slopes(&self, take: usize) -> (f64, f64) {
        (
            relative_slope(&self.peaks, &self.highs, take, self.scale),
            relative_slope(&self.troughs, &self.lows, take, self.scale),
        )
    }
}

/// Symmetrical, ascending and descending triangles
pub fn detect_triangles(candles: &[Candle]) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    if candles.len() < MIN_CANDLES {
        return found;
    }
    let Some(lines) = Lines::new(candles).filter(|l| l.has_points(2)) else {
        return found;
    };
    let (upper, lower) = lines.slopes(LINE_POINTS);

    if upper < -SLOPING && lower > SLOPING {
        found.push(PatternMatch::new("Symmetrical Triangle", trend_bias(candles)));
    }
    if upper.abs() < FLAT && lower > SLOPING {
        found.push(PatternMatch::new("Ascending Triangle", Bias::Bullish));
    }
    if upper < -SLOPING && lower.abs() < FLAT {
        found.push(PatternMatch::new("Descending Triangle", Bias::Bearish));
    }
    found
}

/// Rising wedge (bearish) and falling wedge (bullish)
pub fn detect_wedges(candles: &[Candle]) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    if candles.len() < MIN_CANDLES {
        return found;
    }
    let Some(lines) = Lines::new(candles).filter(|l| l.has_points(2)) else {
        return found;
    };
    let (upper, lower) = lines.slopes(LINE_POINTS);

    if upper > SLOPING && lower > SLOPING && lower > upper {
        found.push(PatternMatch::new("Rising Wedge", Bias::Bearish));
    }
    if upper < -SLOPING && lower < -SLOPING && upper < lower {
        found.push(PatternMatch::new("Falling Wedge", Bias::Bullish));
    }
    found
}

/// Parallel trendlines; horizontal channels carry no bias
pub fn detect_channel(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < CHANNEL_MIN_CANDLES {
        return None;
    }
    let lines = Lines::new(candles).filter(|l| l.has_points(3))?;
    let (upper, lower) = lines.slopes(CHANNEL_POINTS);

    if (upper - lower).abs() >= PARALLEL {
        return None;
    }

    Some(if upper > CHANNEL_TILT && lower > CHANNEL_TILT {
        PatternMatch::new("Ascending Channel", Bias::Bullish)
    } else if upper < -CHANNEL_TILT && lower < -CHANNEL_TILT {
        PatternMatch::new("Descending Channel", Bias::Bearish)
    } else {
        PatternMatch::new("Horizontal Channel", Bias::Neutral)
    })
}

/// Direction of the last 20 candles, open to close
fn trend_bias(candles: &[Candle]) -> Bias {
    let recent = &candles[candles.len().saturating_sub(TREND_BIAS_WINDOW)..];
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if last.close > first.open => Bias::Bullish,
        _ => Bias::Bearish,
    }
}
