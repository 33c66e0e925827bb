/// Average True Range (ATR) indicator
///
/// Measures market volatility by averaging true ranges over a period.
/// True Range is the greatest of:
/// - Current High - Current Low
/// - Abs(Current High - Previous Close)
/// - Abs(Current Low - Previous Close)
///
/// The engine uses the plain mean of the last `period` true ranges, so targets react
/// to the most recent volatility without smoothing lag.

use crate::models::Candle;

/// True range of `current` given the previous close
pub fn true_range(current: &Candle, prev_close: f64) -> f64 {
    (current.high - current.low)
        .max((current.high - prev_close).abs())
        .max((current.low - prev_close).abs())
}

/// Calculate ATR for the given candles
///
/// Returns the mean true range of the last `period` candles, or None if insufficient data
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let start = candles.len() - period;
    let sum: f64 = (start..candles.len())
        .map(|i| true_range(&candles[i], candles[i - 1].close))
        .sum();

    Some(sum / period as f64)
}
