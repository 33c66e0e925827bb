use super::PatternMatch;
use crate::models::{Bias, Candle};

const FLAG_CANDLES: usize = 15;
const POLE_CANDLES: usize = 5;
const MIN_POLE_MOVE: f64 = 0.02;
const MAX_CONSOLIDATION: f64 = 0.015;

/// Sharp five-candle pole followed by a tight ten-candle consolidation
///
/// The pole must move at least 2% from its first open to its last close in the flag's
/// direction; the flag's high-low range must stay under 1.5% of its mean close.
pub fn detect_flag(candles: &[Candle], bullish: bool) -> Option<PatternMatch> {
    if candles.len() < FLAG_CANDLES {
        return None;
    }

    let recent = &candles[candles.len() - FLAG_CANDLES..];
    let (pole, flag) = recent.split_at(POLE_CANDLES);

    let start = pole[0].open;
    let end = pole[POLE_CANDLES - 1].close;
    if start <= 0.0 {
        return None;
    }
    let pole_move = if bullish {
        (end - start) / start
    } else {
        (start - end) / start
    };
    if pole_move < MIN_POLE_MOVE {
        return None;
    }

    let high = flag.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low = flag.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let mean_close = flag.iter().map(|c| c.close).sum::<f64>() / flag.len() as f64;
    if mean_close <= 0.0 || (high - low) / mean_close >= MAX_CONSOLIDATION {
        return None;
    }

    Some(if bullish {
        PatternMatch::new("Bull Flag", Bias::Bullish)
    } else {
        PatternMatch::new("Bear Flag", Bias::Bearish)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn flag_series(pole_end: f64, flag_range: f64) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let at = |i: usize| start + Duration::minutes(i as i64);
        let mut candles: Vec<Candle> = (0..5).map(|i| Candle::new(at(i), 100.0, 100.1, 99.9, 100.0)).collect();

        let step = (pole_end - 100.0) / 5.0;
        for k in 0..5 {
            let open = 100.0 + step * k as f64;
            let close = open + step;
            candles.push(Candle::new(at(5 + k), open, open.max(close), open.min(close), close));
        }
        for k in 0..10 {
            let half = flag_range / 2.0;
            candles.push(Candle::new(at(10 + k), pole_end, pole_end + half, pole_end - half, pole_end));
        }
        candles
    }

    #[test]
    fn test_bull_flag() {
        let candles = flag_series(103.0, 0.5);
        let found = detect_flag(&candles, true).unwrap();
        assert_eq!(found.name, "Bull Flag");
        assert!(detect_flag(&candles, false).is_none());
    }

    #[test]
    fn test_bear_flag() {
        let candles = flag_series(97.0, 0.5);
        assert_eq!(detect_flag(&candles, false).unwrap().bias, Bias::Bearish);
    }

    #[test]
    fn test_weak_pole_or_loose_flag() {
        assert!(detect_flag(&flag_series(101.0, 0.5), true).is_none());
        assert!(detect_flag(&flag_series(103.0, 2.0), true).is_none());
    }
}
