use super::extrema::{find_peaks, find_troughs};
use super::PatternMatch;
use crate::models::{Bias, Candle};

const HS_MIN_CANDLES: usize = 25;
const DOUBLE_MIN_CANDLES: usize = 20;
const SHOULDER_TOLERANCE: f64 = 0.3;
const SHOULDER_LEVEL: f64 = 0.02;
const DOUBLE_LEVEL: f64 = 0.015;

/// Head and shoulders over the last five peaks of highs (troughs of lows when inverse)
///
/// The five extrema read left shoulder, left high, head, right high, right shoulder. Each
/// shoulder must sit within 30% of its distance to the head from the adjacent high, the head
/// must be the extreme, and the shoulders within 2% of each other. The match carries the
/// neckline: the mean of the two inner highs.
pub fn detect_head_and_shoulders(candles: &[Candle], inverse: bool) -> Option<PatternMatch> {
    if candles.len() < HS_MIN_CANDLES {
        return None;
    }

    let prices: Vec<f64> = if inverse {
        candles.iter().map(|c| c.low).collect()
    } else {
        candles.iter().map(|c| c.high).collect()
    };
    let extremes = if inverse {
        find_troughs(&prices)
    } else {
        find_peaks(&prices)
    };
    if extremes.len() < 5 {
        return None;
    }

    let last = &extremes[extremes.len() - 5..];
    let [ls, lh, head, rh, rs] = [0, 1, 2, 3, 4].map(|k| prices[last[k]]);

    let left_valid = (ls - lh).abs() < (head - ls).abs() * SHOULDER_TOLERANCE;
    let right_valid = (rs - rh).abs() < (head - rs).abs() * SHOULDER_TOLERANCE;
    let head_extreme = if inverse {
        head < ls && head < rs
    } else {
        head > ls && head > rs
    };
    let shoulders_level = ls != 0.0 && (ls - rs).abs() / ls.abs() < SHOULDER_LEVEL;

    if !(left_valid && right_valid && head_extreme && shoulders_level) {
        return None;
    }

    let neckline = (lh + rh) / 2.0;
    Some(if inverse {
        PatternMatch::new("Inverse Head and Shoulders", Bias::Bullish).with_level(neckline)
    } else {
        PatternMatch::new("Head and Shoulders", Bias::Bearish).with_level(neckline)
    })
}

/// Last two peaks (or troughs) within 1.5% of each other
pub fn detect_double_top_bottom(candles: &[Candle], top: bool) -> Option<PatternMatch> {
    if candles.len() < DOUBLE_MIN_CANDLES {
        return None;
    }

    let prices: Vec<f64> = if top {
        candles.iter().map(|c| c.high).collect()
    } else {
        candles.iter().map(|c| c.low).collect()
    };
    let extremes = if top { find_peaks(&prices) } else { find_troughs(&prices) };
    if extremes.len() < 2 {
        return None;
    }

    let first = prices[extremes[extremes.len() - 2]];
    let second = prices[extremes[extremes.len() - 1]];
    if first == 0.0 || (first - second).abs() / first.abs() >= DOUBLE_LEVEL {
        return None;
    }

    Some(if top {
        PatternMatch::new("Double Top", Bias::Bearish).with_level(first.max(second))
    } else {
        PatternMatch::new("Double Bottom", Bias::Bullish).with_level(first.min(second))
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::series_through;
    use super::*;

    #[test]
    fn test_head_and_shoulders() {
        let candles = series_through(
            &[95.0, 100.0, 97.0, 101.0, 96.0, 110.0, 96.0, 101.0, 97.0, 100.5, 95.0],
            3,
        );

        let found = detect_head_and_shoulders(&candles, false).unwrap();

        assert_eq!(found.name, "Head and Shoulders");
        assert_eq!(found.bias, Bias::Bearish);
        // Inner highs 101.0 + 0.2 wick on both sides
        assert!((found.level.unwrap() - 101.2).abs() < 1e-9);
        assert!(detect_head_and_shoulders(&candles, true).is_none());
    }

    #[test]
    fn test_inverse_head_and_shoulders() {
        let candles = series_through(
            &[105.0, 100.0, 103.0, 99.0, 104.0, 90.0, 104.0, 99.0, 103.0, 99.5, 105.0],
            3,
        );

        let found = detect_head_and_shoulders(&candles, true).unwrap();

        assert_eq!(found.name, "Inverse Head and Shoulders");
        assert_eq!(found.bias, Bias::Bullish);
    }

    #[test]
    fn test_head_not_extreme() {
        let candles = series_through(
            &[95.0, 100.0, 97.0, 101.0, 96.0, 99.0, 96.0, 101.0, 97.0, 100.5, 95.0],
            3,
        );
        assert!(detect_head_and_shoulders(&candles, false).is_none());
    }

    #[test]
    fn test_double_top_and_bottom() {
        let candles = series_through(&[95.0, 100.0, 96.0, 108.0, 97.0, 108.5, 92.0], 4);

        let top = detect_double_top_bottom(&candles, true).unwrap();
        assert_eq!(top.name, "Double Top");
        assert_eq!(top.bias, Bias::Bearish);

        // Troughs 96 and 97 are about 1% apart
        let bottom = detect_double_top_bottom(&candles, false).unwrap();
        assert_eq!(bottom.name, "Double Bottom");

        let apart = series_through(&[95.0, 100.0, 90.0, 108.0, 97.0, 112.0, 92.0], 4);
        assert!(detect_double_top_bottom(&apart, true).is_none());
        assert!(detect_double_top_bottom(&apart, false).is_none());
    }
}
