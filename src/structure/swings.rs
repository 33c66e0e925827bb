/// Swing point detection
///
/// A candle is a swing high when its high is strictly above the highs of the `lookback`
/// candles on each side (ties disqualify), and symmetrically for swing lows. The list is
/// rebuilt from the full buffer every cycle, so the result depends only on the candles.

use crate::models::{Candle, SwingKind, SwingPoint};

/// Find swing points and keep the `keep` most recent, ordered by index
pub fn detect_swings(candles: &[Candle], lookback: usize, keep: usize) -> Vec<SwingPoint> {
    if lookback == 0 || candles.len() < lookback * 2 + 1 {
        return Vec::new();
    }

    let mut swings = Vec::new();

    for i in lookback..candles.len() - lookback {
        let candle = &candles[i];

        if let Some(strength) = dominance(candles, i, lookback, |c| c.high, |a, b| a > b) {
            swings.push(SwingPoint {
                index: i,
                kind: SwingKind::High,
                price: candle.high,
                time: candle.time,
                strength,
            });
        }

        if let Some(strength) = dominance(candles, i, lookback, |c| c.low, |a, b| a < b) {
            swings.push(SwingPoint {
                index: i,
                kind: SwingKind::Low,
                price: candle.low,
                time: candle.time,
                strength,
            });
        }
    }

    let start = swings.len().saturating_sub(keep);
    swings.split_off(start)
}

/// Count of left-side neighbours strictly dominated by `candles[i]`, or None when any
/// neighbour within `lookback` on either side is not strictly dominated
fn dominance(
    candles: &[Candle],
    i: usize,
    lookback: usize,
    price: impl Fn(&Candle) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let pivot = price(&candles[i]);
    let mut dominated = 0;

    for j in 1..=lookback {
        if !beats(pivot, price(&candles[i - j])) || !beats(pivot, price(&candles[i + j])) {
            return None;
        }
        dominated += 1;
    }

    Some(dominated)
}

/// Most recent `n` swings of one kind, oldest first
pub fn recent_of_kind(swings: &[SwingPoint], kind: SwingKind, n: usize) -> Vec<SwingPoint> {
    let of_kind: Vec<SwingPoint> = swings.iter().filter(|s| s.kind == kind).copied().collect();
    let start = of_kind.len().saturating_sub(n);
    of_kind[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candles_from_mids(mids: &[f64]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        mids.iter()
            .enumerate()
            .map(|(i, &m)| {
                Candle::new(start + Duration::minutes(i as i64), m - 0.1, m + 0.3, m - 0.3, m + 0.1)
            })
            .collect()
    }

    #[test]
    fn test_single_peak_and_trough() {
        // Rise to index 8 then fall to index 16, then rise again
        let mut mids = Vec::new();
        for i in 0..=8 {
            mids.push(100.0 + i as f64);
        }
        for i in 1..=8 {
            mids.push(108.0 - i as f64);
        }
        for i in 1..=8 {
            mids.push(100.0 + i as f64);
        }

        let candles = candles_from_mids(&mids);
        let swings = detect_swings(&candles, 5, 50);

        assert_eq!(swings.len(), 2);
        assert_eq!(swings[0].kind, SwingKind::High);
        assert_eq!(swings[0].index, 8);
        assert_eq!(swings[0].strength, 5);
        assert_eq!(swings[1].kind, SwingKind::Low);
        assert_eq!(swings[1].index, 16);
        assert!((swings[1].price - 99.7).abs() < 1e-9);
    }

    #[test]
    fn test_ties_disqualify() {
        let mut mids = vec![100.0; 21];
        mids[10] = 105.0;
        mids[13] = 105.0; // equal high within lookback
        let candles = candles_from_mids(&mids);

        let swings = detect_swings(&candles, 5, 50);
        assert!(swings.iter().all(|s| s.kind != SwingKind::High));
    }

    #[test]
    fn test_keep_limit_and_short_input() {
        let mids: Vec<f64> = (0..200)
            .map(|i| 100.0 + if (i / 10) % 2 == 0 { (i % 10) as f64 } else { 10.0 - (i % 10) as f64 })
            .collect();
        let candles = candles_from_mids(&mids);

        let swings = detect_swings(&candles, 3, 4);
        assert_eq!(swings.len(), 4);
        assert!(swings.windows(2).all(|w| w[0].index <= w[1].index));

        assert!(detect_swings(&candles[..6], 3, 50).is_empty());
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mids: Vec<f64> = (0..120).map(|i| 100.0 + ((i * 7) % 23) as f64 * 0.5).collect();
        let candles = candles_from_mids(&mids);

        let first = detect_swings(&candles, 7, 50);
        let second = detect_swings(&candles, 7, 50);
        assert_eq!(first, second);
    }

    #[test]
    fn test_recent_of_kind() {
        let mids: Vec<f64> = (0..200)
            .map(|i| 100.0 + if (i / 10) % 2 == 0 { (i % 10) as f64 } else { 10.0 - (i % 10) as f64 })
            .collect();
        let candles = candles_from_mids(&mids);
        let swings = detect_swings(&candles, 3, 50);

        let highs = recent_of_kind(&swings, SwingKind::High, 2);
        assert_eq!(highs.len(), 2);
        assert!(highs.iter().all(|s| s.kind == SwingKind::High));
        assert!(highs[0].index < highs[1].index);
    }
}
