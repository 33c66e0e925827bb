/// Range statistics over candles and swings
use crate::models::{Candle, SwingPoint};

/// Mean high-low range of the last `period` candles
pub fn average_range(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }

    let recent = &candles[candles.len() - period..];
    Some(recent.iter().map(Candle::range).sum::<f64>() / period as f64)
}

/// Mean price distance between consecutive opposite-kind swings
///
/// Uses the last `count * 2` swings. Returns None with fewer than four swings or when no
/// alternating pair exists.
pub fn average_swing_range(swings: &[SwingPoint], count: usize) -> Option<f64> {
    let recent = &swings[swings.len().saturating_sub(count * 2)..];
    if recent.len() < 4 {
        return None;
    }

    let moves: Vec<f64> = recent
        .windows(2)
        .filter(|pair| pair[0].kind != pair[1].kind)
        .map(|pair| (pair[0].price - pair[1].price).abs())
        .collect();

    if moves.is_empty() {
        return None;
    }

    Some(moves.iter().sum::<f64>() / moves.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwingKind;
    use chrono::{Duration, Utc};

    fn swing(index: usize, kind: SwingKind, price: f64) -> SwingPoint {
        SwingPoint {
            index,
            kind,
            price,
            time: Utc::now() + Duration::minutes(index as i64),
            strength: 7,
        }
    }

    #[test]
    fn test_average_range() {
        let now = Utc::now();
        let candles: Vec<Candle> = (0..5)
            .map(|i| Candle::new(now + Duration::minutes(i), 100.0, 100.0 + i as f64, 99.0, 100.0))
            .collect();

        // Ranges 1..=5 over all five, last two are 4 and 5
        assert_eq!(average_range(&candles, 5), Some(3.0));
        assert_eq!(average_range(&candles, 2), Some(4.5));
        assert_eq!(average_range(&candles, 6), None);
    }

    #[test]
    fn test_average_swing_range() {
        let swings = vec![
            swing(1, SwingKind::Low, 100.0),
            swing(5, SwingKind::High, 110.0),
            swing(9, SwingKind::Low, 104.0),
            swing(12, SwingKind::Low, 103.0),
            swing(15, SwingKind::High, 111.0),
        ];

        // Pairs: 10, 6, (same kind skipped), 8
        assert_eq!(average_swing_range(&swings, 10), Some(8.0));
        assert_eq!(average_swing_range(&swings[..3], 10), None);
    }
}
