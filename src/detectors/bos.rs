use crate::models::{Bias, BreakOfStructure, SwingKind, SwingPoint};
use crate::signals::SignalCandidate;
use crate::structure::recent_of_kind;

const SWINGS_PER_SIDE: usize = 12;
const CONFIRMATION: f64 = 0.002;
const BASE_CONFIDENCE: u32 = 87;

/// Rebuild break-of-structure events from consecutive same-kind swings
///
/// A higher high beyond the prior high by more than 0.2% is a bullish break; a lower low
/// is a bearish one. Breaks within the last `recency` candles are signal candidates.
pub fn detect_break_of_structure(
    swings: &[SwingPoint],
    candle_count: usize,
    recency: usize,
    max: usize,
    events: &mut Vec<BreakOfStructure>,
) -> Vec<SignalCandidate> {
    events.clear();
    let mut candidates = Vec::new();
    let recent_from = candle_count.saturating_sub(recency);

    for (kind, bias) in [(SwingKind::High, Bias::Bullish), (SwingKind::Low, Bias::Bearish)] {
        let points = recent_of_kind(swings, kind, SWINGS_PER_SIDE);

        for pair in points.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            let broken = match bias {
                Bias::Bullish => current.price > prev.price * (1.0 + CONFIRMATION),
                _ => current.price < prev.price * (1.0 - CONFIRMATION),
            };
            if !broken {
                continue;
            }

            events.push(BreakOfStructure {
                bias,
                index: current.index,
                break_price: prev.price,
                new_price: current.price,
                time: current.time,
                strength: current.strength,
            });

            if current.index >= recent_from {
                let name = match bias {
                    Bias::Bullish => "Bullish BOS",
                    _ => "Bearish BOS",
                };
                candidates.push(SignalCandidate::smc(name, bias, current.time, BASE_CONFIDENCE));
            }
        }
    }

    let excess = events.len().saturating_sub(max);
    events.drain(..excess);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn swing(index: usize, kind: SwingKind, price: f64) -> SwingPoint {
        SwingPoint {
            index,
            kind,
            price,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(index as i64),
            strength: 7,
        }
    }

    #[test]
    fn test_bullish_and_bearish_breaks() {
        let swings = vec![
            swing(10, SwingKind::High, 100.0),
            swing(15, SwingKind::Low, 95.0),
            swing(20, SwingKind::High, 100.1), // within margin
            swing(25, SwingKind::Low, 94.0),
            swing(30, SwingKind::High, 101.0),
        ];
        let mut events = Vec::new();

        let candidates = detect_break_of_structure(&swings, 100, 15, 12, &mut events);

        assert_eq!(events.len(), 2);
        let bullish = events.iter().find(|e| e.bias == Bias::Bullish).unwrap();
        assert_eq!(bullish.break_price, 100.1);
        assert_eq!(bullish.new_price, 101.0);
        assert!(events.iter().any(|e| e.bias == Bias::Bearish && e.index == 25));
        // Nothing inside the last 15 candles
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_recent_break_is_candidate() {
        let swings = vec![swing(80, SwingKind::High, 100.0), swing(90, SwingKind::High, 102.0)];
        let mut events = Vec::new();

        let candidates = detect_break_of_structure(&swings, 100, 15, 12, &mut events);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].pattern, "Bullish BOS");
    }

    #[test]
    fn test_list_is_rebuilt_and_capped() {
        let swings: Vec<SwingPoint> = (0..10)
            .map(|i| swing(i * 5, SwingKind::High, 100.0 + i as f64))
            .collect();
        let mut events = Vec::new();

        detect_break_of_structure(&swings, 200, 15, 4, &mut events);
        assert_eq!(events.len(), 4);
        assert_eq!(events[3].index, 45);

        detect_break_of_structure(&[], 200, 15, 4, &mut events);
        assert!(events.is_empty());
    }
}
