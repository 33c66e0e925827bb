use crate::indicators::average_swing_range;
use crate::models::{Bias, InducementZone, SwingKind, SwingPoint};

const SWING_WINDOW: usize = 20;
const AVERAGE_COUNT: usize = 10;
const MOVE_MULTIPLIER: f64 = 1.5;

/// Rebuild inducement zones: swings that launched an outsized move
///
/// A low followed by a high more than 1.5x the recent average swing range above it is a
/// bullish inducement at the low; the mirror case is bearish at the high.
pub fn detect_inducements(swings: &[SwingPoint], max: usize, events: &mut Vec<InducementZone>) {
    events.clear();

    let Some(avg_move) = average_swing_range(swings, AVERAGE_COUNT) else {
        return;
    };

    let recent = &swings[swings.len().saturating_sub(SWING_WINDOW)..];
    // The oldest swing in the window has no confirmed predecessor
    for pair in recent.windows(2).skip(1) {
        let (current, next) = (&pair[0], &pair[1]);

        let bias = match (current.kind, next.kind) {
            (SwingKind::Low, SwingKind::High) if next.price - current.price > avg_move * MOVE_MULTIPLIER => {
                Bias::Bullish
            }
            (SwingKind::High, SwingKind::Low) if current.price - next.price > avg_move * MOVE_MULTIPLIER => {
                Bias::Bearish
            }
            _ => continue,
        };

        events.push(InducementZone {
            bias,
            index: current.index,
            price: current.price,
            time: current.time,
        });
    }

    let excess = events.len().saturating_sub(max);
    events.drain(..excess);
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
    fn test_outsized_move_flags_inducement() {
        // Legs of 2.0 then one leg of 10.0 up from the low at index 50
        let swings = vec![
            swing(10, SwingKind::High, 102.0),
            swing(20, SwingKind::Low, 100.0),
            swing(30, SwingKind::High, 102.0),
            swing(40, SwingKind::Low, 100.0),
            swing(45, SwingKind::High, 102.0),
            swing(50, SwingKind::Low, 100.0),
            swing(60, SwingKind::High, 110.0),
        ];
        let mut events = Vec::new();

        detect_inducements(&swings, 10, &mut events);

        // Average leg = (2*5 + 10) / 6 = 3.33; only the 10.0 leg clears 5.0
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bias, Bias::Bullish);
        assert_eq!(events[0].index, 50);
        assert_eq!(events[0].price, 100.0);
    }

    #[test]
    fn test_too_few_swings() {
        let swings = vec![swing(10, SwingKind::High, 102.0), swing(20, SwingKind::Low, 90.0)];
        let mut events = vec![InducementZone {
            bias: Bias::Bearish,
            index: 1,
            price: 1.0,
            time: Utc::now(),
        }];
        detect_inducements(&swings, 10, &mut events);
        assert!(events.is_empty());
    }
}
