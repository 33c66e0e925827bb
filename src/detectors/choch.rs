use crate::models::{Bias, ChangeOfCharacter, SwingKind, SwingPoint};
use crate::signals::SignalCandidate;

const SWING_WINDOW: usize = 25;
const BASE_CONFIDENCE: u32 = 92;

/// Rebuild change-of-character events from four-swing alternations
///
/// High-low-high-low where the second high is lower than the first (the down leg) but the
/// final low holds above the prior low is a bullish shift. Low-high-low-high mirrors it.
pub fn detect_change_of_character(
    swings: &[SwingPoint],
    candle_count: usize,
    recency: usize,
    max: usize,
    events: &mut Vec<ChangeOfCharacter>,
) -> Vec<SignalCandidate> {
    events.clear();
    let mut candidates = Vec::new();

    let mut ordered = swings.to_vec();
    ordered.sort_by_key(|s| s.index);
    let ordered = &ordered[ordered.len().saturating_sub(SWING_WINDOW)..];
    let recent_from = candle_count.saturating_sub(recency);

    for w in ordered.windows(4) {
        let (p3, p2, p1, current) = (&w[0], &w[1], &w[2], &w[3]);
        let kinds = (p3.kind, p2.kind, p1.kind, current.kind);

        let bias = if kinds == (SwingKind::High, SwingKind::Low, SwingKind::High, SwingKind::Low)
            && p1.price < p3.price
            && current.price > p2.price
        {
            Bias::Bullish
        } else if kinds == (SwingKind::Low, SwingKind::High, SwingKind::Low, SwingKind::High)
            && p1.price > p3.price
            && current.price < p2.price
        {
            Bias::Bearish
        } else {
            continue;
        };

        events.push(ChangeOfCharacter {
            bias,
            index: current.index,
            reversal_price: p1.price,
            time: current.time,
        });

        if current.index >= recent_from {
            let name = match bias {
                Bias::Bullish => "Bullish CHoCH",
                _ => "Bearish CHoCH",
            };
            candidates.push(SignalCandidate::smc(name, bias, current.time, BASE_CONFIDENCE));
        }
    }

    let excess = events.len().saturating_sub(max);
    events.drain(..excess);
    candidates
}
