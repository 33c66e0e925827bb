/// Smart money reversal: wick rejection confirmed by follow-through
use crate::models::{Bias, Candle, SmartMoneyReversal};
use crate::signals::SignalCandidate;

const WINDOW: usize = 30;
const FIRST_OFFSET: usize = 10;
const TAIL: usize = 5;
const SIGNAL_TAIL: usize = 8;
const FOLLOW_THROUGH: usize = 3;
const WICK_RATIO: f64 = 0.6;
const CLOSE_RATIO: f64 = 0.7;
const BASE_CONFIDENCE: u32 = 91;

pub fn detect_smart_money_reversals(
    candles: &[Candle],
    max: usize,
    events: &mut Vec<SmartMoneyReversal>,
) -> Vec<SignalCandidate> {
    events.clear();
    let mut candidates = Vec::new();

    let offset = candles.len().saturating_sub(WINDOW);
    let recent = &candles[offset..];

    for i in FIRST_OFFSET..recent.len().saturating_sub(TAIL) {
        let candle = &recent[i];
        let range = candle.range();
        if range <= 0.0 {
            continue;
        }

        let follow = &recent[i + 1..(i + 1 + FOLLOW_THROUGH).min(recent.len())];

        let (bias, price) = if candle.is_bullish()
            && candle.open - candle.low > range * WICK_RATIO
            && candle.close - candle.low > range * CLOSE_RATIO
            && follow.iter().any(|c| c.close > candle.high)
        {
            (Bias::Bullish, candle.low)
        } else if candle.is_bearish()
            // Both terms measure from the close; not the mirror of the bullish open-low wick
            && candle.high - candle.close > range * WICK_RATIO
            && candle.high - candle.close > range * CLOSE_RATIO
            && follow.iter().any(|c| c.close < candle.low)
        {
            (Bias::Bearish, candle.high)
        } else {
            continue;
        };

        events.push(SmartMoneyReversal {
            bias,
            index: offset + i,
            price,
            time: candle.time,
        });

        if i + SIGNAL_TAIL >= recent.len() {
            let name = match bias {
                Bias::Bullish => "Bullish SMR",
                _ => "Bearish SMR",
            };
            candidates.push(SignalCandidate::smc(name, bias, candle.time, BASE_CONFIDENCE));
        }
    }

    let excess = events.len().saturating_sub(max);
    events.drain(..excess);
    candidates
}
