/// Order block detection and mitigation
///
/// A bullish order block is the last bearish candle before a bullish candle whose body is
/// more than twice as large and whose close clears the bearish candle's high. The reference
/// body must exceed 0.3 x ATR(14). Bearish blocks mirror this.

use super::{is_touching_zone, RetiredZones, ScanWindow, ZoneTag};
use crate::models::{Bias, Candle, OrderBlock};
use crate::signals::SignalCandidate;

const FIRST_INDEX: usize = 5;
const BODY_MULTIPLIER: f64 = 2.0;
const MIN_BODY_ATR: f64 = 0.3;
const MITIGATION_TOUCHES: u32 = 3;
const BASE_CONFIDENCE: u32 = 90;

/// Scan for new order blocks, appending them to `blocks`
///
/// The newest candle is still forming and never acts as the move candle. A block found on
/// the last closed move candle is reported as a candidate while the current close is
/// still touching it.
pub fn detect_order_blocks(
    candles: &[Candle],
    atr: Option<f64>,
    blocks: &mut Vec<OrderBlock>,
    retired: &RetiredZones,
    window: ScanWindow,
) -> Vec<SignalCandidate> {
    let mut candidates = Vec::new();

    let (Some(atr), Some(last)) = (atr, candles.last()) else {
        return candidates;
    };
    let current_price = last.close;

    for i in FIRST_INDEX..candles.len().saturating_sub(1) {
        let current = &candles[i];
        let prev = &candles[i - 1];

        if prev.time <= window.cutoff {
            continue;
        }

        let body = prev.body();
        if body <= atr * MIN_BODY_ATR {
            continue;
        }

        let bias = if prev.is_bearish()
            && current.is_bullish()
            && current.body() > body * BODY_MULTIPLIER
            && current.close > prev.high
        {
            Bias::Bullish
        } else if prev.is_bullish()
            && current.is_bearish()
            && current.body() > body * BODY_MULTIPLIER
            && current.close < prev.low
        {
            Bias::Bearish
        } else {
            continue;
        };

        let duplicate = blocks
            .iter()
            .any(|ob| ob.bias == bias && (ob.time - prev.time).abs() < window.tolerance)
            || retired.contains_near(ZoneTag::OrderBlock(bias), prev.time, window.tolerance);
        if duplicate {
            continue;
        }

        let block = OrderBlock {
            bias,
            top: prev.open.max(prev.close),
            bottom: prev.open.min(prev.close),
            time: prev.time,
            strength: order_block_strength(prev, atr),
            touches: 0,
            mitigated: false,
        };

        if i == candles.len() - 2 && is_touching_zone(current_price, block.bottom, block.top) {
            let name = match bias {
                Bias::Bullish => "Bullish Order Block",
                _ => "Bearish Order Block",
            };
            candidates.push(SignalCandidate::smc(name, bias, block.time, BASE_CONFIDENCE));
        }

        tracing::debug!(
            "New {} order block {:.5}-{:.5} at {}",
            bias,
            block.bottom,
            block.top,
            block.time
        );
        blocks.push(block);
    }

    candidates
}

/// Count a touch on every live block the price is inside; three touches mitigate
pub fn update_order_block_mitigation(blocks: &mut [OrderBlock], current_price: f64) {
    for block in blocks.iter_mut().filter(|b| !b.mitigated) {
        if is_touching_zone(current_price, block.bottom, block.top) {
            block.touches += 1;
            if block.touches >= MITIGATION_TOUCHES {
                block.mitigated = true;
            }
        }
    }
}

/// 0-100 score from body/range ratio and range relative to ATR
pub fn order_block_strength(candle: &Candle, atr: f64) -> u32 {
    let range = candle.range();
    if range <= 0.0 || atr <= 0.0 {
        return 0;
    }

    let body_ratio = candle.body() / range;
    let volatility_ratio = (range / atr).min(2.0);
    let strength = body_ratio * 50.0 + volatility_ratio * 25.0;

    strength.round().min(100.0) as u32
}
