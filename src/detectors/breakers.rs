/// Breaker blocks: mitigated order blocks flipped to the opposite bias
use super::{is_touching_zone, RetiredZones, ZoneTag};
use crate::models::{Breaker, OrderBlock};

const MIN_TOUCHES: u32 = 2;
const MITIGATION_TOUCHES: u32 = 3;

/// Create a breaker for every mitigated block that does not have one yet
pub fn detect_breakers(blocks: &[OrderBlock], breakers: &mut Vec<Breaker>, retired: &RetiredZones) {
    for block in blocks.iter().filter(|b| b.mitigated && b.touches >= MIN_TOUCHES) {
        let bias = block.bias.opposite();
        let exists = breakers.iter().any(|br| br.time == block.time)
            || retired.contains_near(ZoneTag::Breaker(bias), block.time, chrono::Duration::seconds(1));

        if !exists {
            tracing::debug!("Order block at {} became a {} breaker", block.time, bias);
            breakers.push(Breaker {
                bias,
                top: block.top,
                bottom: block.bottom,
                time: block.time,
                touches: 0,
                mitigated: false,
            });
        }
    }
}

/// Same touch rule as order blocks
pub fn update_breaker_mitigation(breakers: &mut [Breaker], current_price: f64) {
    for breaker in breakers.iter_mut().filter(|b| !b.mitigated) {
        if is_touching_zone(current_price, breaker.bottom, breaker.top) {
            breaker.touches += 1;
            if breaker.touches >= MITIGATION_TOUCHES {
                breaker.mitigated = true;
            }
        }
    }
}
