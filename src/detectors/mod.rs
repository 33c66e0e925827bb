// Smart-money zone and event detectors
//
// Each detector is a plain function over the candle slice and/or swing list. Zone
// detectors (order blocks, breakers, FVGs, liquidity) also take the zone list they
// maintain; event detectors rebuild their output every cycle.

pub mod breakers;
pub mod bos;
pub mod choch;
pub mod fvg;
pub mod inducement;
pub mod kill_zones;
pub mod liquidity;
pub mod order_blocks;
pub mod ote;
pub mod smr;

pub use breakers::{detect_breakers, update_breaker_mitigation};
pub use bos::detect_break_of_structure;
pub use choch::detect_change_of_character;
pub use fvg::{detect_fair_value_gaps, update_fvg_fills};
pub use inducement::detect_inducements;
pub use kill_zones::kill_zones;
pub use liquidity::{detect_liquidity_sweeps, detect_liquidity_zones};
pub use order_blocks::{detect_order_blocks, order_block_strength, update_order_block_mitigation};
pub use ote::derive_optimal_trade_entries;
pub use smr::detect_smart_money_reversals;

use crate::models::{Bias, LiquidityKind};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kind of persistent zone, used to remember zones that were already removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneTag {
    OrderBlock(Bias),
    Breaker(Bias),
    FairValueGap(Bias),
    Liquidity(LiquidityKind),
}

/// Zones removed from their live list (stale, resolved or over the cap)
///
/// A rescan of the buffer would otherwise find the same geometry again and bring the
/// zone back with fresh state. Entries expire once they leave the retention horizon,
/// because detectors never look at candles that old.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetiredZones {
    entries: Vec<(ZoneTag, DateTime<Utc>)>,
}

impl RetiredZones {
    pub fn retire(&mut self, tag: ZoneTag, time: DateTime<Utc>) {
        if !self.entries.contains(&(tag, time)) {
            self.entries.push((tag, time));
        }
    }

    /// Whether a retired zone of this tag lies within `tolerance` of `time`
    pub fn contains_near(&self, tag: ZoneTag, time: DateTime<Utc>, tolerance: Duration) -> bool {
        self.entries
            .iter()
            .any(|&(t, at)| t == tag && (at - time).abs() < tolerance)
    }

    /// Forget entries at or before `cutoff`
    pub fn expire(&mut self, cutoff: DateTime<Utc>) {
        self.entries.retain(|&(_, at)| at > cutoff);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Candle-time bounds for one detector pass
#[derive(Debug, Clone, Copy)]
pub struct ScanWindow {
    /// Reference candles at or before this time are ignored
    pub cutoff: DateTime<Utc>,
    /// Zones of the same kind closer than this are duplicates
    pub tolerance: Duration,
}

/// Price inside the zone widened by 10% of its height on each side
pub fn is_touching_zone(price: f64, bottom: f64, top: f64) -> bool {
    let margin = (top - bottom).abs() * 0.1;
    price >= bottom.min(top) - margin && price <= top.max(bottom) + margin
}

/// Keep the newest `max` entries, handing the dropped ones to `on_drop`
pub(crate) fn cap_oldest<T>(items: &mut Vec<T>, max: usize, mut on_drop: impl FnMut(&T)) {
    if items.len() > max {
        let excess = items.len() - max;
        for item in items.drain(..excess) {
            on_drop(&item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_zone_margin() {
        // Zone 100..110 widened by 1.0 each side
        assert!(is_touching_zone(105.0, 100.0, 110.0));
        assert!(is_touching_zone(99.0, 100.0, 110.0));
        assert!(is_touching_zone(111.0, 100.0, 110.0));
        assert!(!is_touching_zone(98.9, 100.0, 110.0));
        assert!(!is_touching_zone(111.1, 100.0, 110.0));
    }

    #[test]
    fn test_retired_zones() {
        let t = Utc::now();
        let mut retired = RetiredZones::default();
        retired.retire(ZoneTag::OrderBlock(Bias::Bullish), t);
        retired.retire(ZoneTag::OrderBlock(Bias::Bullish), t);
        assert_eq!(retired.len(), 1);

        let tol = Duration::minutes(3);
        assert!(retired.contains_near(ZoneTag::OrderBlock(Bias::Bullish), t + Duration::minutes(2), tol));
        assert!(!retired.contains_near(ZoneTag::OrderBlock(Bias::Bullish), t + Duration::minutes(3), tol));
        assert!(!retired.contains_near(ZoneTag::OrderBlock(Bias::Bearish), t, tol));

        retired.expire(t);
        assert!(retired.is_empty());
    }

    #[test]
    fn test_cap_oldest() {
        let mut items = vec![1, 2, 3, 4, 5];
        let mut dropped = Vec::new();
        cap_oldest(&mut items, 3, |i| dropped.push(*i));
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(dropped, vec![1, 2]);
    }
}
