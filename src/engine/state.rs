use crate::detectors::{cap_oldest, RetiredZones, ZoneTag};
use crate::models::{
    Breaker, BreakOfStructure, ChangeOfCharacter, FairValueGap, InducementZone, KillZone, LiquiditySweep,
    LiquidityZone, OptimalTradeEntry, OrderBlock, PremiumDiscount, SmartMoneyReversal, SwingPoint,
};
use crate::patterns::ChartPattern;
use crate::settings::ZoneConfig;
use crate::signals::Confluence;
use crate::structure::StructureReading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything one analysis context knows after its latest cycle
///
/// The renderer reads this; only the owning context mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisState {
    pub swings: Vec<SwingPoint>,
    pub structure: StructureReading,
    pub premium_discount: Option<PremiumDiscount>,
    pub atr: Option<f64>,

    pub order_blocks: Vec<OrderBlock>,
    pub breakers: Vec<Breaker>,
    pub fair_value_gaps: Vec<FairValueGap>,
    pub liquidity_zones: Vec<LiquidityZone>,
    pub sweeps: Vec<LiquiditySweep>,

    pub optimal_entries: Vec<OptimalTradeEntry>,
    pub breaks_of_structure: Vec<BreakOfStructure>,
    pub changes_of_character: Vec<ChangeOfCharacter>,
    pub reversals: Vec<SmartMoneyReversal>,
    pub inducements: Vec<InducementZone>,
    pub kill_zones: Vec<KillZone>,
    pub chart_patterns: Vec<ChartPattern>,

    pub retired: RetiredZones,
    pub updated_at: Option<DateTime<Utc>>,
    pub cycles: u64,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self {
            swings: Vec::new(),
            structure: StructureReading::ranging(),
            premium_discount: None,
            atr: None,
            order_blocks: Vec::new(),
            breakers: Vec::new(),
            fair_value_gaps: Vec::new(),
            liquidity_zones: Vec::new(),
            sweeps: Vec::new(),
            optimal_entries: Vec::new(),
            breaks_of_structure: Vec::new(),
            changes_of_character: Vec::new(),
            reversals: Vec::new(),
            inducements: Vec::new(),
            kill_zones: Vec::new(),
            chart_patterns: Vec::new(),
            retired: RetiredZones::default(),
            updated_at: None,
            cycles: 0,
        }
    }
}

impl AnalysisState {
    pub fn active_order_blocks(&self) -> impl Iterator<Item = &OrderBlock> {
        self.order_blocks.iter().filter(|b| !b.mitigated)
    }

    pub fn active_breakers(&self) -> impl Iterator<Item = &Breaker> {
        self.breakers.iter().filter(|b| !b.mitigated)
    }

    pub fn open_fair_value_gaps(&self) -> impl Iterator<Item = &FairValueGap> {
        self.fair_value_gaps.iter().filter(|g| !g.filled)
    }

    pub fn unswept_liquidity(&self) -> impl Iterator<Item = &LiquidityZone> {
        self.liquidity_zones.iter().filter(|z| !z.swept)
    }

    pub fn active_kill_zones(&self) -> impl Iterator<Item = &KillZone> {
        self.kill_zones.iter().filter(|k| k.active)
    }

    /// Corroborating conditions used to score signals
    pub fn confluence(&self) -> Confluence {
        Confluence {
            trend: self.structure.trend,
            zone: self.premium_discount.as_ref().map(|pd| pd.current_zone),
            active_order_block: self.active_order_blocks().next().is_some(),
            open_fvg: self.open_fair_value_gaps().next().is_some(),
            sweep_recorded: !self.sweeps.is_empty(),
            kill_zone_active: self.active_kill_zones().next().is_some(),
        }
    }

    /// Drop zones whose origin is at or before `cutoff`
    ///
    /// Detectors never look at candles that old, so these need no ledger entry.
    pub(crate) fn drop_stale(&mut self, cutoff: DateTime<Utc>) {
        self.order_blocks.retain(|b| b.time > cutoff);
        self.breakers.retain(|b| b.time > cutoff);
        self.fair_value_gaps.retain(|g| g.time > cutoff);
        self.liquidity_zones.retain(|z| z.latest_origin() > cutoff);
        self.sweeps.retain(|s| s.time > cutoff);
        self.retired.expire(cutoff);
    }

    /// Retire mitigated, filled and swept zones, then enforce the list caps
    pub(crate) fn drop_resolved(&mut self, limits: &ZoneConfig) {
        let AnalysisState {
            order_blocks,
            breakers,
            fair_value_gaps,
            liquidity_zones,
            sweeps,
            retired,
            ..
        } = self;

        let ob_tag = |b: &OrderBlock| (ZoneTag::OrderBlock(b.bias), b.time);
        let breaker_tag = |b: &Breaker| (ZoneTag::Breaker(b.bias), b.time);
        let fvg_tag = |g: &FairValueGap| (ZoneTag::FairValueGap(g.bias), g.time);
        let liquidity_tag = |z: &LiquidityZone| (ZoneTag::Liquidity(z.kind), z.latest_origin());

        retire_where(order_blocks, |b| b.mitigated, ob_tag, retired);
        retire_where(breakers, |b| b.mitigated, breaker_tag, retired);
        retire_where(fair_value_gaps, |g| g.filled, fvg_tag, retired);
        retire_where(liquidity_zones, |z| z.swept, liquidity_tag, retired);

        cap_oldest(order_blocks, limits.max_order_blocks, |b| {
            let (tag, at) = ob_tag(b);
            retired.retire(tag, at);
        });
        cap_oldest(breakers, limits.max_breakers, |b| {
            let (tag, at) = breaker_tag(b);
            retired.retire(tag, at);
        });
        cap_oldest(fair_value_gaps, limits.max_fvgs, |g| {
            let (tag, at) = fvg_tag(g);
            retired.retire(tag, at);
        });
        cap_oldest(sweeps, limits.max_sweeps, |_| {});
    }
}

fn retire_where<T>(
    items: &mut Vec<T>,
    remove: impl Fn(&T) -> bool,
    tag: impl Fn(&T) -> (ZoneTag, DateTime<Utc>),
    retired: &mut RetiredZones,
) {
    items.retain(|item| {
        if remove(item) {
            let (kind, at) = tag(item);
            retired.retire(kind, at);
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bias, FvgQuality, LiquidityKind};
    use chrono::{Duration, TimeZone};

    fn t(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i)
    }

    fn block(i: i64, mitigated: bool) -> OrderBlock {
        OrderBlock {
            bias: Bias::Bullish,
            top: 101.0,
            bottom: 100.0,
            time: t(i),
            strength: 50,
            touches: if mitigated { 3 } else { 0 },
            mitigated,
        }
    }

    fn gap(i: i64, filled: bool) -> FairValueGap {
        FairValueGap {
            bias: Bias::Bearish,
            top: 101.0,
            bottom: 100.0,
            time: t(i),
            quality: FvgQuality::High,
            fill_pct: if filled { 100.0 } else { 0.0 },
            filled,
        }
    }

    #[test]
    fn test_resolved_zones_leave_active_views() {
        let mut state = AnalysisState {
            order_blocks: vec![block(1, true), block(2, false)],
            fair_value_gaps: vec![gap(3, true)],
            ..AnalysisState::default()
        };
        assert_eq!(state.active_order_blocks().count(), 1);
        assert_eq!(state.open_fair_value_gaps().count(), 0);

        state.drop_resolved(&ZoneConfig::default());

        assert_eq!(state.order_blocks.len(), 1);
        assert_eq!(state.order_blocks[0].time, t(2));
        assert!(state.fair_value_gaps.is_empty());
        assert_eq!(state.retired.len(), 2);
        assert!(state
            .retired
            .contains_near(ZoneTag::OrderBlock(Bias::Bullish), t(1), Duration::seconds(1)));
    }

    #[test]
    fn test_caps_retire_oldest() {
        let mut state = AnalysisState {
            order_blocks: (0..25).map(|i| block(i, false)).collect(),
            ..AnalysisState::default()
        };

        state.drop_resolved(&ZoneConfig::default());

        assert_eq!(state.order_blocks.len(), 20);
        assert_eq!(state.order_blocks[0].time, t(5));
        assert_eq!(state.retired.len(), 5);
    }

    #[test]
    fn test_stale_zones_and_ledger_expire() {
        let mut state = AnalysisState {
            order_blocks: vec![block(1, false), block(10, false)],
            liquidity_zones: vec![LiquidityZone {
                kind: LiquidityKind::EqualLows,
                price: 99.0,
                origins: [t(0), t(4)],
                bias: Bias::Bearish,
                strength: 7,
                swept: false,
            }],
            ..AnalysisState::default()
        };
        state.retired.retire(ZoneTag::Breaker(Bias::Bearish), t(2));

        state.drop_stale(t(5));

        assert_eq!(state.order_blocks.len(), 1);
        assert!(state.liquidity_zones.is_empty());
        assert!(state.retired.is_empty());
    }

    #[test]
    fn test_confluence_from_state() {
        let state = AnalysisState {
            order_blocks: vec![block(1, false)],
            fair_value_gaps: vec![gap(2, true)],
            ..AnalysisState::default()
        };
        let confluence = state.confluence();
        assert!(confluence.active_order_block);
        assert!(!confluence.open_fvg);
        assert!(!confluence.sweep_recorded);
        assert!(confluence.zone.is_none());
    }
}
