/// Equal highs/lows clustering and sweep tracking
use super::{RetiredZones, ScanWindow, ZoneTag};
use crate::models::{Bias, Candle, LiquidityKind, LiquiditySweep, LiquidityZone, SwingKind, SwingPoint};
use crate::signals::SignalCandidate;
use crate::structure::recent_of_kind;

const SWINGS_PER_SIDE: usize = 15;
const EQUAL_TOLERANCE: f64 = 0.005;
const MERGE_TOLERANCE: f64 = 0.002;
const SWEEP_PIERCE: f64 = 0.001;
const SWEEP_LOOKBACK: usize = 50;
const BASE_CONFIDENCE: u32 = 88;

/// Rebuild liquidity zones from the recent swings
///
/// Any two swing highs (or lows) within 0.5% of each other form a zone at their mean
/// price. Zones within 0.2% of one already found are merged into it. Swept state is
/// carried over from `previous`, so a zone is only ever swept once.
pub fn detect_liquidity_zones(
    swings: &[SwingPoint],
    previous: &[LiquidityZone],
    retired: &RetiredZones,
    window: ScanWindow,
    max: usize,
) -> Vec<LiquidityZone> {
    let mut found = Vec::new();
    collect_equal_levels(swings, SwingKind::High, retired, window, &mut found);
    collect_equal_levels(swings, SwingKind::Low, retired, window, &mut found);

    let mut unique: Vec<LiquidityZone> = Vec::new();
    for zone in found {
        let merged = unique
            .iter()
            .any(|u| u.kind == zone.kind && relative_diff(u.price, zone.price) < MERGE_TOLERANCE);
        if !merged {
            unique.push(zone);
        }
    }

    let start = unique.len().saturating_sub(max);
    let mut zones = unique.split_off(start);

    for zone in zones.iter_mut() {
        zone.swept = previous.iter().any(|p| {
            p.swept && p.kind == zone.kind && relative_diff(p.price, zone.price) < MERGE_TOLERANCE
        });
    }

    zones
}

fn collect_equal_levels(
    swings: &[SwingPoint],
    kind: SwingKind,
    retired: &RetiredZones,
    window: ScanWindow,
    out: &mut Vec<LiquidityZone>,
) {
    let points = recent_of_kind(swings, kind, SWINGS_PER_SIDE);
    let (zone_kind, bias) = match kind {
        SwingKind::High => (LiquidityKind::EqualHighs, Bias::Bullish),
        SwingKind::Low => (LiquidityKind::EqualLows, Bias::Bearish),
    };

    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let avg = (a.price + b.price) / 2.0;
            if avg <= 0.0 || (a.price - b.price).abs() / avg >= EQUAL_TOLERANCE {
                continue;
            }

            let latest = a.time.max(b.time);
            if latest <= window.cutoff
                || retired.contains_near(ZoneTag::Liquidity(zone_kind), latest, window.tolerance)
            {
                continue;
            }

            out.push(LiquidityZone {
                kind: zone_kind,
                price: avg,
                origins: [a.time, b.time],
                bias,
                strength: a.strength.min(b.strength),
                swept: false,
            });
        }
    }
}

fn relative_diff(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::INFINITY;
    }
    (a - b).abs() / b.abs()
}

/// Mark zones swept by a recent candle and record each sweep once
///
/// A sweep is a candle after the zone formed whose extreme pierces the level by more than
/// 0.1% but closes back on the original side. The resulting signal reverses against the
/// zone's bias.
pub fn detect_liquidity_sweeps(
    candles: &[Candle],
    zones: &mut [LiquidityZone],
    sweeps: &mut Vec<LiquiditySweep>,
) -> Vec<SignalCandidate> {
    let mut candidates = Vec::new();
    let recent = &candles[candles.len().saturating_sub(SWEEP_LOOKBACK)..];

    for zone in zones.iter_mut().filter(|z| !z.swept) {
        let formed = zone.latest_origin();
        let sweeper = recent.iter().filter(|c| c.time > formed).find(|c| match zone.kind {
            LiquidityKind::EqualHighs => c.high > zone.price * (1.0 + SWEEP_PIERCE) && c.close < zone.price,
            LiquidityKind::EqualLows => c.low < zone.price * (1.0 - SWEEP_PIERCE) && c.close > zone.price,
        });

        let Some(candle) = sweeper else {
            continue;
        };

        zone.swept = true;
        let bias = zone.bias.opposite();
        sweeps.push(LiquiditySweep {
            kind: zone.kind,
            price: zone.price,
            time: candle.time,
            bias,
        });

        let name = match zone.kind {
            LiquidityKind::EqualHighs => "Liquidity Sweep - Reversal Down",
            LiquidityKind::EqualLows => "Liquidity Sweep - Reversal Up",
        };
        tracing::debug!("{} liquidity at {:.5} swept at {}", zone.kind.as_str(), zone.price, candle.time);
        candidates.push(SignalCandidate::smc(name, bias, formed, BASE_CONFIDENCE));
    }

    candidates
}
