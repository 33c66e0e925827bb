/// Fair value gap detection and fill tracking
///
/// Bullish gap: candle `i` low above candle `i-2` high. Bearish gap: candle `i` high below
/// candle `i-2` low. The gap must exceed 0.4 x the 20-candle average range; gaps larger
/// than the full average range are high quality.

use super::{RetiredZones, ScanWindow, ZoneTag};
use crate::indicators::average_range;
use crate::models::{Bias, Candle, FairValueGap, FvgQuality};
use crate::signals::SignalCandidate;

const RANGE_PERIOD: usize = 20;
const MIN_GAP_RATIO: f64 = 0.4;
const BASE_CONFIDENCE: u32 = 85;

/// Scan for new gaps, appending them to `gaps`
///
/// A gap completed by the newest candle is reported as a candidate.
pub fn detect_fair_value_gaps(
    candles: &[Candle],
    gaps: &mut Vec<FairValueGap>,
    retired: &RetiredZones,
    window: ScanWindow,
) -> Vec<SignalCandidate> {
    let mut candidates = Vec::new();

    let Some(avg_range) = average_range(candles, RANGE_PERIOD) else {
        return candidates;
    };
    if avg_range <= 0.0 {
        return candidates;
    }

    for i in 2..candles.len() {
        let current = &candles[i];
        let middle = &candles[i - 1];
        let first = &candles[i - 2];

        if middle.time <= window.cutoff {
            continue;
        }

        let (bias, top, bottom) = if current.low > first.high {
            (Bias::Bullish, current.low, first.high)
        } else if current.high < first.low {
            (Bias::Bearish, first.low, current.high)
        } else {
            continue;
        };

        let gap = top - bottom;
        if gap <= avg_range * MIN_GAP_RATIO {
            continue;
        }

        let duplicate = gaps
            .iter()
            .any(|g| g.bias == bias && (g.time - middle.time).abs() < window.tolerance)
            || retired.contains_near(ZoneTag::FairValueGap(bias), middle.time, window.tolerance);
        if duplicate {
            continue;
        }

        let quality = if gap > avg_range {
            FvgQuality::High
        } else {
            FvgQuality::Medium
        };

        if i == candles.len() - 1 {
            let name = match bias {
                Bias::Bullish => "Bullish FVG",
                _ => "Bearish FVG",
            };
            candidates.push(SignalCandidate::smc(name, bias, middle.time, BASE_CONFIDENCE));
        }

        gaps.push(FairValueGap {
            bias,
            top,
            bottom,
            time: middle.time,
            quality,
            fill_pct: 0.0,
            filled: false,
        });
    }

    candidates
}

/// Update fill percentage of open gaps against the newest candle
///
/// Fill is the overlap of the candle's range with the gap. A gap is filled at 100% or when
/// price trades through its far edge.
pub fn update_fvg_fills(gaps: &mut [FairValueGap], current: &Candle) {
    for gap in gaps.iter_mut().filter(|g| !g.filled) {
        let height = gap.height();
        if height <= 0.0 {
            gap.filled = true;
            continue;
        }

        let (entered, traversed) = match gap.bias {
            Bias::Bearish => (current.high >= gap.bottom, current.high >= gap.top),
            _ => (current.low <= gap.top, current.low <= gap.bottom),
        };

        if !entered {
            continue;
        }

        let overlap = current.high.min(gap.top) - current.low.max(gap.bottom);
        gap.fill_pct = (overlap.max(0.0) / height * 100.0).min(100.0);

        if gap.fill_pct >= 100.0 || traversed {
            gap.filled = true;
        }
    }
}
