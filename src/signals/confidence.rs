/// Confidence scoring
///
/// Smart-money events are scored against the surrounding market: trend, premium/discount
/// position and corroborating zones. Chart patterns are scored from recent price action.

use crate::indicators::calculate_atr;
use crate::models::{Bias, Candle, PriceZone, Trend};

const BASE: u32 = 60;
const TREND_BONUS: u32 = 15;
const STRONG_TREND_BONUS: u32 = 5;
const ZONE_BONUS: u32 = 10;
const ZONE_CONFIRMATION_BONUS: u32 = 5;
const KILL_ZONE_BONUS: u32 = 3;

const CHART_LOOKBACK: usize = 10;
const ATR_PERIOD: usize = 14;

/// Market conditions that corroborate a signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confluence {
    pub trend: Trend,
    pub zone: Option<PriceZone>,
    pub active_order_block: bool,
    pub open_fvg: bool,
    pub sweep_recorded: bool,
    pub kill_zone_active: bool,
}

impl Default for Confluence {
    fn default() -> Self {
        Self {
            trend: Trend::Neutral,
            zone: None,
            active_order_block: false,
            open_fvg: false,
            sweep_recorded: false,
            kill_zone_active: false,
        }
    }
}

pub fn blend_confidence(bias: Bias, confluence: &Confluence, cap: u32) -> u32 {
    let mut confidence = BASE;

    if confluence.trend.aligns_with(bias) {
        confidence += TREND_BONUS;
        if confluence.trend.is_strong() {
            confidence += STRONG_TREND_BONUS;
        }
    }

    match (bias, confluence.zone) {
        (Bias::Bullish, Some(PriceZone::Discount)) | (Bias::Bearish, Some(PriceZone::Premium)) => {
            confidence += ZONE_BONUS;
        }
        _ => {}
    }

    for present in [
        confluence.active_order_block,
        confluence.open_fvg,
        confluence.sweep_recorded,
    ] {
        if present {
            confidence += ZONE_CONFIRMATION_BONUS;
        }
    }

    if confluence.kill_zone_active {
        confidence += KILL_ZONE_BONUS;
    }

    confidence.min(cap)
}

/// Score a chart pattern from the last ten closes
///
/// Share of closes moving in the bias direction, +5 for momentum over 1% and +5 more over
/// 2%, +10 when ATR is between 0.5% and 2% of price. Capped at 100.
pub fn chart_pattern_confidence(candles: &[Candle], bias: Bias) -> u32 {
    let recent = &candles[candles.len().saturating_sub(CHART_LOOKBACK)..];
    if recent.len() < 2 {
        return 0;
    }

    let confirming = recent
        .windows(2)
        .filter(|w| match bias {
            Bias::Bullish => w[1].close > w[0].close,
            Bias::Bearish => w[1].close < w[0].close,
            Bias::Neutral => false,
        })
        .count();

    let mut confidence = confirming as f64 / (recent.len() - 1) as f64 * 100.0;

    let start = recent[0].close;
    let end = recent[recent.len() - 1].close;
    if start != 0.0 {
        let momentum = ((end - start) / start).abs() * 100.0;
        if momentum > 1.0 {
            confidence += 5.0;
        }
        if momentum > 2.0 {
            confidence += 5.0;
        }
    }

    if let Some(atr) = calculate_atr(candles, ATR_PERIOD) {
        if end != 0.0 {
            let volatility = atr / end * 100.0;
            if volatility > 0.5 && volatility < 2.0 {
                confidence += 10.0;
            }
        }
    }

    confidence.round().min(100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_blend_all_bonuses_capped() {
        let confluence = Confluence {
            trend: Trend::StrongBull,
            zone: Some(PriceZone::Discount),
            active_order_block: true,
            open_fvg: true,
            sweep_recorded: true,
            kill_zone_active: true,
        };
        // 60 + 15 + 5 + 10 + 15 + 3 = 108
        assert_eq!(blend_confidence(Bias::Bullish, &confluence, 98), 98);
        // Against the trend and in discount: 60 + 15 + 3
        assert_eq!(blend_confidence(Bias::Bearish, &confluence, 98), 78);
    }

    #[test]
    fn test_blend_base_only() {
        assert_eq!(blend_confidence(Bias::Bullish, &Confluence::default(), 98), 60);

        let confluence = Confluence {
            trend: Trend::Bear,
            zone: Some(PriceZone::Premium),
            ..Confluence::default()
        };
        assert_eq!(blend_confidence(Bias::Bearish, &confluence, 98), 85);
    }

    fn closes(values: &[f64]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(start + Duration::minutes(i as i64), c, c + 0.01, c - 0.01, c))
            .collect()
    }

    #[test]
    fn test_chart_confidence_steady_rise() {
        // Ten closes rising 0.5 each from 100: all nine moves confirm, momentum 4.5%
        let candles = closes(&(0..10).map(|i| 100.0 + i as f64 * 0.5).collect::<Vec<_>>());
        assert_eq!(chart_pattern_confidence(&candles, Bias::Bullish), 100);
        assert_eq!(chart_pattern_confidence(&candles, Bias::Bearish), 10);
        assert_eq!(chart_pattern_confidence(&candles, Bias::Neutral), 10);
    }

    #[test]
    fn test_chart_confidence_short_input() {
        assert_eq!(chart_pattern_confidence(&closes(&[100.0]), Bias::Bullish), 0);
    }
}
