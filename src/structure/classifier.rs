/// Market structure classification
///
/// Compares consecutive swing highs and swing lows: higher highs and higher lows score
/// bullish, everything else scores bearish. The trend is only called when one side leads
/// by more than `TREND_MARGIN`.

use super::swings::recent_of_kind;
use crate::models::{MarketStructure, PremiumDiscount, PriceZone, SwingKind, SwingPoint, Trend};
use serde::{Deserialize, Serialize};

const SWINGS_PER_SIDE: usize = 8;
const MIN_SWINGS_PER_SIDE: usize = 3;
const TREND_MARGIN: usize = 2;
const STRONG_MARGIN: usize = 4;

const PD_SWINGS: usize = 10;
const PREMIUM_LEVEL: f64 = 0.618;
const DISCOUNT_LEVEL: f64 = 0.382;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureReading {
    pub structure: MarketStructure,
    pub trend: Trend,
    pub bullish_score: usize,
    pub bearish_score: usize,
}

impl StructureReading {
    pub fn ranging() -> Self {
        Self {
            structure: MarketStructure::Ranging,
            trend: Trend::Neutral,
            bullish_score: 0,
            bearish_score: 0,
        }
    }
}

/// Classify trend from the last eight swing highs and lows
pub fn classify_structure(swings: &[SwingPoint]) -> StructureReading {
    let highs = recent_of_kind(swings, SwingKind::High, SWINGS_PER_SIDE);
    let lows = recent_of_kind(swings, SwingKind::Low, SWINGS_PER_SIDE);

    if highs.len() < MIN_SWINGS_PER_SIDE || lows.len() < MIN_SWINGS_PER_SIDE {
        return StructureReading::ranging();
    }

    let (higher_highs, lower_highs) = count_steps(&highs);
    let (higher_lows, lower_lows) = count_steps(&lows);

    let bullish_score = higher_highs + higher_lows;
    let bearish_score = lower_highs + lower_lows;

    let (structure, trend) = if bullish_score > bearish_score + TREND_MARGIN {
        let trend = if bullish_score > bearish_score + STRONG_MARGIN {
            Trend::StrongBull
        } else {
            Trend::Bull
        };
        (MarketStructure::Uptrend, trend)
    } else if bearish_score > bullish_score + TREND_MARGIN {
        let trend = if bearish_score > bullish_score + STRONG_MARGIN {
            Trend::StrongBear
        } else {
            Trend::Bear
        };
        (MarketStructure::Downtrend, trend)
    } else {
        (MarketStructure::Ranging, Trend::Neutral)
    };

    StructureReading {
        structure,
        trend,
        bullish_score,
        bearish_score,
    }
}

/// (higher, not higher) step counts over consecutive swings
fn count_steps(swings: &[SwingPoint]) -> (usize, usize) {
    swings.windows(2).fold((0, 0), |(up, down), pair| {
        if pair[1].price > pair[0].price {
            (up + 1, down)
        } else {
            (up, down + 1)
        }
    })
}

/// Premium/discount split of the last ten swings' price range
///
/// Returns None with fewer than two swings or a zero-width range.
pub fn premium_discount(swings: &[SwingPoint], current_price: f64) -> Option<PremiumDiscount> {
    if swings.len() < 2 {
        return None;
    }

    let recent = &swings[swings.len().saturating_sub(PD_SWINGS)..];
    let high = recent.iter().map(|s| s.price).fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().map(|s| s.price).fold(f64::INFINITY, f64::min);
    let range = high - low;

    if range <= 0.0 {
        return None;
    }

    let premium = low + range * PREMIUM_LEVEL;
    let discount = low + range * DISCOUNT_LEVEL;

    let current_zone = if current_price > premium {
        PriceZone::Premium
    } else if current_price < discount {
        PriceZone::Discount
    } else {
        PriceZone::Equilibrium
    };

    Some(PremiumDiscount {
        high,
        low,
        equilibrium: low + range * 0.5,
        premium,
        discount,
        current_zone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn swings_from(points: &[(SwingKind, f64)]) -> Vec<SwingPoint> {
        let start = Utc::now();
        points
            .iter()
            .enumerate()
            .map(|(i, &(kind, price))| SwingPoint {
                index: i * 10,
                kind,
                price,
                time: start + Duration::minutes(i as i64 * 10),
                strength: 7,
            })
            .collect()
    }

    fn alternating(highs: &[f64], lows: &[f64]) -> Vec<SwingPoint> {
        let mut points = Vec::new();
        for (h, l) in highs.iter().zip(lows.iter()) {
            points.push((SwingKind::High, *h));
            points.push((SwingKind::Low, *l));
        }
        swings_from(&points)
    }

    #[test]
    fn test_uptrend_structure() {
        let swings = alternating(&[110.0, 112.0, 114.0, 116.0], &[105.0, 107.0, 109.0, 111.0]);
        let reading = classify_structure(&swings);

        // 3 higher highs + 3 higher lows vs 0
        assert_eq!(reading.bullish_score, 6);
        assert_eq!(reading.bearish_score, 0);
        assert_eq!(reading.structure, MarketStructure::Uptrend);
        assert_eq!(reading.trend, Trend::StrongBull);
    }

    #[test]
    fn test_downtrend_not_strong() {
        let swings = alternating(&[120.0, 118.0, 116.0, 117.0], &[110.0, 108.0, 109.0, 107.0]);
        let reading = classify_structure(&swings);

        // highs: down, down, up; lows: down, up, down -> bearish 4, bullish 2
        assert_eq!(reading.bearish_score, 4);
        assert_eq!(reading.bullish_score, 2);
        assert_eq!(reading.structure, MarketStructure::Ranging);

        let swings = alternating(
            &[120.0, 118.0, 116.0, 115.0],
            &[110.0, 108.0, 109.0, 107.0],
        );
        let reading = classify_structure(&swings);
        assert_eq!(reading.bearish_score, 5);
        assert_eq!(reading.structure, MarketStructure::Downtrend);
        assert_eq!(reading.trend, Trend::Bear);
    }

    #[test]
    fn test_too_few_swings_is_ranging() {
        let swings = alternating(&[110.0, 120.0], &[100.0, 110.0]);
        assert_eq!(classify_structure(&swings), StructureReading::ranging());
    }

    #[test]
    fn test_premium_discount_levels() {
        let swings = alternating(&[200.0], &[100.0]);

        let pd = premium_discount(&swings, 170.0).unwrap();
        assert!((pd.premium - 161.8).abs() < 1e-9);
        assert!((pd.discount - 138.2).abs() < 1e-9);
        assert_eq!(pd.equilibrium, 150.0);
        assert_eq!(pd.current_zone, PriceZone::Premium);

        assert_eq!(premium_discount(&swings, 120.0).unwrap().current_zone, PriceZone::Discount);
        assert_eq!(premium_discount(&swings, 150.0).unwrap().current_zone, PriceZone::Equilibrium);
    }

    #[test]
    fn test_premium_discount_degenerate() {
        let swings = alternating(&[100.0], &[100.0]);
        assert!(premium_discount(&swings, 100.0).is_none());
        assert!(premium_discount(&swings[..1], 100.0).is_none());
    }
}
