use crate::models::{FairValueGap, FvgQuality, OptimalTradeEntry};

/// Entry bands at the 38.2%/50%/61.8% levels of every open high-quality gap
pub fn derive_optimal_trade_entries(gaps: &[FairValueGap]) -> Vec<OptimalTradeEntry> {
    gaps.iter()
        .filter(|g| !g.filled && g.quality == FvgQuality::High)
        .map(|g| {
            let height = g.height();
            OptimalTradeEntry {
                bias: g.bias,
                price: g.bottom + height * 0.5,
                low: g.bottom + height * 0.382,
                high: g.bottom + height * 0.618,
                time: g.time,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bias;
    use chrono::Utc;

    fn gap(quality: FvgQuality, filled: bool) -> FairValueGap {
        FairValueGap {
            bias: Bias::Bearish,
            top: 110.0,
            bottom: 100.0,
            time: Utc::now(),
            quality,
            fill_pct: 0.0,
            filled,
        }
    }

    #[test]
    fn test_levels() {
        let entries = derive_optimal_trade_entries(&[gap(FvgQuality::High, false)]);
        assert_eq!(entries.len(), 1);
        assert!((entries[0].low - 103.82).abs() < 1e-9);
        assert!((entries[0].high - 106.18).abs() < 1e-9);
        assert_eq!(entries[0].price, 105.0);
        assert_eq!(entries[0].bias, Bias::Bearish);
    }

    #[test]
    fn test_only_open_high_quality() {
        let gaps = [
            gap(FvgQuality::Medium, false),
            gap(FvgQuality::High, true),
        ];
        assert!(derive_optimal_trade_entries(&gaps).is_empty());
    }
}
