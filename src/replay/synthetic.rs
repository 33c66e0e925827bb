use crate::models::{Candle, Timeframe};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Steady climb with noise (+0.05% per candle)
    Uptrend,
    /// Steady decline with noise (-0.05% per candle)
    Downtrend,
    /// Mean-reverting chop around the base price
    Sideways,
    /// Large random swings (±1.5% per candle)
    Volatile,
}

/// Seeded candle generator; the same seed always yields the same series
pub struct SyntheticSeries {
    rng: StdRng,
    base_price: f64,
}

impl SyntheticSeries {
    pub fn new(seed: u64, base_price: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price,
        }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Generate `count` consecutive candles starting at the period containing `start`
    ///
    /// Each candle opens at the previous close, so gaps only appear through wicks.
    pub fn generate(
        &mut self,
        scenario: Scenario,
        count: usize,
        timeframe: Timeframe,
        start: DateTime<Utc>,
    ) -> Vec<Candle> {
        let start = timeframe.period_start(start);
        let mut candles = Vec::with_capacity(count);
        let mut close = self.base_price;

        for i in 0..count {
            let open = close;
            close = self.step(scenario, close);
            let time = start + timeframe.duration() * i as i32;
            candles.push(self.create_candle(time, open, close));
        }

        candles
    }

    fn step(&mut self, scenario: Scenario, price: f64) -> f64 {
        let next = match scenario {
            Scenario::Uptrend => price * (1.0 + 0.0005 + self.rng.gen_range(-0.001..0.001)),
            Scenario::Downtrend => price * (1.0 - 0.0005 + self.rng.gen_range(-0.001..0.001)),
            Scenario::Sideways => {
                // 10% pull to the base price
                let reversion = (self.base_price - price) * 0.1;
                price + reversion + price * self.rng.gen_range(-0.003..0.003)
            }
            Scenario::Volatile => price * (1.0 + self.rng.gen_range(-0.015..0.015)),
        };
        next.max(self.base_price * 0.5)
    }

    fn create_candle(&mut self, time: DateTime<Utc>, open: f64, close: f64) -> Candle {
        let wick_pct = 0.0015;
        let high = open.max(close) * (1.0 + self.rng.gen_range(0.0..wick_pct));
        let low = open.min(close) * (1.0 - self.rng.gen_range(0.0..wick_pct));
        Candle::new(time, open, high, low, close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 8, 3, 17).unwrap()
    }

    #[test]
    fn test_generate_uptrend() {
        let mut series = SyntheticSeries::new(42, 2650.0);
        let candles = series.generate(Scenario::Uptrend, 500, Timeframe::M5, start());

        assert_eq!(candles.len(), 500);
        let first = candles[0].close;
        let last = candles[499].close;
        assert!(last > first, "Uptrend should end higher: {} -> {}", first, last);
    }

    #[test]
    fn test_generate_downtrend() {
        let mut series = SyntheticSeries::new(42, 2650.0);
        let candles = series.generate(Scenario::Downtrend, 500, Timeframe::M5, start());

        let first = candles[0].close;
        let last = candles[499].close;
        assert!(last < first, "Downtrend should end lower: {} -> {}", first, last);
    }

    #[test]
    fn test_generate_sideways() {
        let mut series = SyntheticSeries::new(42, 19_900.0);
        let candles = series.generate(Scenario::Sideways, 500, Timeframe::M1, start());

        let base = series.base_price();
        for candle in &candles {
            assert!(
                candle.close > base * 0.9 && candle.close < base * 1.1,
                "Sideways should stay near base: {} vs {}",
                candle.close,
                base
            );
        }
    }

    #[test]
    fn test_timestamps_aligned_and_consecutive() {
        let mut series = SyntheticSeries::new(7, 100.0);
        let candles = series.generate(Scenario::Volatile, 50, Timeframe::M15, start());

        assert_eq!(candles[0].time, Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap());
        for pair in candles.windows(2) {
            assert_eq!((pair[1].time - pair[0].time).num_seconds(), 900);
        }
    }

    #[test]
    fn test_ohlc_consistency() {
        let mut series = SyntheticSeries::new(42, 42_500.0);
        for scenario in [Scenario::Uptrend, Scenario::Downtrend, Scenario::Sideways, Scenario::Volatile] {
            let candles = series.generate(scenario, 200, Timeframe::M1, start());
            assert!(candles.iter().all(Candle::is_well_formed));
            for pair in candles.windows(2) {
                assert_eq!(pair[1].open, pair[0].close);
            }
        }
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = SyntheticSeries::new(99, 16_900.0).generate(Scenario::Volatile, 100, Timeframe::M1, start());
        let b = SyntheticSeries::new(99, 16_900.0).generate(Scenario::Volatile, 100, Timeframe::M1, start());
        assert_eq!(a, b);
    }
}
