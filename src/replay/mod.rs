// Deterministic replay data
// Seeded synthetic candle series for the binary and integration tests

pub mod synthetic;

pub use synthetic::{Scenario, SyntheticSeries};
