// Technical indicators module
// ATR, range averages and least-squares slope used by the detectors

pub mod atr;
pub mod ranges;
pub mod regression;

pub use atr::{calculate_atr, true_range};
pub use ranges::{average_range, average_swing_range};
pub use regression::linear_slope;
