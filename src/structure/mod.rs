// Market structure module
// Swing detection, trend classification and premium/discount zones

pub mod classifier;
pub mod swings;

pub use classifier::{classify_structure, premium_discount, StructureReading};
pub use swings::{detect_swings, recent_of_kind};
