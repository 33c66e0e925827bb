// Core modules
pub mod detectors;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod models;
pub mod patterns;
pub mod replay;
pub mod series;
pub mod settings;
pub mod signals;
pub mod sink;
pub mod structure;

// Re-export commonly used types
pub use engine::{AnalysisState, FeedEvent, Orchestrator};
pub use error::Error;
pub use models::*;
pub use settings::EngineConfig;
pub use sink::{ChannelSink, RestSignalStore, SignalBook, SignalSink};

// Error handling
pub type Result<T> = std::result::Result<T, Error>;
