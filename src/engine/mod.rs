// Analysis engine
// Per-context pipeline plus the orchestrator that owns every context

pub mod context;
pub mod orchestrator;
pub mod state;

pub use context::AnalysisContext;
pub use orchestrator::Orchestrator;
pub use state::AnalysisState;

use crate::models::Candle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inbound data for one context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedEvent {
    /// Full replacement of the series, e.g. after a reconnect
    History(Vec<Candle>),
    /// Single trade/quote, aggregated into the current period
    Tick { price: f64, time: DateTime<Utc> },
    /// Closed or in-progress candle from a candle stream
    CandleUpdate(Candle),
}
