// Signal sinks
// Everything downstream of the generator: in-memory book, channel notifier, REST store

pub mod book;
pub mod channel;
pub mod rest;

pub use book::{SignalBook, SignalFilter, StatusCounts};
pub use channel::ChannelSink;
pub use rest::{RestSignalStore, StoredSignal};

use crate::models::Signal;

/// Receives every signal an orchestrator emits
///
/// Called synchronously from the analysis path, so implementations must not block.
pub trait SignalSink: Send + Sync {
    fn add_signal(&self, signal: &Signal);
}
