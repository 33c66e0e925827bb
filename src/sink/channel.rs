use super::SignalSink;
use crate::models::Signal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Forwards signals to a tokio task, e.g. an alert notifier
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Signal>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<Signal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SignalSink for ChannelSink {
    fn add_signal(&self, signal: &Signal) {
        if self.tx.send(signal.clone()).is_err() {
            tracing::warn!("Signal receiver closed, dropping {} {}", signal.symbol, signal.pattern);
        }
    }
}
