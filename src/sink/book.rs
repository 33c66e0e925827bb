use super::SignalSink;
use crate::models::{Bias, Signal, SignalStatus};
use chrono::{Duration, NaiveDate};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// List filters offered by the signal book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalFilter {
    #[default]
    All,
    Status(SignalStatus),
    Bias(Bias),
}

impl SignalFilter {
    pub fn matches(&self, signal: &Signal) -> bool {
        match self {
            SignalFilter::All => true,
            SignalFilter::Status(status) => signal.status == *status,
            SignalFilter::Bias(bias) => signal.bias == *bias,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub success: usize,
    pub failed: usize,
    pub breakeven: usize,
}

/// Newest-first in-memory signal history
///
/// Clones share the same list, so one handle can be registered as a sink while
/// another serves reads.
#[derive(Debug, Clone)]
pub struct SignalBook {
    signals: Arc<RwLock<Vec<Signal>>>,
    limit: usize,
}

impl SignalBook {
    pub fn new(limit: usize) -> Self {
        Self {
            signals: Arc::new(RwLock::new(Vec::new())),
            limit,
        }
    }

    // A panic while holding the lock leaves the list itself intact
    fn read(&self) -> RwLockReadGuard<'_, Vec<Signal>> {
        self.signals.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Signal>> {
        self.signals.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Signal> {
        self.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn filtered(&self, filter: SignalFilter) -> Vec<Signal> {
        self.read().iter().filter(|s| filter.matches(s)).cloned().collect()
    }

    /// Signals created on any day from `from` through `to`, both inclusive (UTC)
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Signal> {
        let start = from.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = to.and_time(chrono::NaiveTime::MIN).and_utc() + Duration::days(1);
        self.read()
            .iter()
            .filter(|s| s.created_at >= start && s.created_at < end)
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        let signals = self.read();
        let mut counts = StatusCounts {
            total: signals.len(),
            ..StatusCounts::default()
        };
        for signal in signals.iter() {
            match signal.status {
                SignalStatus::Active => counts.active += 1,
                SignalStatus::Success => counts.success += 1,
                SignalStatus::Failed => counts.failed += 1,
                SignalStatus::Breakeven => counts.breakeven += 1,
            }
        }
        counts
    }

    /// Set the outcome of a tracked signal; false when the id is unknown
    pub fn update_status(&self, id: Uuid, status: SignalStatus) -> bool {
        match self.write().iter_mut().find(|s| s.id == id) {
            Some(signal) => {
                signal.status = status;
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, id: Uuid) -> bool {
        let mut signals = self.write();
        let before = signals.len();
        signals.retain(|s| s.id != id);
        signals.len() != before
    }

    /// Replace the whole history, e.g. with what a remote store returned
    pub fn replace_all(&self, mut signals: Vec<Signal>) {
        signals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        signals.truncate(self.limit);
        *self.write() = signals;
    }
}

impl SignalSink for SignalBook {
    fn add_signal(&self, signal: &Signal) {
        let mut signals = self.write();
        signals.insert(0, signal.clone());
        signals.truncate(self.limit);
    }
}
