use crate::models::{Candle, Timeframe};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Result of feeding one candle or tick into the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUpdate {
    /// A new period was opened
    Appended,
    /// The open (last) period was modified in place
    Updated,
    /// Malformed or out-of-order input, buffer unchanged
    Rejected,
}

impl BufferUpdate {
    pub fn opened_candle(&self) -> bool {
        matches!(self, BufferUpdate::Appended)
    }
}

/// Fixed-capacity candle series for one (symbol, timeframe) context
///
/// Candles are ordered by start time. Only the last candle may change; older
/// input is dropped. Storage is kept contiguous after every mutation so analysis can
/// borrow the whole series as a slice.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    candles: VecDeque<Candle>,
    capacity: usize,
}

impl SeriesBuffer {
    /// Create a new buffer
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of candles kept (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the whole series (e.g. after a feed reconnect)
    ///
    /// Malformed candles and candles not strictly after their predecessor are skipped.
    /// Returns the number of candles kept.
    pub fn replace_history(&mut self, candles: impl IntoIterator<Item = Candle>) -> usize {
        self.candles.clear();
        let mut skipped = 0usize;

        for candle in candles {
            let in_order = self.candles.back().map_or(true, |last| candle.time > last.time);
            if !candle.is_well_formed() || !in_order {
                skipped += 1;
                continue;
            }
            self.push_evicting(candle);
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed or out-of-order history candles", skipped);
        }

        self.candles.make_contiguous();
        self.candles.len()
    }

    /// Append a candle for a new period or replace the open one
    pub fn append_or_update(&mut self, candle: Candle) -> BufferUpdate {
        if !candle.is_well_formed() {
            tracing::warn!("Dropping malformed candle at {}", candle.time);
            return BufferUpdate::Rejected;
        }

        match self.candles.back_mut() {
            Some(last) if candle.time == last.time => {
                *last = candle;
                BufferUpdate::Updated
            }
            Some(last) if candle.time < last.time => {
                tracing::debug!(
                    "Dropping stale candle at {} (last is {})",
                    candle.time,
                    last.time
                );
                BufferUpdate::Rejected
            }
            _ => {
                self.push_evicting(candle);
                self.candles.make_contiguous();
                BufferUpdate::Appended
            }
        }
    }

    /// Aggregate a tick into the period containing `time`
    pub fn apply_tick(&mut self, price: f64, time: DateTime<Utc>, timeframe: Timeframe) -> BufferUpdate {
        if !price.is_finite() {
            tracing::warn!("Dropping non-finite tick at {}", time);
            return BufferUpdate::Rejected;
        }

        let start = timeframe.period_start(time);

        match self.candles.back_mut() {
            Some(last) if start == last.time => {
                last.close = price;
                last.high = last.high.max(price);
                last.low = last.low.min(price);
                BufferUpdate::Updated
            }
            Some(last) if start < last.time => BufferUpdate::Rejected,
            _ => {
                self.push_evicting(Candle::from_tick(start, price));
                self.candles.make_contiguous();
                BufferUpdate::Appended
            }
        }
    }

    fn push_evicting(&mut self, candle: Candle) {
        self.candles.push_back(candle);
        while self.candles.len() > self.capacity {
            self.candles.pop_front();
        }
    }

    /// All candles, oldest first
    pub fn candles(&self) -> &[Candle] {
        let (front, back) = self.candles.as_slices();
        debug_assert!(back.is_empty());
        front
    }

    /// The `n` most recent candles, oldest first
    pub fn recent(&self, n: usize) -> &[Candle] {
        let candles = self.candles();
        &candles[candles.len().saturating_sub(n)..]
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    /// Current index of the candle starting at `time`
    pub fn position_of(&self, time: DateTime<Utc>) -> Option<usize> {
        self.candles().binary_search_by(|c| c.time.cmp(&time)).ok()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }
}
