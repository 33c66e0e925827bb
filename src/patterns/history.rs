use super::ChartPattern;
use crate::settings::PatternConfig;
use chrono::{DateTime, Duration, Utc};

/// Recently detected chart patterns, newest first
///
/// A pattern is only recorded if no pattern of the same name and timeframe was recorded
/// within the de-dup window.
#[derive(Debug, Clone)]
pub struct PatternLog {
    patterns: Vec<ChartPattern>,
    keep: usize,
    dedup: Duration,
    expiry: Duration,
}

impl PatternLog {
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            patterns: Vec::new(),
            keep: config.keep.max(1),
            dedup: Duration::seconds(config.dedup_secs),
            expiry: Duration::seconds(config.expiry_secs),
        }
    }

    /// Record `pattern` unless a same-name pattern fired recently. Returns whether it was new.
    pub fn record(&mut self, pattern: ChartPattern) -> bool {
        let recent = self.patterns.iter().any(|p| {
            p.name == pattern.name
                && p.timeframe == pattern.timeframe
                && pattern.detected_at - p.detected_at < self.dedup
        });
        if recent {
            return false;
        }

        let at = pattern.detected_at;
        self.patterns.insert(0, pattern);

        // Beyond `keep`, only entries still guarding their de-dup window survive
        let (keep, dedup) = (self.keep, self.dedup);
        let mut seen = 0;
        self.patterns.retain(|p| {
            seen += 1;
            seen <= keep || at - p.detected_at < dedup
        });
        true
    }

    /// Drop patterns older than the expiry window
    pub fn expire(&mut self, now: DateTime<Utc>) {
        let expiry = self.expiry;
        self.patterns.retain(|p| now - p.detected_at < expiry);
    }

    pub fn patterns(&self) -> &[ChartPattern] {
        &self.patterns
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }
}
