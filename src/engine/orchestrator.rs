use super::{AnalysisContext, AnalysisState, FeedEvent};
use crate::models::{Candle, ContextKey, Signal};
use crate::settings::EngineConfig;
use crate::sink::SignalSink;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns every analysis context and fans signals out to the registered sinks
///
/// Contexts are independent; events for one never touch another's state.
pub struct Orchestrator {
    config: Arc<EngineConfig>,
    contexts: HashMap<ContextKey, AnalysisContext>,
    sinks: Vec<Arc<dyn SignalSink>>,
}

impl Orchestrator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
            contexts: HashMap::new(),
            sinks: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn add_sink(&mut self, sink: Arc<dyn SignalSink>) {
        self.sinks.push(sink);
    }

    /// Create the context for `key` if it does not exist yet
    pub fn subscribe(&mut self, key: ContextKey) {
        if !self.contexts.contains_key(&key) {
            tracing::info!("Subscribed {}", key);
            let context = AnalysisContext::new(key.clone(), Arc::clone(&self.config));
            self.contexts.insert(key, context);
        }
    }

    /// Symbol or timeframe change: discard the old context and start a fresh one
    pub fn switch(&mut self, from: &ContextKey, to: ContextKey) {
        self.teardown(from);
        // A switch always starts clean, even if `to` was already subscribed
        self.contexts.remove(&to);
        self.subscribe(to);
    }

    pub fn teardown(&mut self, key: &ContextKey) -> bool {
        let removed = self.contexts.remove(key).is_some();
        if removed {
            tracing::info!("Tore down {}", key);
        }
        removed
    }

    /// Dispatch `event` into its context and deliver any signals to every sink
    ///
    /// Events for unknown contexts are dropped.
    pub fn handle(&mut self, key: &ContextKey, event: FeedEvent) -> Vec<Signal> {
        let Some(context) = self.contexts.get_mut(key) else {
            tracing::warn!("Event for unsubscribed context {}", key);
            return Vec::new();
        };

        let signals = context.handle(event);
        for signal in &signals {
            for sink in &self.sinks {
                sink.add_signal(signal);
            }
        }
        signals
    }

    pub fn state(&self, key: &ContextKey) -> Option<&AnalysisState> {
        self.contexts.get(key).map(AnalysisContext::state)
    }

    pub fn candles(&self, key: &ContextKey) -> Option<&[Candle]> {
        self.contexts.get(key).map(AnalysisContext::candles)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextKey> {
        self.contexts.keys()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeframe;
    use chrono::{Duration, TimeZone, Utc};

    fn history(n: usize, price: f64) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| Candle::new(start + Duration::minutes(i as i64), price, price + 0.2, price - 0.2, price))
            .collect()
    }

    #[test]
    fn test_lifecycle() {
        let mut orchestrator = Orchestrator::new(EngineConfig::default());
        let gold = ContextKey::new("XAUUSD", Timeframe::M1);
        let dax = ContextKey::new("GER40", Timeframe::M5);

        orchestrator.subscribe(gold.clone());
        orchestrator.handle(&gold, FeedEvent::History(history(120, 2650.0)));
        assert_eq!(orchestrator.candles(&gold).map(|c| c.len()), Some(120));

        // Subscribing again keeps the existing state
        orchestrator.subscribe(gold.clone());
        assert_eq!(orchestrator.state(&gold).map(|s| s.cycles), Some(1));

        orchestrator.switch(&gold, dax.clone());
        assert!(orchestrator.state(&gold).is_none());
        assert_eq!(orchestrator.candles(&dax).map(|c| c.len()), Some(0));
        assert_eq!(orchestrator.len(), 1);

        assert!(orchestrator.teardown(&dax));
        assert!(!orchestrator.teardown(&dax));
        assert!(orchestrator.is_empty());
    }

    #[test]
    fn test_unknown_context_is_ignored() {
        let mut orchestrator = Orchestrator::new(EngineConfig::default());
        let key = ContextKey::new("US30", Timeframe::M1);
        assert!(orchestrator.handle(&key, FeedEvent::History(history(120, 42_500.0))).is_empty());
        assert!(orchestrator.state(&key).is_none());
    }
}
