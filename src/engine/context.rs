/// One (symbol, timeframe) analysis context and its detector pipeline
use super::{AnalysisState, FeedEvent};
use crate::detectors::{
    derive_optimal_trade_entries, detect_break_of_structure, detect_breakers, detect_change_of_character,
    detect_fair_value_gaps, detect_inducements, detect_liquidity_sweeps, detect_liquidity_zones,
    detect_order_blocks, detect_smart_money_reversals, kill_zones, update_breaker_mitigation, update_fvg_fills,
    update_order_block_mitigation, ScanWindow,
};
use crate::indicators::calculate_atr;
use crate::models::{Candle, ContextKey, Signal};
use crate::patterns::{scan_chart_patterns, PatternLog};
use crate::series::{BufferUpdate, SeriesBuffer};
use crate::settings::EngineConfig;
use crate::signals::{MarketSnapshot, SignalCandidate, SignalGenerator};
use crate::structure::{classify_structure, detect_swings, premium_discount};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const ATR_PERIOD: usize = 14;
const DUPLICATE_SPAN_CANDLES: i32 = 3;

/// Buffer, analysis state and signal generator owned by one context
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    key: ContextKey,
    config: Arc<EngineConfig>,
    buffer: SeriesBuffer,
    state: AnalysisState,
    patterns: PatternLog,
    generator: SignalGenerator,
}

impl AnalysisContext {
    pub fn new(key: ContextKey, config: Arc<EngineConfig>) -> Self {
        let generator = SignalGenerator::new(
            config.display_name(&key.symbol),
            key.timeframe,
            config.signals.clone(),
        );
        Self {
            buffer: SeriesBuffer::new(config.buffer.capacity),
            state: AnalysisState::default(),
            patterns: PatternLog::new(&config.patterns),
            generator,
            key,
            config,
        }
    }

    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn candles(&self) -> &[Candle] {
        self.buffer.candles()
    }

    /// Feed one inbound event; runs the pipeline when history was replaced or a new
    /// candle opened
    pub fn handle(&mut self, event: FeedEvent) -> Vec<Signal> {
        let now = match event {
            FeedEvent::History(candles) => {
                let kept = self.buffer.replace_history(candles);
                tracing::info!("{}: history replaced with {} candles", self.key, kept);
                // Zones from the previous series refer to candles that may no longer exist
                self.state = AnalysisState::default();
                self.patterns.clear();
                match self.buffer.last() {
                    Some(last) => last.time,
                    None => return Vec::new(),
                }
            }
            FeedEvent::Tick { price, time } => {
                if !self.buffer.apply_tick(price, time, self.key.timeframe).opened_candle() {
                    return Vec::new();
                }
                time
            }
            FeedEvent::CandleUpdate(candle) => match self.buffer.append_or_update(candle) {
                BufferUpdate::Appended => candle.time,
                BufferUpdate::Updated => return Vec::new(),
                BufferUpdate::Rejected => {
                    tracing::warn!("{}: dropped out-of-order or malformed candle at {}", self.key, candle.time);
                    return Vec::new();
                }
            },
        };

        self.analyze(now)
    }

    /// Run every detector once at event time `now` and return the signals produced
    pub fn analyze(&mut self, now: DateTime<Utc>) -> Vec<Signal> {
        if self.buffer.len() < self.config.buffer.min_candles {
            tracing::debug!(
                "{}: {} candles, waiting for {}",
                self.key,
                self.buffer.len(),
                self.config.buffer.min_candles
            );
            return Vec::new();
        }

        let config = Arc::clone(&self.config);
        let limits = &config.zones;
        let candles = self.buffer.candles();
        let Some(last) = candles.last().copied() else {
            return Vec::new();
        };

        let timeframe = self.key.timeframe.duration();
        let window = ScanWindow {
            cutoff: now - timeframe * limits.retention_candles as i32,
            tolerance: timeframe * DUPLICATE_SPAN_CANDLES,
        };

        let state = &mut self.state;
        state.drop_stale(window.cutoff);

        state.swings = detect_swings(candles, config.swings.lookback, config.swings.keep);
        state.structure = classify_structure(&state.swings);
        state.premium_discount = premium_discount(&state.swings, last.close);
        state.atr = calculate_atr(candles, ATR_PERIOD);

        let mut candidates: Vec<SignalCandidate> = Vec::new();

        candidates.extend(detect_order_blocks(
            candles,
            state.atr,
            &mut state.order_blocks,
            &state.retired,
            window,
        ));
        update_order_block_mitigation(&mut state.order_blocks, last.close);

        update_breaker_mitigation(&mut state.breakers, last.close);
        detect_breakers(&state.order_blocks, &mut state.breakers, &state.retired);

        candidates.extend(detect_fair_value_gaps(
            candles,
            &mut state.fair_value_gaps,
            &state.retired,
            window,
        ));
        update_fvg_fills(&mut state.fair_value_gaps, &last);
        state.optimal_entries = derive_optimal_trade_entries(&state.fair_value_gaps);

        state.liquidity_zones = detect_liquidity_zones(
            &state.swings,
            &state.liquidity_zones,
            &state.retired,
            window,
            limits.max_liquidity_zones,
        );
        candidates.extend(detect_liquidity_sweeps(
            candles,
            &mut state.liquidity_zones,
            &mut state.sweeps,
        ));

        candidates.extend(detect_break_of_structure(
            &state.swings,
            candles.len(),
            limits.signal_recency,
            limits.max_bos,
            &mut state.breaks_of_structure,
        ));
        candidates.extend(detect_change_of_character(
            &state.swings,
            candles.len(),
            limits.signal_recency,
            limits.max_choch,
            &mut state.changes_of_character,
        ));
        candidates.extend(detect_smart_money_reversals(
            candles,
            limits.max_smr,
            &mut state.reversals,
        ));
        detect_inducements(&state.swings, limits.max_inducements, &mut state.inducements);
        state.kill_zones = kill_zones(now, state.structure.trend);

        candidates.extend(scan_chart_patterns(
            candles,
            self.key.timeframe,
            &config.patterns,
            &mut self.patterns,
            now,
        ));
        state.chart_patterns = self.patterns.patterns().to_vec();

        state.drop_resolved(limits);
        state.updated_at = Some(now);
        state.cycles += 1;

        tracing::debug!(
            "{}: {} swings, {} OB, {} FVG, {} liquidity, {} BOS, {} CHoCH, {} candidates",
            self.key,
            state.swings.len(),
            state.order_blocks.len(),
            state.fair_value_gaps.len(),
            state.liquidity_zones.len(),
            state.breaks_of_structure.len(),
            state.changes_of_character.len(),
            candidates.len()
        );

        let market = MarketSnapshot {
            price: last.close,
            atr: state.atr,
            structure: state.structure.structure,
            confluence: state.confluence(),
        };
        self.generator.generate(candidates, &market, now)
    }
}
