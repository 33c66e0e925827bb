/// Candidate → Signal conversion with cooldown and duplicate suppression
use super::{blend_confidence, price_precision, ConfidenceRule, Confluence, SignalCandidate};
use crate::models::{Bias, MarketStructure, Signal, SignalStatus, Timeframe};
use crate::settings::{SignalConfig, TargetModel};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

const PIP_ENTRY_NUDGE: f64 = 0.0001;
const PIP_TARGETS: [f64; 3] = [10.0, 20.0, 30.0];
const PIP_STOP: f64 = 15.0;
const SCORED_CAP: u32 = 100;

/// Market state at the moment candidates are evaluated
#[derive(Debug, Clone, Copy)]
pub struct MarketSnapshot {
    /// Close of the newest candle; every signal enters here
    pub price: f64,
    pub atr: Option<f64>,
    pub structure: MarketStructure,
    pub confluence: Confluence,
}

/// Per-context signal generator
///
/// Cooldown: after a signal, nothing else is emitted for `cooldown_secs` of event time.
/// Duplicates: the same pattern, bias and origin is emitted at most once per
/// `duplicate_window_secs`.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    symbol: String,
    timeframe: Timeframe,
    config: SignalConfig,
    last_signal_at: Option<DateTime<Utc>>,
    emitted: Vec<EmittedKey>,
}

#[derive(Debug, Clone)]
struct EmittedKey {
    pattern: String,
    bias: Bias,
    origin: DateTime<Utc>,
    at: DateTime<Utc>,
}

impl SignalGenerator {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, config: SignalConfig) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            config,
            last_signal_at: None,
            emitted: Vec::new(),
        }
    }

    pub fn last_signal_at(&self) -> Option<DateTime<Utc>> {
        self.last_signal_at
    }

    /// Evaluate candidates in order at event time `now`
    pub fn generate(
        &mut self,
        candidates: Vec<SignalCandidate>,
        market: &MarketSnapshot,
        now: DateTime<Utc>,
    ) -> Vec<Signal> {
        let window = Duration::seconds(self.config.duplicate_window_secs);
        self.emitted.retain(|e| now - e.at < window);

        let mut signals = Vec::new();
        for candidate in candidates {
            if candidate.bias == Bias::Neutral {
                continue;
            }

            if self.is_duplicate(&candidate) {
                tracing::trace!("{} at {} already signalled", candidate.pattern, candidate.origin);
                continue;
            }

            if let Some(last) = self.last_signal_at {
                if now - last < Duration::seconds(self.config.cooldown_secs) {
                    tracing::debug!("{} suppressed by cooldown on {}", candidate.pattern, self.symbol);
                    continue;
                }
            }

            let Some(signal) = self.build(&candidate, market, now) else {
                continue;
            };

            tracing::info!(
                "Signal {} {} {} @ {} (confidence {}%)",
                signal.symbol,
                signal.timeframe,
                signal.pattern,
                signal.display().entry,
                signal.confidence
            );

            self.last_signal_at = Some(now);
            self.emitted.push(EmittedKey {
                pattern: candidate.pattern,
                bias: candidate.bias,
                origin: candidate.origin,
                at: now,
            });
            signals.push(signal);
        }

        signals
    }

    fn is_duplicate(&self, candidate: &SignalCandidate) -> bool {
        self.emitted.iter().any(|e| {
            e.pattern == candidate.pattern && e.bias == candidate.bias && e.origin == candidate.origin
        })
    }

    fn build(&self, candidate: &SignalCandidate, market: &MarketSnapshot, now: DateTime<Utc>) -> Option<Signal> {
        let (entry, targets, stop_loss) = targets(&self.config.targets, candidate.bias, market)?;

        let risk = (entry - stop_loss).abs();
        if risk <= 0.0 || !risk.is_finite() {
            return None;
        }

        let confidence = match candidate.rule {
            ConfidenceRule::Blended => candidate
                .base_confidence
                .min(blend_confidence(candidate.bias, &market.confluence, self.config.max_confidence)),
            ConfidenceRule::Scored => candidate.base_confidence.min(SCORED_CAP),
        };

        Some(Signal {
            id: Uuid::new_v4(),
            symbol: self.symbol.clone(),
            pattern: candidate.pattern.clone(),
            bias: candidate.bias,
            timeframe: self.timeframe,
            entry,
            tp1: targets[0],
            tp2: targets[1],
            tp3: targets[2],
            stop_loss,
            risk_reward: (targets[0] - entry).abs() / risk,
            confidence,
            market_structure: market.structure,
            trend: market.confluence.trend,
            zone: market.confluence.zone,
            created_at: now,
            precision: price_precision(entry),
            status: SignalStatus::Active,
        })
    }
}

/// Entry, three take-profits and the stop for `bias`
fn targets(model: &TargetModel, bias: Bias, market: &MarketSnapshot) -> Option<(f64, [f64; 3], f64)> {
    let direction = match bias {
        Bias::Bullish => 1.0,
        Bias::Bearish => -1.0,
        Bias::Neutral => return None,
    };

    match model {
        TargetModel::Atr {
            tp_multipliers,
            sl_multiplier,
        } => {
            let atr = market.atr.filter(|a| *a > 0.0)?;
            let entry = market.price;
            let tps = tp_multipliers.map(|m| entry + direction * atr * m);
            Some((entry, tps, entry - direction * atr * sl_multiplier))
        }
        TargetModel::Pips { pip_size } => {
            let entry = market.price * (1.0 + direction * PIP_ENTRY_NUDGE);
            let tps = PIP_TARGETS.map(|p| entry + direction * p * pip_size);
            Some((entry, tps, entry - direction * PIP_STOP * pip_size))
        }
    }
}
