/// Engine configuration
///
/// Every field has a default, so an empty file (or no file) yields a working engine.
/// Sources are layered: optional TOML/JSON file, then `SMC__SECTION__FIELD` environment
/// variables.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub buffer: BufferConfig,
    pub swings: SwingConfig,
    pub zones: ZoneConfig,
    pub signals: SignalConfig,
    pub patterns: PatternConfig,
    pub symbols: HashMap<String, SymbolSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer: BufferConfig::default(),
            swings: SwingConfig::default(),
            zones: ZoneConfig::default(),
            signals: SignalConfig::default(),
            patterns: PatternConfig::default(),
            symbols: default_symbols(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional file plus `SMC__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SMC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        tracing::debug!(
            "Loaded engine config: capacity={}, min_candles={}, cooldown={}s",
            config.buffer.capacity,
            config.buffer.min_candles,
            config.signals.cooldown_secs
        );
        Ok(config)
    }

    /// Human-readable instrument name, falling back to the raw symbol
    pub fn display_name(&self, symbol: &str) -> String {
        self.symbols
            .get(symbol)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| symbol.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BufferConfig {
    pub capacity: usize,    // Candles kept per context (oldest evicted)
    pub min_candles: usize, // No analysis below this length
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            min_candles: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwingConfig {
    pub lookback: usize, // Candles compared on each side
    pub keep: usize,     // Most recent swings retained
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            lookback: 7,
            keep: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoneConfig {
    pub retention_candles: u32, // Zones older than timeframe x this are dropped
    pub signal_recency: usize,  // Swing events newer than this many candles may signal
    pub max_order_blocks: usize,
    pub max_breakers: usize,
    pub max_fvgs: usize,
    pub max_liquidity_zones: usize,
    pub max_sweeps: usize,
    pub max_bos: usize,
    pub max_choch: usize,
    pub max_smr: usize,
    pub max_inducements: usize,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            retention_candles: 150,
            signal_recency: 15,
            max_order_blocks: 20,
            max_breakers: 15,
            max_fvgs: 20,
            max_liquidity_zones: 12,
            max_sweeps: 10,
            max_bos: 12,
            max_choch: 10,
            max_smr: 8,
            max_inducements: 10,
        }
    }
}

/// How take-profit and stop levels are placed around the entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum TargetModel {
    /// Multiples of ATR(14)
    Atr {
        tp_multipliers: [f64; 3],
        sl_multiplier: f64,
    },
    /// Fixed 10/20/30 pip targets, 15 pip stop
    Pips { pip_size: f64 },
}

impl Default for TargetModel {
    fn default() -> Self {
        TargetModel::Atr {
            tp_multipliers: [1.5, 2.5, 4.0],
            sl_multiplier: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    pub cooldown_secs: i64,         // Quiet period after any signal in a context
    pub duplicate_window_secs: i64, // Same pattern/bias/origin suppressed for this long
    pub max_confidence: u32,
    pub targets: TargetModel,
    pub history_limit: usize, // Signals kept by the in-memory book
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 180,
            duplicate_window_secs: 3600,
            max_confidence: 98,
            targets: TargetModel::default(),
            history_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatternConfig {
    pub window: usize,      // Recent candles scanned for chart patterns
    pub min_candles: usize, // Below this the chart-pattern pass is skipped
    pub dedup_secs: i64,    // Same-name pattern suppressed for this long
    pub keep: usize,        // Detected patterns retained
    pub expiry_secs: i64,   // Detected patterns older than this are dropped
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            window: 50,
            min_candles: 20,
            dedup_secs: 300,
            keep: 10,
            expiry_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolSpec {
    pub name: String,
    pub base_price: f64,
    pub feed_symbol: String,
}

fn default_symbols() -> HashMap<String, SymbolSpec> {
    let table = [
        ("XAUUSD", "GOLD (XAU/USD)", 2650.0, "frxXAUUSD"),
        ("GER40", "GERMANY 40 (GER40)", 19900.0, "WLDGDAXI"),
        ("US30", "DOW JONES (US30)", 42500.0, "WLDUS30"),
        ("US100", "NASDAQ 100 (US100)", 16900.0, "WLDNAS100"),
    ];

    table
        .iter()
        .map(|&(symbol, name, base_price, feed_symbol)| {
            (
                symbol.to_string(),
                SymbolSpec {
                    name: name.to_string(),
                    base_price,
                    feed_symbol: feed_symbol.to_string(),
                },
            )
        })
        .collect()
}
