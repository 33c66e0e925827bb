use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use smc_engine::replay::{Scenario, SyntheticSeries};
use smc_engine::{
    ChannelSink, ContextKey, EngineConfig, FeedEvent, Orchestrator, RestSignalStore, SignalBook, Timeframe,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

const ALERT_CONFIDENCE: u32 = 85;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a synthetic series through the SMC engine")]
struct Args {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Instrument symbol
    #[arg(short, long, default_value = "XAUUSD")]
    symbol: String,

    /// Candle period in seconds
    #[arg(short, long, default_value = "300")]
    timeframe: u32,

    /// Total candles to replay
    #[arg(short = 'n', long, default_value = "600")]
    candles: usize,

    /// Candles delivered up front as history; the rest arrive one by one
    #[arg(long, default_value = "150")]
    history: usize,

    #[arg(long, value_enum, default_value = "volatile")]
    scenario: Scenario,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Firebase-style REST store receiving every signal
    #[arg(long, env = "SMC_STORE_URL")]
    store_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let args = Args::parse();
    let config = EngineConfig::load(args.config.as_deref()).context("loading engine configuration")?;

    let timeframe = Timeframe::from_secs(args.timeframe);
    let key = ContextKey::new(args.symbol.clone(), timeframe);
    let base_price = config.symbols.get(&args.symbol).map(|s| s.base_price).unwrap_or(100.0);

    tracing::info!(
        "Replaying {} candles of {} ({:?}, seed {})",
        args.candles,
        key,
        args.scenario,
        args.seed
    );

    let start = Utc::now() - timeframe.duration() * args.candles as i32;
    let candles = SyntheticSeries::new(args.seed, base_price).generate(args.scenario, args.candles, timeframe, start);

    let book = SignalBook::new(config.signals.history_limit);
    let (channel, mut alerts) = ChannelSink::new();

    let mut orchestrator = Orchestrator::new(config);
    orchestrator.add_sink(Arc::new(book.clone()));
    orchestrator.add_sink(Arc::new(channel));
    if let Some(url) = &args.store_url {
        tracing::info!("Storing signals at {}", url);
        orchestrator.add_sink(Arc::new(RestSignalStore::new(url.as_str())));
    }

    let notifier = tokio::spawn(async move {
        let mut sent = 0usize;
        while let Some(signal) = alerts.recv().await {
            if signal.confidence >= ALERT_CONFIDENCE {
                tracing::info!(
                    "🚨 {} {} on {} at {} ({}%)",
                    signal.pattern,
                    signal.bias,
                    signal.symbol,
                    signal.display().entry,
                    signal.confidence
                );
                sent += 1;
            }
        }
        sent
    });

    orchestrator.subscribe(key.clone());
    let split = args.history.min(candles.len());
    orchestrator.handle(&key, FeedEvent::History(candles[..split].to_vec()));
    for candle in &candles[split..] {
        orchestrator.handle(&key, FeedEvent::CandleUpdate(*candle));
    }

    if let Some(state) = orchestrator.state(&key) {
        tracing::info!(
            "{}: {} cycles, structure {:?}, trend {:?}, {} active OB, {} open FVG, {} patterns",
            key,
            state.cycles,
            state.structure.structure,
            state.structure.trend,
            state.active_order_blocks().count(),
            state.open_fair_value_gaps().count(),
            state.chart_patterns.len()
        );
    }

    // Closes the channel so the notifier finishes
    drop(orchestrator);
    let alerted = notifier.await.context("alert task failed")?;

    if args.store_url.is_some() {
        // Uploads are fire-and-forget; give in-flight requests a moment
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    print_summary(&book, alerted);
    Ok(())
}

fn print_summary(book: &SignalBook, alerted: usize) {
    let counts = book.counts();
    println!("\n{} signals kept ({} high-confidence alerts)", counts.total, alerted);
    println!(
        "{:<24} {:<8} {:>5} {:>12} {:>12} {:>12} {:>6}",
        "PATTERN", "BIAS", "CONF", "ENTRY", "TP1", "SL", "R:R"
    );
    for signal in book.signals() {
        let shown = signal.display();
        println!(
            "{:<24} {:<8} {:>4}% {:>12} {:>12} {:>12} {:>6}",
            signal.pattern, signal.bias, signal.confidence, shown.entry, shown.tp1, shown.stop_loss, shown.risk_reward
        );
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smc_engine=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
