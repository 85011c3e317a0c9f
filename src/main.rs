//! BacBoSignals - Main Entry Point
//!
//! Polls a Bac Bo results feed, runs the pattern-detection strategies on
//! every new outcome and sends signals and reports to Telegram.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use bacbo_signals::common::channels::create_outcome_channel;
use bacbo_signals::config::{load_config, validate, AppConfig};
use bacbo_signals::feed::{poller_exit, run_poller};
use bacbo_signals::{
    notify, Coordinator, HttpOutcomeSource, LogNotifier, NotificationSink, OutcomeSource,
    ReplaySource, StrategyKind,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long)]
    log_level: Option<String>,

    /// Comma-separated strategies to run (sequence, post_tie, alternation, dynamic_ratio)
    #[arg(long, value_delimiter = ',')]
    strategies: Option<Vec<String>>,

    /// Results feed URL (overrides configuration)
    #[arg(long, env = "FEED_URL")]
    feed_url: Option<String>,

    /// Replay outcomes from a JSON file instead of polling the feed
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.with_thread_ids(true).finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let mut config = load_config(Some(&args.config))?;

    init_logging(
        config.settings.effective_log_level(args.log_level.as_deref()),
        args.json_logs,
    )?;

    info!("Starting BacBoSignals application");
    info!("Configuration file: {}", args.config);

    if let Some(url) = args.feed_url {
        config.feed.url = Some(url);
    }
    if let Some(names) = &args.strategies {
        let kinds = names
            .iter()
            .map(|name| {
                StrategyKind::from_name(name)
                    .ok_or_else(|| anyhow::anyhow!("unknown strategy '{}'", name))
            })
            .collect::<Result<Vec<_>>>()?;
        config.strategies.enable_only(&kinds);
    }
    validate(&config)?;
    info!(strategies = ?config.strategies.enabled_kinds(), "Strategies enabled");

    match args.replay {
        Some(path) => run_replay(&config, &path).await,
        None => run_live(config).await,
    }
}

/// Run every outcome of a recorded file through the engine and print the
/// final status
async fn run_replay(config: &AppConfig, path: &Path) -> Result<()> {
    let mut source = ReplaySource::from_file(path)?;
    let mut coordinator = Coordinator::from_config(config, Local::now().date_naive());
    let sink = LogNotifier;

    sink.send_all(coordinator.start());
    while let Some(outcome) = source.poll_for_new_outcome().await? {
        sink.send_all(coordinator.consume(outcome));
    }

    info!(rounds = coordinator.round(), "Replay finished");
    println!("{}", serde_json::to_string_pretty(&coordinator.status())?);
    Ok(())
}

async fn run_live(config: AppConfig) -> Result<()> {
    let sink = notify::build_sink(&config.telegram)?;
    if !config.telegram.is_enabled() {
        warn!("No Telegram route configured, notifications go to the log only");
    }

    let source = HttpOutcomeSource::from_config(&config.feed)?;
    info!(url = source.url(), "Polling results feed");

    let mut coordinator = Coordinator::from_config(&config, Local::now().date_naive());
    sink.send_all(coordinator.start());

    let (outcome_tx, mut outcome_rx) = create_outcome_channel();
    let mut poller = tokio::spawn(run_poller(
        source,
        outcome_tx,
        Duration::from_millis(config.feed.startup_delay_ms),
        Duration::from_millis(config.feed.poll_interval_ms),
    ));

    let mut day_check = tokio::time::interval(Duration::from_millis(config.feed.day_check_interval_ms));
    day_check.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Application initialized successfully");

    // single consumer: one outcome is fully processed before the next
    loop {
        tokio::select! {
            received = outcome_rx.recv() => {
                let Some(outcome) = received else {
                    // the poller dropped its sender: it has finished
                    let err = poller_exit((&mut poller).await);
                    error!(error = %err, "Feed poller ended, shutting down");
                    info!(status = %serde_json::to_string(&coordinator.status())?, "Final status");
                    return Err(err.into());
                };
                info!(
                    round = coordinator.round() + 1,
                    %outcome,
                    "New outcome"
                );
                sink.send_all(coordinator.consume(outcome));
            }
            _ = day_check.tick() => {
                sink.send_all(coordinator.roll_day(Local::now().date_naive()));
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!(error = %e, "Failed to listen for shutdown signal");
                }
                info!("Received shutdown signal, cleaning up...");
                break;
            }
        }
    }

    poller.abort();
    info!(status = %serde_json::to_string(&coordinator.status())?, "Final status");
    Ok(())
}
