//! rv - cigarette smokers rendezvous
//!
//! Runs the protocol for a fixed wall-clock duration, then cancels every
//! actor and waits for a clean shutdown.

use clap::Parser;
use eyre::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use rendezvous::cli::Cli;
use rendezvous::config::Config;
use rendezvous::events::EventBus;
use rendezvous::system;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Fire cancellation after `run_for`, or earlier on Ctrl-C
fn spawn_shutdown_timer(run_for: std::time::Duration, cancel: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(run_for) => debug!("spawn_shutdown_timer: run time elapsed"),
            _ = tokio::signal::ctrl_c() => debug!("spawn_shutdown_timer: interrupted"),
            _ = cancel.cancelled() => return,
        }
        info!("coordinator: shutting down");
        cancel.cancel();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    debug!(?config, "main: config loaded");

    let cancel = CancellationToken::new();
    let bus = EventBus::new(config.event_capacity);
    spawn_shutdown_timer(config.run_for(), cancel.clone());

    let report = system::run(config.coordinator(), system::seeded_rng(config.seed), cancel, &bus)
        .await
        .context("Protocol aborted")?;

    info!(
        rounds = report.rounds,
        signals = report.signals_sent,
        reason = ?report.stop_reason,
        "main: run finished"
    );
    for (variant, count) in &report.completions {
        info!(%variant, count, share = report.share_of(*variant), "main: completions");
    }

    info!("main: shutdown complete");
    Ok(())
}
