//! Dirsync CLI Binary
//!
//! Periodic one-way folder synchronization: copies new and changed files
//! from a source folder to a destination folder, deletes extra destination
//! files, and repeats on a fixed interval.

use anyhow::Context;
use clap::Parser;
use dirsync::config::{normalize_interval, SyncConfig};
use dirsync::engine::SyncEngine;
use dirsync::logging::init_logging;
use dirsync::observe::TracingObserver;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Dirsync - periodic one-way directory synchronization
#[derive(Parser)]
#[command(name = "dirsync")]
#[command(about = "Keep a destination folder in sync with a source folder using content hashing")]
struct Cli {
    /// Source folder (must exist)
    #[arg(long)]
    from: PathBuf,

    /// Destination folder (created if absent)
    #[arg(long)]
    to: PathBuf,

    /// Seconds between sync cycles; non-positive values fall back to the
    /// default of 5
    #[arg(long)]
    interval: Option<i64>,

    /// Log file path (lines also go to the console)
    #[arg(long)]
    log: PathBuf,

    /// Configuration file path (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bound on concurrent hash/copy/delete tasks
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    log_format: Option<String>,

    /// Run a single sync cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Some(raw) = cli.interval {
        if raw <= 0 {
            warn!(
                raw,
                fallback = config.interval_secs,
                "Non-positive interval, using default"
            );
        }
    }

    info!(
        source = %config.source.display(),
        destination = %config.destination.display(),
        interval_secs = config.interval_secs,
        "Starting periodic folder sync"
    );

    let engine = SyncEngine::new(
        config.source.clone(),
        config.destination.clone(),
        Arc::new(TracingObserver),
    )
    .with_concurrency(config.max_concurrent);

    loop {
        if let Err(e) = engine.run_cycle().await {
            // Fatal for this cycle only; the next interval retries
            error!("Sync cycle failed: {}", e);
        }

        if cli.once {
            break;
        }

        info!(
            interval_secs = config.interval_secs,
            "Waiting for next cycle"
        );
        tokio::time::sleep(Duration::from_secs(config.interval_secs)).await;
    }
}

/// Merge the optional config file, environment, and CLI arguments.
/// CLI values win; the paths and log file always come from the CLI.
fn build_config(cli: &Cli) -> anyhow::Result<SyncConfig> {
    let mut config =
        SyncConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    config.source = cli.from.clone();
    config.destination = cli.to.clone();
    config.logging.file = Some(cli.log.clone());
    if let Some(raw) = cli.interval {
        config.interval_secs = normalize_interval(raw);
    }

    if let Some(max_concurrent) = cli.max_concurrent {
        config.max_concurrent = max_concurrent;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
