//! Seazr - vessel health monitor
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a batch of readings
//! seazr evaluate --readings readings.json
//!
//! # Incident and voyage report for one vessel
//! seazr report --history history.json --locations fixes.json \
//!     --vessel "Morska Vila" --from 2025-06-01T00:00:00Z --to 2025-06-08T00:00:00Z
//!
//! # One alarm sweep over a fleet snapshot
//! seazr sweep --fleet fleet.json
//!
//! # Periodic sweeps plus the HTTP API
//! CRON_SECRET=... seazr serve --fleet fleet.json
//! ```
//!
//! # Environment Variables
//!
//! - `SEAZR_CONFIG`: path to the TOML config (default: `./seazr.toml`)
//! - `SEAZR_SWEEP_INTERVAL_SECS`, `SEAZR_SERVER_ADDR`, `CRON_SECRET`: config overrides
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use seazr::api::{create_app, ApiState};
use seazr::config::MonitorConfig;
use seazr::report::build_vessel_report;
use seazr::sweep::{run_scheduler, AlarmSweep, LogDispatcher, NotificationDispatcher, WebhookDispatcher};
use seazr::telemetry::JsonFleetStore;
use seazr::types::{ingest_readings, RawReading, TimeRange, VesselLocation};
use seazr::StatusEngine;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "seazr")]
#[command(about = "Seazr vessel health monitor")]
#[command(version)]
struct CliArgs {
    /// Config file (skips the SEAZR_CONFIG / ./seazr.toml search)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Evaluate a JSON array of readings and print the vessel status
    Evaluate {
        #[arg(long)]
        readings: PathBuf,
        /// Evaluation instant (RFC 3339, default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Build a report for one vessel over a time window
    Report {
        /// JSON array of historical readings
        #[arg(long)]
        history: PathBuf,
        /// JSON array of GPS fixes
        #[arg(long)]
        locations: Option<PathBuf>,
        #[arg(long)]
        vessel: String,
        #[arg(long = "from")]
        from: DateTime<Utc>,
        #[arg(long = "to")]
        to: DateTime<Utc>,
    },

    /// Run one alarm sweep over a fleet snapshot and print the summary
    Sweep {
        #[arg(long)]
        fleet: PathBuf,
    },

    /// Serve the HTTP API and run periodic alarm sweeps
    Serve {
        /// Fleet snapshot; without it only the evaluation endpoints work
        #[arg(long)]
        fleet: Option<PathBuf>,
        /// Override the server address
        #[arg(short, long)]
        addr: Option<String>,
    },
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    match path {
        Some(p) => {
            let mut config = MonitorConfig::load_from_file(p)
                .with_context(|| format!("Failed to load config {}", p.display()))?;
            config.apply_env_overrides();
            Ok(config)
        }
        None => Ok(MonitorConfig::load()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_dispatcher(config: &MonitorConfig) -> Result<Arc<dyn NotificationDispatcher>> {
    match &config.notifications.webhook_url {
        Some(url) => {
            let timeout = Duration::from_secs(config.notifications.timeout_secs);
            let dispatcher = WebhookDispatcher::new(url, timeout).context("Failed to build webhook client")?;
            info!(url = %url, "Alerts delivered via webhook");
            Ok(Arc::new(dispatcher))
        }
        None => {
            info!("No webhook configured, alerts are logged only");
            Ok(Arc::new(LogDispatcher))
        }
    }
}

fn build_sweep(config: &MonitorConfig, fleet: &Path) -> Result<Arc<AlarmSweep>> {
    let store = Arc::new(JsonFleetStore::load(fleet).context("Failed to load fleet snapshot")?);
    Ok(Arc::new(AlarmSweep::new(
        store.clone(),
        store,
        build_dispatcher(config)?,
        StatusEngine::from_config(config),
        &config.sweep,
    )))
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_evaluate(config: &MonitorConfig, readings: &Path, now: Option<DateTime<Utc>>) -> Result<()> {
    let raw: Vec<RawReading> = read_json(readings)?;
    let readings = ingest_readings(raw).context("Invalid reading")?;
    let engine = StatusEngine::from_config(config);
    print_json(&engine.evaluate_at(&readings, now.unwrap_or_else(Utc::now)))
}

fn run_report(
    config: &MonitorConfig,
    history: &Path,
    locations: Option<&Path>,
    vessel: &str,
    range: TimeRange,
) -> Result<()> {
    if range.start > range.end {
        anyhow::bail!("--from must not be after --to");
    }
    let raw: Vec<RawReading> = read_json(history)?;
    let readings = ingest_readings(raw).context("Invalid reading in history")?;
    let fixes: Vec<VesselLocation> = match locations {
        Some(p) => read_json(p)?,
        None => Vec::new(),
    };

    let report = build_vessel_report(vessel, range, &readings, &fixes, &config.thresholds, &config.report);
    print_json(&report)
}

async fn run_sweep(config: &MonitorConfig, fleet: &Path) -> Result<()> {
    let sweep = build_sweep(config, fleet)?;
    let summary = sweep.run_once().await.context("Alarm sweep failed")?;
    print_json(&summary)
}

async fn run_serve(config: MonitorConfig, fleet: Option<&Path>, addr: Option<String>) -> Result<()> {
    let server_addr = addr.unwrap_or_else(|| config.server.addr.clone());

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut state = ApiState::new(StatusEngine::from_config(&config))
        .with_cron_secret(config.server.cron_secret.clone());

    let scheduler = match fleet {
        Some(path) => {
            let sweep = build_sweep(&config, path)?;
            state = state.with_sweep(Arc::clone(&sweep));
            let interval = Duration::from_secs(config.sweep.interval_secs);
            Some(tokio::spawn(run_scheduler(sweep, interval, cancel_token.clone())))
        }
        None => None,
    };

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("HTTP server listening on {}", server_addr);

    let server_token = cancel_token.clone();
    let result = axum::serve(listener, create_app(state))
        .with_graceful_shutdown(async move {
            server_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    // Server stopped on its own: take the scheduler down with it
    cancel_token.cancel();
    if let Some(handle) = scheduler {
        match handle.await {
            Ok(sweeps) => info!(sweeps, "Alarm scheduler finished"),
            Err(e) => error!(error = %e, "Alarm scheduler task panicked"),
        }
    }

    result.context("HTTP server error")
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.json_logs);

    let config = load_config(args.config.as_deref())?;
    info!(fleet = %config.fleet.name, "Seazr {}", env!("CARGO_PKG_VERSION"));

    match args.command {
        SubCommand::Evaluate { readings, now } => run_evaluate(&config, &readings, now),
        SubCommand::Report { history, locations, vessel, from, to } => {
            run_report(&config, &history, locations.as_deref(), &vessel, TimeRange::new(from, to))
        }
        SubCommand::Sweep { fleet } => run_sweep(&config, &fleet).await,
        SubCommand::Serve { fleet, addr } => run_serve(config, fleet.as_deref(), addr).await,
    }
}
