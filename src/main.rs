//! Zasilka Worker - Route sequencing backend for the courier dispatch platform
//!
//! Connects to NATS and serves stop-list building, route timeslot
//! sequencing, coordinate corrections and notification dispatch.

mod cli;
mod config;
mod defaults;
mod handlers;
mod services;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::services::sequencer::{sequence_route, SequenceError, SequencerParams};
use crate::services::travel::HaversineEstimator;
use crate::types::Route;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "worker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,zasilka_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer()) // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Sequence { file, start }) => sequence_offline(&file, start.as_deref()).await,
        Some(Command::Serve) | None => serve().await,
    }
}

async fn serve() -> Result<()> {
    info!("Starting Zasilka Worker...");

    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    let nats_client = async_nats::connect(&config.nats_url).await?;
    info!("Connected to NATS at {}", config.nats_url);

    let handler_result = handlers::start_handlers(nats_client, &config).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Offline sequencing: read a route snapshot from a JSON file, walk it with
/// the haversine estimator and print the schedule.
async fn sequence_offline(file: &str, start: Option<&str>) -> Result<()> {
    let config = config::Config::from_env()?;

    let start_time = match start {
        Some(s) => chrono::NaiveTime::parse_from_str(s, "%H:%M")
            .with_context(|| format!("invalid start time '{}', expected HH:MM", s))?,
        None => defaults::default_day_start(),
    };

    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read route file '{}'", file))?;
    let route: Route = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse route file '{}'", file))?;

    let travel = HaversineEstimator::new();
    let params = SequencerParams::default();

    match sequence_route(&route.stops, start_time, config.depot, &params, &travel).await {
        Ok(result) => {
            for (stop, arrival) in route.stops.iter().zip(result.arrivals.iter()) {
                println!(
                    "{:>3}. {} {:<9} {}",
                    stop.position,
                    arrival.format("%H:%M"),
                    stop.kind.as_str(),
                    stop.display_label()
                );
            }
            println!("total: {} min ({:?})", result.total_minutes, result.mode);
            Ok(())
        }
        Err(SequenceError::MissingCoordinates(missing)) => {
            eprintln!("Route cannot be sequenced, {} stop(s) lack coordinates:", missing.len());
            for m in missing {
                eprintln!(
                    "  #{} {}: {}",
                    m.position,
                    m.contact_name.as_deref().unwrap_or("(no contact)"),
                    m.address.as_deref().unwrap_or("(no address)")
                );
            }
            anyhow::bail!("missing coordinates")
        }
        Err(e) => Err(e.into()),
    }
}
