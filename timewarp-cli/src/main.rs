//! ## timewarp-cli
//! **Operational interface for the warp engine**
//!
//! - `warp`: real-time session on the system clock, HUD lines until done
//! - `replay`: deterministic session on a virtual clock with a trajectory hash
//! - `project` / `periods`: static projections and the period table

use std::sync::Arc;

use clap::Parser;
use timewarp_telemetry::logging::EventLogger;
use timewarp_telemetry::metrics::MetricsRecorder;
use tracing::debug;

mod commands;
mod error;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_ref())?;
    EventLogger::init(&config.telemetry.log_level);
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Warp(args) => {
            let metrics = Arc::new(MetricsRecorder::new().map_err(error::CommandError::from)?);
            commands::run_warp(args, &config, Arc::clone(&metrics)).await?;
            let exported = metrics.gather_metrics().map_err(error::CommandError::from)?;
            debug!(metrics = %exported, "Session metrics");
        }
        Commands::Replay(args) => {
            commands::run_replay(args, &config)?;
        }
        Commands::Project(args) => commands::run_project(args, &config)?,
        Commands::Periods => commands::run_periods(),
    }
    Ok(())
}
