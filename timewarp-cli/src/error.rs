use thiserror::Error;
use timewarp_config::ConfigError;
use timewarp_core::WarpError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Warp(#[from] WarpError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Trajectory hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("Replay did not finish within {0} frames")]
    FrameLimit(u64),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_yaml::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] timewarp_telemetry::metrics::PrometheusError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
