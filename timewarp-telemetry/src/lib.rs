//! # TimeWarp Telemetry
//!
//! Crate for logging and metrics of warp sessions.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
