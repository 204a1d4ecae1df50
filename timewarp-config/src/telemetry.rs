//! Observability configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    #[validate(custom(function = validation::validate_log_level))]
    pub log_level: String,

    /// Minimum real time between two HUD lines while a session runs.
    #[serde(default = "default_hud_interval")]
    #[validate(range(min = 16, max = 60_000))]
    pub hud_interval_ms: u64,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_hud_interval() -> u64 {
    250
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            hud_interval_ms: default_hud_interval(),
        }
    }
}
