//! # TimeWarp Configuration System
//!
//! Hierarchical configuration for the warp engine and its tooling.
//!
//! ## Features
//! - **Unified Configuration**: one document for engine, ramp and telemetry settings
//! - **Validation**: range checks plus cross-field checks on the speed ramp
//! - **Environment Awareness**: per-environment YAML overrides and `TIMEWARP_*` variables

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod engine;
mod error;
mod ramp;
mod telemetry;
mod validation;

pub use engine::EngineConfig;
pub use engine::IntegrationMode;
pub use error::ConfigError;
pub use ramp::RampConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/timewarp.yaml";
const ENV_PREFIX: &str = "TIMEWARP_";

/// Top‑level configuration container for all TimeWarp components.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct TimeWarpConfig {
    /// Integration and reward parameters of the warp store.
    #[validate(nested)]
    #[serde(default)]
    pub engine: EngineConfig,

    /// Breakpoints and plateaus of the speed ramp.
    #[validate(nested)]
    #[serde(default)]
    pub ramp: RampConfig,

    /// Logging and HUD output.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl TimeWarpConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/timewarp.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - Environment‑specific overrides (`TIMEWARP_ENV`).
    /// 4. `TIMEWARP_*` environment variables, `__` separating nested keys.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(TimeWarpConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("TIMEWARP_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific path, still honoring environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment = Figment::from(Serialized::defaults(TimeWarpConfig::default()))
            .merge(Yaml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
