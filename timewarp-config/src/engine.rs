//! Warp engine configuration parameters.
//!
//! Controls how the store integrates simulated time per frame and the
//! annual rate used when projecting rewards.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// How simulated time is advanced on each frame.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// Advance by a nominal `1 / frame_hz` seconds per frame regardless of
    /// how much real time actually passed.
    #[default]
    FixedStep,
    /// Advance by the real time measured between consecutive frames.
    MeasuredDelta,
}

/// Engine configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct EngineConfig {
    /// Annual reward rate in percent applied to the staked principal.
    #[serde(default = "default_rate")]
    #[validate(
        range(min = 0.0, max = 1000.0),
        custom(function = validation::validate_finite)
    )]
    pub annual_rate_percent: f64,

    /// Nominal display refresh rate driving the frame loop.
    #[serde(default = "default_frame_hz")]
    #[validate(range(min = 1, max = 240))]
    pub frame_hz: u32,

    /// Integration strategy for the per-frame step.
    #[serde(default)]
    pub integration: IntegrationMode,
}

fn default_rate() -> f64 {
    10.0
}

fn default_frame_hz() -> u32 {
    60
}

impl EngineConfig {
    /// Nominal duration of one frame in seconds.
    pub fn frame_seconds(&self) -> f64 {
        1.0 / f64::from(self.frame_hz.max(1))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            annual_rate_percent: default_rate(),
            frame_hz: default_frame_hz(),
            integration: IntegrationMode::default(),
        }
    }
}
