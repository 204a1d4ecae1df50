//! Speed ramp configuration.
//!
//! Three phases: quadratic ease-in from 1x to `phase1_max` until
//! `phase1_end_ms`, smoothstep up to `cruise` until `phase2_end_ms`, then a
//! constant `cruise` multiplier.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = validation::validate_ramp))]
pub struct RampConfig {
    /// End of the ease-in phase in real milliseconds.
    #[serde(default = "default_phase1_end")]
    #[validate(range(exclusive_min = 0.0))]
    pub phase1_end_ms: f64,

    /// End of the smoothstep phase in real milliseconds.
    #[serde(default = "default_phase2_end")]
    pub phase2_end_ms: f64,

    /// Multiplier reached at the end of the ease-in phase.
    #[serde(default = "default_phase1_max")]
    #[validate(range(min = 1.0))]
    pub phase1_max: f64,

    /// Plateau multiplier (simulated seconds per real second).
    #[serde(default = "default_cruise")]
    pub cruise: f64,
}

fn default_phase1_end() -> f64 {
    2_000.0
}

fn default_phase2_end() -> f64 {
    5_000.0
}

fn default_phase1_max() -> f64 {
    1_000.0
}

fn default_cruise() -> f64 {
    86_400.0
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            phase1_end_ms: default_phase1_end(),
            phase2_end_ms: default_phase2_end(),
            phase1_max: default_phase1_max(),
            cruise: default_cruise(),
        }
    }
}
