//! ## timewarp-core::ramp
//! **Speed multiplier as a function of real elapsed time**
//!
//! ```text
//!   multiplier
//!   86 400 ┤                 ┌────────── cruise
//!          │               ╱
//!          │             ╱   smoothstep
//!    1 000 ┤        ___╱
//!          │    __╱  ease-in
//!        1 ┼──╱─────┬────────┬──────────── real ms
//!          0       2 000    5 000
//! ```
//!
//! At cruise one real second advances the simulation by one day.

use timewarp_config::RampConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRamp {
    pub phase1_end_ms: f64,
    pub phase2_end_ms: f64,
    pub phase1_max: f64,
    pub cruise: f64,
}

impl SpeedRamp {
    pub const DEFAULT: SpeedRamp = SpeedRamp {
        phase1_end_ms: 2_000.0,
        phase2_end_ms: 5_000.0,
        phase1_max: 1_000.0,
        cruise: 86_400.0,
    };

    /// Multiplier after `real_elapsed_ms` of real time. Negative and NaN
    /// inputs are treated as zero.
    pub fn multiplier(&self, real_elapsed_ms: f64) -> f64 {
        let ms = if real_elapsed_ms.is_nan() {
            0.0
        } else {
            real_elapsed_ms.max(0.0)
        };

        if ms < self.phase1_end_ms {
            let t = ms / self.phase1_end_ms;
            return 1.0 + (self.phase1_max - 1.0) * (t * t);
        }
        if ms < self.phase2_end_ms {
            let t = (ms - self.phase1_end_ms) / (self.phase2_end_ms - self.phase1_end_ms);
            let ease = t * t * (3.0 - 2.0 * t);
            return self.phase1_max + (self.cruise - self.phase1_max) * ease;
        }
        self.cruise
    }
}

impl Default for SpeedRamp {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&RampConfig> for SpeedRamp {
    fn from(config: &RampConfig) -> Self {
        Self {
            phase1_end_ms: config.phase1_end_ms,
            phase2_end_ms: config.phase2_end_ms,
            phase1_max: config.phase1_max,
            cruise: config.cruise,
        }
    }
}

/// Default ramp: 1x → 1 000x over 2 s, → 86 400x by 5 s, then flat.
#[inline]
pub fn speed(real_elapsed_ms: f64) -> f64 {
    SpeedRamp::DEFAULT.multiplier(real_elapsed_ms)
}
