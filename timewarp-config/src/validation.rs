//! Custom validation functions for configuration.

use validator::ValidationError;

use crate::RampConfig;

/// Validate that the ramp phases are ordered and the multipliers never decrease.
pub fn validate_ramp(ramp: &RampConfig) -> Result<(), ValidationError> {
    let breakpoints = [ramp.phase1_end_ms, ramp.phase2_end_ms, ramp.phase1_max, ramp.cruise];
    if breakpoints.iter().any(|value| !value.is_finite()) {
        let mut err = ValidationError::new("ramp_not_finite");
        err.message = Some("ramp breakpoints and multipliers must be finite".into());
        return Err(err);
    }
    let ordered = ramp.phase1_end_ms > 0.0 && ramp.phase2_end_ms > ramp.phase1_end_ms;
    if !ordered {
        let mut err = ValidationError::new("ramp_phase_order");
        err.message = Some("ramp phase1_end_ms must be positive and below phase2_end_ms".into());
        return Err(err);
    }
    if !(ramp.phase1_max >= 1.0 && ramp.cruise >= ramp.phase1_max) {
        let mut err = ValidationError::new("ramp_multiplier_order");
        err.message = Some("ramp multipliers must satisfy 1 <= phase1_max <= cruise".into());
        return Err(err);
    }
    Ok(())
}

/// Reject NaN and infinities, which slip past range checks.
pub fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^(?i)(trace|debug|info|warn|error)$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
