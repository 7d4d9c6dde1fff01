// varinterval-config/src/validation.rs
//! Custom validation functions for configuration.
//!
//! Shared by the `Validate` derives and by `IntervalJitterConfig::check`.

use validator::ValidationError;

/// Validate that a probability lies in (0, 1]. NaN is rejected.
pub fn validate_probability(value: f32) -> Result<(), ValidationError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_modify_response_probability"))
    }
}

/// Validate that the maximum interval increase is strictly positive.
pub fn validate_max_delta(value: i64) -> Result<(), ValidationError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_max_increase_delta"))
    }
}

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
