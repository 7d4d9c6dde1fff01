//! Interval jitter hook configuration.
//!
//! Mirrors the tracker's middleware block:
//!
//! ```yaml
//! hook:
//!   modify_response_probability: 0.2
//!   max_increase_delta: 60
//!   modify_min_interval: true
//! ```

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;
use crate::ConfigError;

/// Settings for the announce interval jitter hook.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Copy, PartialEq)]
pub struct IntervalJitterConfig {
    /// Probability that a given announce response is modified, in (0, 1].
    #[validate(custom(function = validation::validate_probability))]
    #[serde(default = "default_probability")]
    pub modify_response_probability: f32,

    /// Upper bound (seconds) of the added delay. Must be positive.
    #[validate(custom(function = validation::validate_max_delta))]
    #[serde(default = "default_max_delta")]
    pub max_increase_delta: i64,

    /// Whether `min_interval` is raised by the same delay.
    #[serde(default = "default_true")]
    pub modify_min_interval: bool,
}

fn default_probability() -> f32 {
    0.2
}

fn default_max_delta() -> i64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for IntervalJitterConfig {
    fn default() -> Self {
        Self {
            modify_response_probability: default_probability(),
            max_increase_delta: default_max_delta(),
            modify_min_interval: default_true(),
        }
    }
}

impl IntervalJitterConfig {
    /// Checks both numeric settings, probability first.
    pub fn check(&self) -> Result<(), ConfigError> {
        validation::validate_probability(self.modify_response_probability)
            .map_err(|_| ConfigError::InvalidProbability(self.modify_response_probability))?;
        validation::validate_max_delta(self.max_increase_delta)
            .map_err(|_| ConfigError::InvalidMaxDelta(self.max_increase_delta))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(probability: f32, max_delta: i64) -> IntervalJitterConfig {
        IntervalJitterConfig {
            modify_response_probability: probability,
            max_increase_delta: max_delta,
            modify_min_interval: false,
        }
    }

    #[test]
    fn default_config_is_valid() {
        IntervalJitterConfig::default()
            .check()
            .expect("Default config should be valid");
        IntervalJitterConfig::default()
            .validate()
            .expect("Default config should validate");
    }

    #[test]
    fn accepts_half_probability() {
        assert!(config(0.5, 10).check().is_ok());
        assert!(config(1.0, 1).check().is_ok());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        for p in [0.0, -1.0, 1.5, f32::NAN] {
            assert!(matches!(
                config(p, 10).check(),
                Err(ConfigError::InvalidProbability(_))
            ));
        }
    }

    #[test]
    fn rejects_non_positive_max_delta() {
        for d in [0, -5] {
            assert!(matches!(
                config(0.5, d).check(),
                Err(ConfigError::InvalidMaxDelta(v)) if v == d
            ));
        }
    }

    #[test]
    fn probability_is_reported_before_max_delta() {
        assert!(matches!(
            config(2.0, 0).check(),
            Err(ConfigError::InvalidProbability(_))
        ));
    }

    #[test]
    fn derive_flags_the_offending_field() {
        let errors = config(0.5, 0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("max_increase_delta"));
        assert!(!errors
            .field_errors()
            .contains_key("modify_response_probability"));
    }
}
