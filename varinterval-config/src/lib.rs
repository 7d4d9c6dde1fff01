//! # varinterval Configuration
//!
//! Hierarchical configuration for the announce interval jitter hook and the
//! tooling around it.
//!
//! ## Features
//! - **Layered loading**: defaults, YAML files, then `VARINTERVAL_*` environment
//! - **Validation**: every section is checked before it reaches a hook
//! - **Typed hook errors**: invalid hook settings surface as
//!   `ConfigError::InvalidProbability` / `ConfigError::InvalidMaxDelta`

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod hook;
mod simulator;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use hook::IntervalJitterConfig;
pub use simulator::SimulatorConfig;
pub use telemetry::TelemetryConfig;

/// Base configuration file, relative to the working directory.
pub const CONFIG_FILE: &str = "config/varinterval.yaml";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct VarIntervalConfig {
    /// Interval jitter hook settings.
    #[validate(nested)]
    #[serde(default)]
    pub hook: IntervalJitterConfig,

    /// Logging configuration.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Synthetic workload parameters.
    #[validate(nested)]
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl VarIntervalConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/varinterval.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - Environment‑specific overrides, where the
    ///    environment comes from `VARINTERVAL_ENV` (default `production`).
    /// 4. `VARINTERVAL_*` environment variables, `__` separating sections.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(VarIntervalConfig::default()));

        if Path::new(CONFIG_FILE).exists() {
            figment = figment.merge(Yaml::file(CONFIG_FILE));
        } else {
            tracing::info!("{} not found, using default configuration", CONFIG_FILE);
        }

        let env = std::env::var("VARINTERVAL_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed("VARINTERVAL_").split("__")))
    }

    /// Load configuration from a specific path, with environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Self::extract(
            Figment::from(Serialized::defaults(VarIntervalConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed("VARINTERVAL_").split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Validates every section. Hook errors are reported with their typed
    /// variants rather than as generic validation failures.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.hook.check()?;
        self.validate()?;
        Ok(())
    }
}
