//! Load simulator configuration.
//!
//! Describes the synthetic announce workload replayed through the hook chain.
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimulatorConfig {
    /// Seed for the synthetic workload.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of distinct announce requests to generate.
    #[validate(range(min = 1, max = 100_000_000))]
    #[serde(default = "default_requests")]
    pub requests: usize,

    /// Number of blocking workers evaluating the chain concurrently.
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Interval (seconds) the tracker hands out before any hook runs.
    #[validate(range(min = 1, max = 86_400))]
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Minimum interval (seconds) before any hook runs.
    #[validate(range(min = 1, max = 86_400))]
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: u64,
}

fn default_seed() -> u64 {
    42
}

fn default_requests() -> usize {
    10_000
}

fn default_workers() -> usize {
    4
}

fn default_interval() -> u64 {
    1800
}

fn default_min_interval() -> u64 {
    900
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            requests: default_requests(),
            workers: default_workers(),
            interval_secs: default_interval(),
            min_interval_secs: default_min_interval(),
        }
    }
}
