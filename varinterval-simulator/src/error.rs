use thiserror::Error;
use tokio::task::JoinError;
use varinterval_config::ConfigError;
use varinterval_core::HookError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("Worker failed: {0}")]
    Worker(#[from] JoinError),

    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}
