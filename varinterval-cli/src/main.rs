//! ## varinterval-cli
//! **Operator interface for the interval jitter hook**
//!
//! - `check`: load and validate a configuration, then build the hook
//! - `simulate`: replay a synthetic announce workload through the hook

use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
