use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use varinterval_config::{TelemetryConfig, VarIntervalConfig};
use varinterval_middleware::IntervalJitterHook;
use varinterval_simulator::{simulate, verify_state_hash};
use varinterval_telemetry::{EventLogger, MetricsRecorder};

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration file and build the hook from it
    Check(CheckArgs),
    /// Replay a synthetic announce workload through the hook
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(short, long)]
    pub config: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Configuration file; defaults and `config/varinterval.yaml` are used otherwise
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of announce requests (overrides the configuration)
    #[arg(long)]
    pub requests: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub workers: Option<usize>,
    /// Fail unless the run produces this state hash
    #[arg(long)]
    pub validate_hash: Option<String>,
    /// Print Prometheus metrics after the report
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<VarIntervalConfig, varinterval_config::ConfigError> {
    match path {
        Some(path) => VarIntervalConfig::load_from_path(path),
        None => VarIntervalConfig::load(),
    }
}

pub async fn run_command(cli: Cli) -> CliResult {
    // Logging starts at the default level so configuration loading is visible.
    let logger = EventLogger::init(&TelemetryConfig::default().log_level);
    match cli.command {
        Commands::Check(args) => run_check(args, &logger),
        Commands::Simulate(args) => run_simulate(args, &logger).await,
    }
}

fn run_check(args: CheckArgs, logger: &EventLogger) -> CliResult {
    let config = load_config(Some(&args.config))?;
    logger.set_level(&config.telemetry.log_level)?;

    let hook = IntervalJitterHook::new(config.hook)?;
    println!("{}: ok", args.config.display());
    print!("{}", serde_yaml::to_string(hook.config())?);
    Ok(())
}

async fn run_simulate(args: SimulateArgs, logger: &EventLogger) -> CliResult {
    let mut config = load_config(args.config.as_ref())?;
    logger.set_level(&config.telemetry.log_level)?;

    if let Some(requests) = args.requests {
        config.simulator.requests = requests;
    }
    if let Some(seed) = args.seed {
        config.simulator.seed = seed;
    }
    if let Some(workers) = args.workers {
        config.simulator.workers = workers;
    }
    config.check()?;

    let metrics = MetricsRecorder::new()?;
    let report = simulate(&config, metrics.clone()).await?;
    EventLogger::log_run(report.total, report.modified);
    print!("{}", serde_yaml::to_string(&report)?);

    if args.metrics {
        print!("{}", metrics.gather_metrics()?);
    }

    if let Some(expected) = args.validate_hash.as_deref() {
        verify_state_hash(&report, expected)?;
        tracing::info!("state hash validated");
    }
    Ok(())
}
