// varinterval-simulator/src/lib.rs

/*!
# varinterval Simulator

Replays a deterministic synthetic announce workload through a hook chain and
reports how the responses were modified.

## Key Components:
- **Workload:** Seeded population of torrents and peers (`workload`).
- **Workers:** The chain is evaluated on several blocking tasks at once,
  the same way tracker workers would call it.
- **State hash:** BLAKE3 over every response's intervals in request order,
  independent of how the work was sharded.
*/

use std::sync::Arc;
use std::time::Duration;

use blake3::Hasher;
use serde::Serialize;

use varinterval_config::VarIntervalConfig;
use varinterval_core::bittorrent::{AnnounceRequest, AnnounceResponse};
use varinterval_core::hook::{Context, Hook, HookChain};
use varinterval_middleware::IntervalJitterHook;
use varinterval_telemetry::MetricsRecorder;

pub mod error;
pub mod workload;

pub use error::SimulationError;
pub use workload::generate_requests;

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub total: u64,
    pub modified: u64,
    pub modify_rate: f64,
    pub min_delta_secs: Option<u64>,
    pub max_delta_secs: Option<u64>,
    /// Every modified response moved `min_interval` by the same delta as
    /// `interval`.
    pub min_interval_coupled: bool,
    pub state_hash: String,
}

/// Drives announce workloads through a shared hook chain.
pub struct Simulator {
    chain: Arc<HookChain>,
    metrics: MetricsRecorder,
}

impl Simulator {
    pub fn new(chain: Arc<HookChain>, metrics: MetricsRecorder) -> Self {
        Self { chain, metrics }
    }

    /// Builds a simulator whose chain holds a single jitter hook from `config`.
    pub fn from_config(
        config: &VarIntervalConfig,
        metrics: MetricsRecorder,
    ) -> Result<Self, SimulationError> {
        let hook = IntervalJitterHook::new(config.hook)?;
        let chain = HookChain::new(vec![Arc::new(hook)]);
        Ok(Self::new(Arc::new(chain), metrics))
    }

    /// Runs every request through the chain, starting each response from
    /// `base`, spread over `workers` blocking tasks.
    pub async fn run(
        &self,
        requests: Arc<Vec<AnnounceRequest>>,
        base: AnnounceResponse,
        workers: usize,
    ) -> Result<SimulationReport, SimulationError> {
        let workers = workers.max(1);
        let shard_len = requests.len().div_ceil(workers).max(1);

        let mut handles = Vec::with_capacity(workers);
        for start in (0..requests.len()).step_by(shard_len) {
            let end = (start + shard_len).min(requests.len());
            let chain = Arc::clone(&self.chain);
            let requests = Arc::clone(&requests);
            let base = base.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                requests[start..end]
                    .iter()
                    .map(|req| -> Result<AnnounceResponse, SimulationError> {
                        let mut resp = base.clone();
                        chain.handle_announce(Context::new(), req, &mut resp)?;
                        Ok(resp)
                    })
                    .collect::<Result<Vec<_>, _>>()
            }));
        }

        let mut responses = Vec::with_capacity(requests.len());
        for handle in handles {
            responses.extend(handle.await??);
        }

        let report = self.summarize(&base, &responses);
        tracing::info!(
            total = report.total,
            modified = report.modified,
            rate = report.modify_rate,
            state_hash = %report.state_hash,
            "simulation complete"
        );
        Ok(report)
    }

    fn summarize(&self, base: &AnnounceResponse, responses: &[AnnounceResponse]) -> SimulationReport {
        let mut hasher = Hasher::new();
        let mut modified = 0u64;
        let mut min_delta: Option<u64> = None;
        let mut max_delta: Option<u64> = None;
        let mut coupled = true;

        for resp in responses {
            hasher.update(&resp.interval.as_nanos().to_le_bytes());
            hasher.update(&resp.min_interval.as_nanos().to_le_bytes());

            let delta = resp.interval.saturating_sub(base.interval);
            if delta.is_zero() {
                self.metrics.record_announce(None);
                continue;
            }

            self.metrics.record_announce(Some(delta));
            modified += 1;
            let secs = delta.as_secs();
            min_delta = Some(min_delta.map_or(secs, |m| m.min(secs)));
            max_delta = Some(max_delta.map_or(secs, |m| m.max(secs)));
            coupled &= resp.min_interval.saturating_sub(base.min_interval) == delta;
        }

        let total = responses.len() as u64;
        SimulationReport {
            total,
            modified,
            modify_rate: if total == 0 {
                0.0
            } else {
                modified as f64 / total as f64
            },
            min_delta_secs: min_delta,
            max_delta_secs: max_delta,
            min_interval_coupled: coupled,
            state_hash: hex::encode(hasher.finalize().as_bytes()),
        }
    }
}

/// Generates the configured workload and runs it through a jitter hook.
pub async fn simulate(
    config: &VarIntervalConfig,
    metrics: MetricsRecorder,
) -> Result<SimulationReport, SimulationError> {
    let sim = &config.simulator;
    let simulator = Simulator::from_config(config, metrics)?;
    let requests = Arc::new(generate_requests(sim.seed, sim.requests));
    let base = AnnounceResponse::with_intervals(
        Duration::from_secs(sim.interval_secs),
        Duration::from_secs(sim.min_interval_secs),
    );
    simulator.run(requests, base, sim.workers).await
}

/// Fails with `HashMismatch` unless `report` carries the `expected` hash.
pub fn verify_state_hash(report: &SimulationReport, expected: &str) -> Result<(), SimulationError> {
    if report.state_hash.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(SimulationError::HashMismatch {
            expected: expected.to_string(),
            actual: report.state_hash.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varinterval_config::IntervalJitterConfig;

    fn config(probability: f32, max_delta: i64, modify_min_interval: bool) -> VarIntervalConfig {
        let mut config = VarIntervalConfig::default();
        config.hook = IntervalJitterConfig {
            modify_response_probability: probability,
            max_increase_delta: max_delta,
            modify_min_interval,
        };
        config.simulator.requests = 5_000;
        config
    }

    #[tokio::test]
    async fn unconditional_run_modifies_everything() {
        let report = simulate(&config(1.0, 5, true), MetricsRecorder::new().unwrap())
            .await
            .unwrap();
        assert_eq!(report.total, 5_000);
        assert_eq!(report.modified, 5_000);
        assert!(report.min_interval_coupled);
        assert!(report.min_delta_secs.unwrap() >= 1);
        assert!(report.max_delta_secs.unwrap() <= 5);
    }

    #[tokio::test]
    async fn rate_tracks_probability() {
        let report = simulate(&config(0.25, 60, false), MetricsRecorder::new().unwrap())
            .await
            .unwrap();
        assert!((report.modify_rate - 0.25).abs() < 0.03, "{report:?}");
        assert!(!report.min_interval_coupled);
    }

    #[tokio::test]
    async fn hash_independent_of_worker_count() {
        let mut one = config(0.5, 60, true);
        one.simulator.workers = 1;
        let mut many = config(0.5, 60, true);
        many.simulator.workers = 7;

        let a = simulate(&one, MetricsRecorder::new().unwrap()).await.unwrap();
        let b = simulate(&many, MetricsRecorder::new().unwrap()).await.unwrap();
        assert_eq!(a, b);
        verify_state_hash(&b, &a.state_hash).unwrap();
    }

    #[tokio::test]
    async fn metrics_follow_the_report() {
        let metrics = MetricsRecorder::new().unwrap();
        let report = simulate(&config(0.5, 60, true), metrics.clone())
            .await
            .unwrap();
        assert_eq!(metrics.announces.get() as u64, report.total);
        assert_eq!(metrics.modified_announces.get() as u64, report.modified);
    }

    #[test]
    fn mismatched_hash_is_an_error() {
        let report = SimulationReport {
            total: 0,
            modified: 0,
            modify_rate: 0.0,
            min_delta_secs: None,
            max_delta_secs: None,
            min_interval_coupled: true,
            state_hash: "abc".into(),
        };
        assert!(matches!(
            verify_state_hash(&report, "def"),
            Err(SimulationError::HashMismatch { .. })
        ));
    }

    #[test]
    fn invalid_hook_config_is_rejected() {
        let err = Simulator::from_config(&config(0.0, 60, true), MetricsRecorder::new().unwrap())
            .err()
            .unwrap();
        assert!(matches!(err, SimulationError::Config(_)));
    }
}
