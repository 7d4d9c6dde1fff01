//! ## varinterval-telemetry::metrics
//! **Prometheus counters for announce interval jitter**
//!
//! Recorded by callers around the hook chain, never from inside a hook.

use std::time::Duration;

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub announces: prometheus::Counter,
    pub modified_announces: prometheus::Counter,
    pub added_delay: prometheus::Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let announces = Counter::new(
            "varinterval_announces_total",
            "Announce responses seen by the hook chain",
        )?;
        let modified_announces = Counter::new(
            "varinterval_announces_modified_total",
            "Announce responses whose interval was increased",
        )?;
        let added_delay = Histogram::with_opts(
            HistogramOpts::new(
                "varinterval_added_delay_seconds",
                "Delay added to modified announce intervals",
            )
            .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        )?;

        registry.register(Box::new(announces.clone()))?;
        registry.register(Box::new(modified_announces.clone()))?;
        registry.register(Box::new(added_delay.clone()))?;

        Ok(Self {
            registry,
            announces,
            modified_announces,
            added_delay,
        })
    }

    /// Records one announce, with the added delay when it was modified.
    pub fn record_announce(&self, delta: Option<Duration>) {
        self.announces.inc();
        if let Some(delta) = delta {
            self.modified_announces.inc();
            self.added_delay.observe(delta.as_secs_f64());
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
