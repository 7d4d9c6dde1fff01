//! ## varinterval-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` takes precedence over the configured default level. The level
//! can be changed after start-up, so logging is available while the
//! configuration that names the final level is still being loaded.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

#[derive(Clone)]
pub struct EventLogger {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl EventLogger {
    /// Installs the global subscriber. If one is already installed, it is
    /// kept and the returned logger cannot change its level.
    pub fn init(default_level: &str) -> Self {
        let (filter, handle) = reload::Layer::new(Self::filter(default_level));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init();
        Self { filter: handle }
    }

    /// Switches to `level`, unless `RUST_LOG` is set.
    pub fn set_level(&self, level: &str) -> Result<(), reload::Error> {
        self.filter.reload(Self::filter(level))
    }

    fn filter(default_level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    }

    /// Logs one simulated or live run summary.
    pub fn log_run(total: u64, modified: u64) {
        let span = tracing::info_span!("varinterval_run", total, modified);
        let _guard = span.enter();
        tracing::info!(total, modified, "announce batch processed");
    }
}
