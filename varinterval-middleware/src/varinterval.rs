//! ## varinterval-middleware::varinterval
//! **Announce interval jitter**
//!
//! For a configurable fraction of announces, adds between 1 and
//! `max_increase_delta` seconds to the re-announce interval (and optionally to
//! the minimum interval). Every decision is derived from the request itself:
//! a retried announce from the same peer for the same torrent gets the same
//! answer, and concurrent announces share nothing but the immutable config.
//!
//! Scrape and admin exchanges pass through untouched.

use std::num::NonZeroU64;
use std::time::Duration;

use varinterval_config::{ConfigError, IntervalJitterConfig};
use varinterval_core::bittorrent::{
    AdminRequest, AdminResponse, AnnounceRequest, AnnounceResponse, ScrapeRequest, ScrapeResponse,
};
use varinterval_core::hook::{Context, Hook};
use varinterval_core::random::{derive_entropy, SeedPair};
use varinterval_core::HookError;

/// Resolution of the probability draw: `p = v / 2^24` with `v` in `[0, 2^24)`.
pub const PROBABILITY_RESOLUTION: NonZeroU64 = match NonZeroU64::new(1 << 24) {
    Some(n) => n,
    None => unreachable!(),
};

/// Hook that randomly lengthens announce intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalJitterHook {
    config: IntervalJitterConfig,
    max_delta: NonZeroU64,
}

impl IntervalJitterHook {
    /// Validates `config` and builds the hook.
    pub fn new(config: IntervalJitterConfig) -> Result<Self, ConfigError> {
        config.check()?;
        let max_delta = u64::try_from(config.max_increase_delta)
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or(ConfigError::InvalidMaxDelta(config.max_increase_delta))?;

        tracing::info!(
            probability = config.modify_response_probability,
            max_increase_delta = config.max_increase_delta,
            modify_min_interval = config.modify_min_interval,
            "interval jitter hook configured"
        );

        Ok(Self { config, max_delta })
    }

    pub fn config(&self) -> &IntervalJitterConfig {
        &self.config
    }

    /// Decides, from one seed pair, whether to modify and by how much.
    ///
    /// The probability draw is always taken so that the delta draw reads the
    /// same stream position whatever the configured probability is.
    pub fn draw_delta(&self, seeds: SeedPair) -> Option<Duration> {
        let (v, seeds) = seeds.bounded(PROBABILITY_RESOLUTION);
        let p = v as f32 / PROBABILITY_RESOLUTION.get() as f32;

        let probability = self.config.modify_response_probability;
        if probability == 1.0 || p < probability {
            let (v, _) = seeds.bounded(self.max_delta);
            Some(Duration::from_secs(v + 1))
        } else {
            None
        }
    }

    /// Applies the hook's decision for `req` to `resp`, returning the delta
    /// that was added, if any.
    pub fn apply(&self, req: &AnnounceRequest, resp: &mut AnnounceResponse) -> Option<Duration> {
        let delta = self.draw_delta(derive_entropy(req))?;

        resp.interval = resp.interval.saturating_add(delta);
        if self.config.modify_min_interval {
            resp.min_interval = resp.min_interval.saturating_add(delta);
        }

        tracing::trace!(
            info_hash = %req.info_hash,
            peer_id = %req.peer.id,
            delta_secs = delta.as_secs(),
            "announce interval increased"
        );
        Some(delta)
    }
}

impl Hook for IntervalJitterHook {
    fn name(&self) -> &'static str {
        "varinterval"
    }

    fn handle_announce(
        &self,
        ctx: Context,
        req: &AnnounceRequest,
        resp: &mut AnnounceResponse,
    ) -> Result<Context, HookError> {
        self.apply(req, resp);
        Ok(ctx)
    }

    fn handle_scrape(
        &self,
        ctx: Context,
        _req: &ScrapeRequest,
        _resp: &mut ScrapeResponse,
    ) -> Result<Context, HookError> {
        // Scrapes are not altered.
        Ok(ctx)
    }

    fn handle_admin(
        &self,
        ctx: Context,
        _req: &AdminRequest,
        _resp: &mut AdminResponse,
    ) -> Result<Context, HookError> {
        // Admin queries are not altered.
        Ok(ctx)
    }
}
