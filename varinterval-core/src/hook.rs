//! ## varinterval-core::hook
//! **Interception pipeline for tracker exchanges**
//!
//! A `Hook` sees every exchange kind: announce, scrape and admin. Hooks that
//! only care about one kind implement the others as pass-throughs. The
//! `HookChain` runs hooks in registration order and stops at the first error.

use std::sync::Arc;
use std::time::Instant;

use crate::bittorrent::{
    AdminRequest, AdminResponse, AnnounceRequest, AnnounceResponse, ScrapeRequest, ScrapeResponse,
};
use crate::error::HookError;

/// Per-call context threaded through every hook of a chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that counts as cancelled once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Interception point for tracker exchanges.
///
/// Implementations must not block: they run inline on the request path and
/// may be called concurrently from many workers.
pub trait Hook: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    fn handle_announce(
        &self,
        ctx: Context,
        req: &AnnounceRequest,
        resp: &mut AnnounceResponse,
    ) -> Result<Context, HookError>;

    fn handle_scrape(
        &self,
        ctx: Context,
        req: &ScrapeRequest,
        resp: &mut ScrapeResponse,
    ) -> Result<Context, HookError>;

    fn handle_admin(
        &self,
        ctx: Context,
        req: &AdminRequest,
        resp: &mut AdminResponse,
    ) -> Result<Context, HookError>;
}

/// Ordered list of hooks sharing one exchange.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookChain {
    pub fn new(hooks: Vec<Arc<dyn Hook>>) -> Self {
        Self { hooks }
    }

    pub fn push(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    fn each<F>(&self, mut ctx: Context, mut call: F) -> Result<Context, HookError>
    where
        F: FnMut(&dyn Hook, Context) -> Result<Context, HookError>,
    {
        for hook in &self.hooks {
            if ctx.is_cancelled() {
                tracing::debug!(hook = hook.name(), "context cancelled, stopping chain");
                return Err(HookError::Cancelled(hook.name()));
            }
            ctx = call(hook.as_ref(), ctx)?;
        }
        Ok(ctx)
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.name()))
            .finish()
    }
}

impl Hook for HookChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn handle_announce(
        &self,
        ctx: Context,
        req: &AnnounceRequest,
        resp: &mut AnnounceResponse,
    ) -> Result<Context, HookError> {
        self.each(ctx, |hook, ctx| hook.handle_announce(ctx, req, resp))
    }

    fn handle_scrape(
        &self,
        ctx: Context,
        req: &ScrapeRequest,
        resp: &mut ScrapeResponse,
    ) -> Result<Context, HookError> {
        self.each(ctx, |hook, ctx| hook.handle_scrape(ctx, req, resp))
    }

    fn handle_admin(
        &self,
        ctx: Context,
        req: &AdminRequest,
        resp: &mut AdminResponse,
    ) -> Result<Context, HookError> {
        self.each(ctx, |hook, ctx| hook.handle_admin(ctx, req, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bittorrent::{InfoHash, Peer, PeerId};
    use std::time::Duration;

    /// Adds one second to the interval so ordering is observable.
    struct AddSecond;

    impl Hook for AddSecond {
        fn name(&self) -> &'static str {
            "add_second"
        }

        fn handle_announce(
            &self,
            ctx: Context,
            _req: &AnnounceRequest,
            resp: &mut AnnounceResponse,
        ) -> Result<Context, HookError> {
            resp.interval += Duration::from_secs(1);
            Ok(ctx)
        }

        fn handle_scrape(
            &self,
            ctx: Context,
            _req: &ScrapeRequest,
            _resp: &mut ScrapeResponse,
        ) -> Result<Context, HookError> {
            Ok(ctx)
        }

        fn handle_admin(
            &self,
            ctx: Context,
            _req: &AdminRequest,
            _resp: &mut AdminResponse,
        ) -> Result<Context, HookError> {
            Ok(ctx)
        }
    }

    struct Reject;

    impl Hook for Reject {
        fn name(&self) -> &'static str {
            "reject"
        }

        fn handle_announce(
            &self,
            _ctx: Context,
            _req: &AnnounceRequest,
            _resp: &mut AnnounceResponse,
        ) -> Result<Context, HookError> {
            Err(HookError::Rejected {
                hook: "reject",
                reason: "unregistered torrent".into(),
            })
        }

        fn handle_scrape(
            &self,
            ctx: Context,
            _req: &ScrapeRequest,
            _resp: &mut ScrapeResponse,
        ) -> Result<Context, HookError> {
            Ok(ctx)
        }

        fn handle_admin(
            &self,
            ctx: Context,
            _req: &AdminRequest,
            _resp: &mut AdminResponse,
        ) -> Result<Context, HookError> {
            Ok(ctx)
        }
    }

    fn request() -> AnnounceRequest {
        AnnounceRequest {
            info_hash: InfoHash([1; 20]),
            peer: Peer {
                id: PeerId([2; 20]),
                addr: "127.0.0.1:6881".parse().unwrap(),
            },
            event: Default::default(),
            uploaded: 0,
            downloaded: 0,
            left: 0,
            num_want: 50,
            compact: true,
        }
    }

    #[test]
    fn chain_runs_hooks_in_order() {
        let chain = HookChain::new(vec![Arc::new(AddSecond), Arc::new(AddSecond)]);
        let mut resp = AnnounceResponse::default();
        chain
            .handle_announce(Context::new(), &request(), &mut resp)
            .unwrap();
        assert_eq!(resp.interval, Duration::from_secs(2));
    }

    #[test]
    fn chain_stops_at_first_error() {
        let chain = HookChain::new(vec![
            Arc::new(AddSecond),
            Arc::new(Reject),
            Arc::new(AddSecond),
        ]);
        let mut resp = AnnounceResponse::default();
        let err = chain
            .handle_announce(Context::new(), &request(), &mut resp)
            .unwrap_err();
        assert!(matches!(err, HookError::Rejected { hook: "reject", .. }));
        assert_eq!(resp.interval, Duration::from_secs(1));
    }

    #[test]
    fn cancelled_context_short_circuits() {
        let ctx = Context::with_deadline(Instant::now() - Duration::from_millis(1));
        let chain = HookChain::new(vec![Arc::new(AddSecond)]);
        let mut resp = AnnounceResponse::default();
        let err = chain.handle_announce(ctx, &request(), &mut resp).unwrap_err();
        assert_eq!(err, HookError::Cancelled("add_second"));
        assert_eq!(resp.interval, Duration::ZERO);
    }

    #[test]
    fn empty_chain_passes_through() {
        let chain = HookChain::default();
        assert!(chain.is_empty());
        let mut resp = ScrapeResponse::default();
        chain
            .handle_scrape(Context::new(), &ScrapeRequest::default(), &mut resp)
            .unwrap();
        assert!(resp.files.is_empty());
    }
}
