use thiserror::Error;

/// Errors a hook returns to stop a [`HookChain`](crate::hook::HookChain).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The call context's deadline passed before the named hook ran. Raised by
    /// the chain, never by a hook.
    #[error("Call context cancelled before hook `{0}` ran")]
    Cancelled(&'static str),

    /// A hook refused the exchange. The interval jitter hook never returns
    /// this; it exists for hooks that filter or deny requests.
    #[error("Hook `{hook}` rejected the exchange: {reason}")]
    Rejected { hook: &'static str, reason: String },
}
