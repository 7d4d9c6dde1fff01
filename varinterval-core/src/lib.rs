//! # varinterval-core
//!
//! Foundation layer shared by the tracker hooks.
//!
//! ### Key Submodules:
//! - `bittorrent`: Announce, scrape and admin request/response types
//! - `hook`: The `Hook` trait, per-call `Context` and the `HookChain` pipeline
//! - `random`: Request-derived seed pairs and pure bounded draws
//!
//! Everything on the request path is synchronous and lock-free: hooks are
//! immutable values shared by reference, and randomness is threaded through
//! `Copy` seed pairs instead of a shared generator.

pub mod bittorrent;
pub mod error;
pub mod hook;
pub mod random;

pub mod prelude {
    pub use crate::bittorrent::*;
    pub use crate::error::*;
    pub use crate::hook::*;
    pub use crate::random::*;
}

pub use error::HookError;
