//! # varinterval Middleware
//!
//! Tracker hooks built on `varinterval-core`. The interval jitter hook
//! spreads client re-announces over time by adding a bounded, request-derived
//! delay to a fraction of announce responses.

pub mod varinterval;

pub use varinterval::IntervalJitterHook;
