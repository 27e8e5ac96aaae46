//! Reconnect policies.
//!
//! ## Contents
//! - [`RetryPolicy`]   how many `connect()` attempts one episode may make
//! - [`BackoffPolicy`] how delays evolve (first / factor / max + jitter)
//! - [`Backoff`]       a policy or any caller function `Fn(u32) -> Duration`
//! - [`JitterPolicy`]  randomization of delays
//!
//! ## Quick wiring
//! ```text
//! Config { retry: RetryPolicy, backoff: Backoff, .. }
//!      └─► core::connection::Connection uses:
//!           - retry.allows(attempt) to decide continue/give up
//!           - backoff.delay(attempt) to schedule the next connect()
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::Attempts(16)`.
//! - `Backoff::default()` → truncated exponential, `2^n ms + random[0, 1s)`, capped at 64s.

mod backoff;
mod jitter;
mod retry;

pub use backoff::{Backoff, BackoffPolicy};
pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
