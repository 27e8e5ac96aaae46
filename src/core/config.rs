//! # Event loop configuration.
//!
//! [`Config`] centralizes the knobs of a run: credential variable, retry and backoff,
//! pacing between receives, dispatch order and notice bus capacity.
//!
//! ## Sentinel values
//! - `interval = 0s` → no pause between receives (the client's `receive()` is expected to block)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::{
    client::DEFAULT_TOKEN_ENV,
    handlers::DispatchOrder,
    policies::{Backoff, RetryPolicy},
};

/// Configuration for an [`EventLoop`](crate::EventLoop).
///
/// All fields are public; start from [`Config::default`] and override what you need.
#[derive(Clone, Debug)]
pub struct Config {
    /// Environment variable read by the default connector.
    pub token_env: String,

    /// Attempt limit for every connection episode.
    pub retry: RetryPolicy,

    /// Delay between failed connection attempts.
    pub backoff: Backoff,

    /// Pause after each receive-and-dispatch cycle (`0s` = none).
    pub interval: Duration,

    /// Exact-type vs wildcard handler order.
    pub order: DispatchOrder,

    /// Capacity of the notice broadcast channel.
    ///
    /// Receivers lagging by more than this many notices skip the oldest ones.
    pub bus_capacity: usize,

    /// Stop cleanly on SIGINT/SIGTERM/SIGQUIT (Ctrl-C on non-unix).
    pub handle_signals: bool,
}

impl Config {
    /// Pause between cycles as an `Option` (`None` = no pause).
    #[inline]
    pub fn pause(&self) -> Option<Duration> {
        if self.interval == Duration::ZERO {
            None
        } else {
            Some(self.interval)
        }
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `token_env = "SLACK_API_TOKEN"`
    /// - `retry = RetryPolicy::Attempts(16)`
    /// - `backoff = Backoff::default()` (truncated exponential, capped at 64s)
    /// - `interval = 0s`
    /// - `order = DispatchOrder::ExactFirst`
    /// - `bus_capacity = 1024`
    /// - `handle_signals = false`
    fn default() -> Self {
        Self {
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            retry: RetryPolicy::default(),
            backoff: Backoff::default(),
            interval: Duration::ZERO,
            order: DispatchOrder::default(),
            bus_capacity: 1024,
            handle_signals: false,
        }
    }
}
