//! # Jitter applied to reconnect delays.
//!
//! - [`JitterPolicy::None`] exact delay.
//! - [`JitterPolicy::Full`] random delay in `[0, delay]`.
//! - [`JitterPolicy::Equal`] `delay/2 + random[0, delay/2]`.
//! - [`JitterPolicy::Spread`] `delay + random[0, spread)`.

use rand::Rng;
use std::time::Duration;

/// Randomization of reconnect delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JitterPolicy {
    /// Use the computed delay as-is.
    #[default]
    None,

    /// Random delay in `[0, delay]`.
    Full,

    /// `delay/2 + random[0, delay/2]`.
    Equal,

    /// Adds `random[0, spread)` on top of the computed delay (millisecond granularity).
    ///
    /// The result is still clamped to the backoff maximum by the caller.
    Spread(Duration),
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
            JitterPolicy::Spread(spread) => delay.saturating_add(spread_jitter(*spread)),
        }
    }
}

fn full_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

fn equal_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    let half = ms / 2;
    if half == 0 {
        return Duration::from_millis(ms);
    }
    Duration::from_millis(half + rand::rng().random_range(0..=half))
}

fn spread_jitter(spread: Duration) -> Duration {
    let ms = spread.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..ms))
}
