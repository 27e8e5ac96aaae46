//! # Backoff between reconnect attempts.
//!
//! [`BackoffPolicy`] computes `first × factor^attempt`, clamps it to `max`, applies
//! jitter and clamps again. [`Backoff`] is what the event loop actually holds: either
//! a policy or any caller function `Fn(u32) -> Duration`.
//!
//! Attempts are **1-based**: the wait after the first failed `connect()` is `delay(1)`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use rtmvisor::{Backoff, BackoffPolicy, JitterPolicy};
//!
//! let policy = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//! assert_eq!(policy.next(1), Duration::from_millis(200));
//! assert_eq!(policy.next(10), Duration::from_secs(10));
//!
//! let fixed = Backoff::custom(|_attempt| Duration::from_secs(1));
//! assert_eq!(fixed.delay(7), Duration::from_secs(1));
//! ```

use std::{fmt, sync::Arc, time::Duration};

use crate::policies::jitter::JitterPolicy;

/// Exponential backoff parameters.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay for attempt `0`; later attempts multiply it by `factor`.
    pub first: Duration,
    /// Upper bound for any delay, jitter included.
    pub max: Duration,
    /// Multiplicative growth factor (`1.0` = constant delay).
    pub factor: f64,
    /// Randomization applied after clamping.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 100ms, capped at 30s, no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Truncated exponential backoff: `2^attempt ms + random[0, 1000) ms`, capped at 64s.
    pub fn truncated_exponential() -> Self {
        Self {
            first: Duration::from_millis(1),
            max: Duration::from_secs(64),
            factor: 2.0,
            jitter: JitterPolicy::Spread(Duration::from_secs(1)),
        }
    }

    /// Fixed delay between attempts.
    pub fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay for the given attempt.
    ///
    /// Non-finite or negative intermediate values collapse to `max`.
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base).min(self.max)
    }
}

/// Delay function used between reconnect attempts.
#[derive(Clone)]
pub enum Backoff {
    /// Exponential policy (see [`BackoffPolicy`]).
    Policy(BackoffPolicy),
    /// Caller-provided mapping from attempt number to delay.
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Backoff {
    /// Wraps a caller function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Backoff::Custom(Arc::new(f))
    }

    /// No wait between attempts.
    pub fn none() -> Self {
        Backoff::Policy(BackoffPolicy::constant(Duration::ZERO))
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Policy(policy) => policy.next(attempt),
            Backoff::Custom(f) => f(attempt),
        }
    }
}

impl Default for Backoff {
    /// [`BackoffPolicy::truncated_exponential`].
    fn default() -> Self {
        Backoff::Policy(BackoffPolicy::truncated_exponential())
    }
}

impl From<BackoffPolicy> for Backoff {
    fn from(policy: BackoffPolicy) -> Self {
        Backoff::Policy(policy)
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backoff::Policy(policy) => f.debug_tuple("Policy").field(policy).finish(),
            Backoff::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
