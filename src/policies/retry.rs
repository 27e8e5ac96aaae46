//! # Reconnect attempt limits.
//!
//! [`RetryPolicy`] bounds how many times `connect()` is called in one connection
//! episode (the initial connect, or a reconnect after the link dropped).
//!
//! ```text
//! RetryPolicy::Never        → one attempt, fail immediately
//! RetryPolicy::Attempts(n)  → up to n attempts (0 is treated as 1)
//! RetryPolicy::Unbounded    → keep trying until cancelled
//! ```

/// How many connection attempts one episode may make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// A single attempt; a failure is fatal.
    Never,
    /// At most this many attempts.
    Attempts(u32),
    /// Retry forever; only cancellation ends the episode.
    Unbounded,
}

impl Default for RetryPolicy {
    /// `Attempts(16)`.
    fn default() -> Self {
        RetryPolicy::Attempts(16)
    }
}

impl RetryPolicy {
    /// Attempt limit as an `Option` (`None` = unbounded).
    #[inline]
    pub fn limit(&self) -> Option<u32> {
        match self {
            RetryPolicy::Never => Some(1),
            RetryPolicy::Attempts(n) => Some((*n).max(1)),
            RetryPolicy::Unbounded => None,
        }
    }

    /// Whether another attempt is allowed after `attempts` failures.
    #[inline]
    pub fn allows(&self, attempts: u32) -> bool {
        self.limit().is_none_or(|limit| attempts < limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_clamps_to_one() {
        assert_eq!(RetryPolicy::Attempts(0).limit(), Some(1));
        assert!(!RetryPolicy::Attempts(0).allows(1));
    }

    #[test]
    fn never_allows_single_attempt() {
        assert!(!RetryPolicy::Never.allows(1));
    }

    #[test]
    fn unbounded_always_allows() {
        assert!(RetryPolicy::Unbounded.allows(u32::MAX));
    }
}
