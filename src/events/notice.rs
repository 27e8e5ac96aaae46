//! # Lifecycle notices emitted by the event loop.
//!
//! [`NoticeKind`] classifies what happened to the connection or to a handler;
//! [`Notice`] carries the metadata (attempt, delay, error, handler name, event type).
//!
//! ## Ordering guarantees
//! Each notice has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use rtmvisor::{Notice, NoticeKind};
//!
//! let n = Notice::new(NoticeKind::BackoffScheduled)
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(250))
//!     .with_error("connection closed");
//!
//! assert_eq!(n.kind, NoticeKind::BackoffScheduled);
//! assert_eq!(n.attempt, Some(2));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

static NOTICE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    // === Connection ===
    /// About to call `connect()`.
    ///
    /// Sets: `attempt`.
    Connecting,

    /// The client is connected (fresh connect or already connected).
    ///
    /// Sets: `attempt` (0 when the client was already connected).
    Connected,

    /// `connect()` failed.
    ///
    /// Sets: `attempt`, `error`.
    ConnectFailed,

    /// Next `connect()` scheduled after a failure.
    ///
    /// Sets: `attempt` (the failed one), `delay`, `error`.
    BackoffScheduled,

    /// `receive()` failed; a reconnect episode starts.
    ///
    /// Sets: `error`.
    ConnectionLost,

    /// The retry policy gave up.
    ///
    /// Sets: `attempt`, `error`.
    RetriesExhausted,

    // === Dispatch ===
    /// A handler returned an error.
    ///
    /// Sets: `handler`, `event_kind`, `error`.
    HandlerFailed,

    /// A handler panicked.
    ///
    /// Sets: `handler`, `event_kind`, `error` (panic message).
    HandlerPanicked,

    // === Shutdown ===
    /// Stop requested (predicate, token or OS signal).
    ShutdownRequested,

    /// The client was closed and the run is over.
    Stopped,
}

/// Lifecycle record published on the [`Bus`](crate::events::Bus).
#[derive(Debug, Clone)]
pub struct Notice {
    /// Global sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// What happened.
    pub kind: NoticeKind,
    /// Connection attempt number.
    pub attempt: Option<u32>,
    /// Scheduled delay.
    pub delay: Option<Duration>,
    /// Error or panic message.
    pub error: Option<String>,
    /// Handler name.
    pub handler: Option<String>,
    /// Type of the event being dispatched.
    pub event_kind: Option<String>,
}

impl Notice {
    /// Creates a notice stamped with the current time and the next sequence number.
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            seq: NOTICE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            attempt: None,
            delay: None,
            error: None,
            handler: None,
            event_kind: None,
        }
    }

    #[inline]
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[inline]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[inline]
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Event type, when there is one.
    #[inline]
    pub fn with_event_kind(mut self, kind: Option<&str>) -> Self {
        self.event_kind = kind.map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Notice::new(NoticeKind::Connecting);
        let b = Notice::new(NoticeKind::Connected);
        assert!(b.seq > a.seq);
    }
}
