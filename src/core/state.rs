//! # Run state.
//!
//! ```text
//! NotStarted ──connect ok──► Connected ──receive err──► Retrying{attempt, next_delay}
//!     │                        ▲   │                        │      │
//!     │                        └───┼────reconnect ok────────┘      │
//!     │                            │                               │
//!     │                            ▼                               ▼
//!     │                      ShuttingDown ──► Terminated(Clean)  Terminated(Fatal)
//!     └───────────── connect err, retries exhausted ──────────────────▲
//! ```

use std::time::Duration;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Stop was requested; the client was closed.
    Clean,
    /// The connection could not be (re)established.
    Fatal,
}

/// Lifecycle of one run, owned by the connection state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Connected,
    /// `attempt` connection attempts have failed; the next one waits `next_delay`.
    Retrying {
        attempt: u32,
        next_delay: Duration,
    },
    ShuttingDown,
    Terminated(Termination),
}

impl RunState {
    #[inline]
    pub fn is_terminated(&self) -> bool {
        matches!(self, RunState::Terminated(_))
    }
}
