//! Error types used by the event loop, messaging clients and handlers.
//!
//! - [`RuntimeError`]: fatal failures that end a run abnormally.
//! - [`TransportError`]: raised by a [`MessagingClient`](crate::MessagingClient); absorbed by the retry state machine.
//! - [`HandlerError`]: raised by handlers; contained by the dispatcher.
//!
//! Every enum provides `as_label` (stable snake_case) for logs.

use thiserror::Error;

/// # Errors that terminate a run.
///
/// Credential failures happen before any connection attempt and are never retried.
/// [`RuntimeError::FailedConnection`] is returned once the retry policy is exhausted.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// No usable token: the environment variable is unset/empty, or the direct token is empty.
    #[error("missing credential: {origin}")]
    MissingCredential {
        /// Where the token was expected to come from.
        origin: String,
    },

    /// The client refused to be built from the resolved token.
    #[error("invalid credential: {error}")]
    InvalidCredential {
        /// The error reported by the client.
        error: String,
    },

    /// Every allowed connection attempt failed.
    #[error("failed to connect after {attempts} attempt(s): {source}")]
    FailedConnection {
        /// Number of `connect()` calls made in the final episode.
        attempts: u32,
        /// The last transport failure.
        #[source]
        source: TransportError,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use rtmvisor::RuntimeError;
    ///
    /// let err = RuntimeError::MissingCredential { origin: "SLACK_API_TOKEN".into() };
    /// assert_eq!(err.as_label(), "runtime_missing_credential");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::MissingCredential { .. } => "runtime_missing_credential",
            RuntimeError::InvalidCredential { .. } => "runtime_invalid_credential",
            RuntimeError::FailedConnection { .. } => "runtime_failed_connection",
        }
    }
}

/// # Errors produced by a messaging client.
///
/// Any `Err` from `connect()` or `receive()` is treated as a lost connection.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// The remote end closed the connection.
    #[error("connection closed")]
    Closed,

    /// A read or handshake timed out.
    #[error("timed out")]
    Timeout,

    /// Underlying socket failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The peer sent something the client could not make sense of.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The client does not support the requested operation.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Closed => "transport_closed",
            TransportError::Timeout => "transport_timeout",
            TransportError::Io(_) => "transport_io",
            TransportError::Protocol(_) => "transport_protocol",
            TransportError::Unsupported(_) => "transport_unsupported",
        }
    }
}

/// # Errors returned by event handlers.
///
/// Never fatal, never retried: the dispatcher logs them and moves on.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The handler could not process the event.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The handler tried to send and the transport refused.
    #[error("send failed: {0}")]
    Send(#[from] TransportError),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Fail`] from anything printable.
    ///
    /// ```
    /// use rtmvisor::HandlerError;
    ///
    /// let err = HandlerError::fail("no such channel");
    /// assert_eq!(err.to_string(), "handler failed: no such channel");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        HandlerError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Send(_) => "handler_send_failed",
        }
    }
}
