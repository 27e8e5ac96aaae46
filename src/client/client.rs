//! # Messaging client abstraction.
//!
//! [`MessagingClient`] is the only thing the event loop knows about the wire: it
//! connects, hands back batches of [`Event`]s, sends payloads and closes. Protocol,
//! schema and authentication handshake are entirely the implementor's business.
//!
//! All methods take `&self`: the loop holds the client as `Arc<C>` and hands clones to
//! handlers so they can [`send`](MessagingClient::send). Implementations keep their
//! socket behind interior mutability.
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use rtmvisor::{Event, MessagingClient, TransportError};
//!
//! struct Silent;
//!
//! #[async_trait]
//! impl MessagingClient for Silent {
//!     fn from_token(_token: String) -> Result<Self, TransportError> { Ok(Silent) }
//!     async fn connect(&self) -> Result<(), TransportError> { Ok(()) }
//!     async fn receive(&self) -> Result<Vec<Event>, TransportError> { Ok(Vec::new()) }
//!     async fn send(&self, _channel: &str, _payload: &str) -> Result<(), TransportError> { Ok(()) }
//!     async fn close(&self) {}
//! }
//! ```

use async_trait::async_trait;

use crate::{error::TransportError, events::Event};

/// Connection capability driven by the event loop.
#[async_trait]
pub trait MessagingClient: Send + Sync + 'static {
    /// Builds a client that authenticates with `token`.
    ///
    /// Called at most once per run, and only for token-based connectors.
    fn from_token(token: String) -> Result<Self, TransportError>
    where
        Self: Sized;

    /// Opens (or reopens) the connection.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Whether the connection is already open.
    ///
    /// The loop skips the initial `connect()` when this returns `true`, so a
    /// client connected by the caller before the run is reused as-is.
    fn is_connected(&self) -> bool {
        false
    }

    /// Waits for the next batch of events.
    ///
    /// Any `Err` is treated as a lost connection.
    async fn receive(&self) -> Result<Vec<Event>, TransportError>;

    /// Sends `payload` to `channel`.
    async fn send(&self, channel: &str, payload: &str) -> Result<(), TransportError>;

    /// Closes the connection. Must be safe to call on a closed client.
    async fn close(&self);
}
