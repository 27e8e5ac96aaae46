//! # Handler abstraction.
//!
//! A [`Handler`] receives a shared client handle and an owned [`Event`] and returns a
//! boxed future. Each call produces a fresh future that owns its inputs, so a handler
//! can be awaited without borrowing the event loop.
//!
//! Handlers may [`send`](crate::MessagingClient::send) through the client; they must
//! not close it.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{error::HandlerError, events::Event};

/// Boxed future returned by [`Handler::call`].
pub type BoxHandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'static>>;

/// Shared handler reference as stored in the registry.
pub type HandlerRef<C> = Arc<dyn Handler<C>>;

/// Callback invoked for matching events.
pub trait Handler<C>: Send + Sync + 'static {
    /// Stable, human-readable name used in logs and notices.
    fn name(&self) -> &str;

    /// Starts handling `event`.
    fn call(&self, client: Arc<C>, event: Event) -> BoxHandlerFuture;
}
