//! # EventLoop builder.
//!
//! [`EventLoopBuilder`] collects the connector and the handlers before the loop is
//! handed out:
//!
//! ```text
//! EventLoop::builder(cfg)
//!     .connector(Connector::Token(..))     (default: EnvVar(cfg.token_env))
//!     .handle("message", closure)          (wrapped in HandlerFn)
//!     .register(["a", "*"], handler_ref)
//!     .build()  ──► EventLoop
//! ```

use std::{future::Future, sync::Arc};

use crate::{
    client::{Connector, MessagingClient},
    core::Config,
    error::HandlerError,
    events::Event,
    handlers::{EventKeys, HandlerRef},
};
use super::event_loop::EventLoop;

/// Builder for an [`EventLoop`] with its connector and handlers.
pub struct EventLoopBuilder<C: MessagingClient> {
    inner: EventLoop<C>,
}

impl<C: MessagingClient> EventLoopBuilder<C> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            inner: EventLoop::new(cfg),
        }
    }

    /// Sets how the client is obtained.
    ///
    /// Defaults to `Connector::EnvVar(cfg.token_env)`.
    pub fn connector(mut self, connector: Connector<C>) -> Self {
        self.inner.set_connector(connector);
        self
    }

    /// Registers a closure under `keys`.
    pub fn handle<F, Fut>(mut self, keys: impl Into<EventKeys>, f: F) -> Self
    where
        F: Fn(Arc<C>, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.inner.handle(keys, f);
        self
    }

    /// Registers a prepared handler under `keys`.
    pub fn register(mut self, keys: impl Into<EventKeys>, handler: HandlerRef<C>) -> Self {
        self.inner.register(keys, handler);
        self
    }

    /// Returns the assembled loop.
    pub fn build(self) -> EventLoop<C> {
        self.inner
    }
}
