//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Arc<C>, Event) -> Fut`, producing a fresh
//! future per call. State shared between calls belongs in an `Arc<...>` captured by
//! the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rtmvisor::{Event, HandlerError, HandlerFn, HandlerRef, MessagingClient};
//!
//! fn echo<C: MessagingClient>() -> HandlerRef<C> {
//!     HandlerFn::arc("echo", |client: Arc<C>, event: Event| async move {
//!         if event.get_str("subtype") == Some("bot_message") {
//!             return Ok(());
//!         }
//!         let channel = event.get_str("channel").unwrap_or_default();
//!         let text = event.get_str("text").unwrap_or_default();
//!         client.send(channel, text).await?;
//!         Ok::<_, HandlerError>(())
//!     })
//! }
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::{
    error::HandlerError,
    events::Event,
    handlers::handler::{BoxHandlerFuture, Handler},
};

/// Closure-backed handler.
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as an `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<C, F, Fut> Handler<C> for HandlerFn<F>
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, client: Arc<C>, event: Event) -> BoxHandlerFuture {
        Box::pin((self.f)(client, event))
    }
}
