//! # rtmvisor
//!
//! **Rtmvisor** is a small event-dispatch runtime for real-time messaging clients.
//!
//! It connects a [`MessagingClient`], keeps the connection alive with
//! configurable retry and backoff, and routes every inbound [`Event`] to the
//! handlers registered for its type and to wildcard handlers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   handle("message", echo)    handle("*", debug)    register(["a", "b"], h)
//!              │                       │                       │
//!              ▼                       ▼                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventLoop                                                        │
//! │  - Registry (EventKey → ordered handlers, "*" = wildcard)         │
//! │  - Connector (token / env var / prebuilt client)                  │
//! │  - Bus (broadcast lifecycle notices)                              │
//! │  - shutdown token (+ optional OS signal watcher)                  │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                  ┌────────────────────────────┐
//!                  │  Connection                │
//!                  │  RetryPolicy + Backoff     │──── publishes Connecting,
//!                  │  RunState machine          │     ConnectFailed, BackoffScheduled,
//!                  └─────────────┬──────────────┘     ConnectionLost, RetriesExhausted
//!                                │ receive() → Vec<Event>
//!                                ▼
//!                  ┌────────────────────────────┐
//!                  │  dispatch                  │──── publishes HandlerFailed,
//!                  │  exact-type, then wildcard │     HandlerPanicked
//!                  └─────────────┬──────────────┘
//!                                ▼
//!                  handler(Arc<client>, Event)  (sequential, awaited)
//! ```
//!
//! ### Lifecycle
//! ```text
//! NotStarted ─► Connected ─► (receive err) ─► Retrying ─► Connected ...
//!                   │                             │
//!                   │ predicate false / cancel    │ attempts exhausted
//!                   ▼                             ▼
//!             ShuttingDown ─► Terminated(Clean)   Terminated(Fatal)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                           |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Client seam**   | Plug any transport in; token from env or explicit.            | [`MessagingClient`], [`Connector`]           |
//! | **Handlers**      | Closures or trait objects keyed by event type or `"*"`.       | [`Handler`], [`HandlerFn`], [`Registry`]     |
//! | **Policies**      | Attempt limits and delay strategies for reconnects.           | [`RetryPolicy`], [`Backoff`], [`JitterPolicy`] |
//! | **Run loop**      | Receive, dispatch, decide; graceful and fatal exits.          | [`EventLoop`], [`RunState`]                  |
//! | **Notices**       | Lifecycle records for observability.                          | [`Notice`], [`NoticeKind`]                   |
//! | **Errors**        | Typed errors with stable labels.                              | [`RuntimeError`], [`TransportError`], [`HandlerError`] |
//! | **Configuration** | Centralize runtime settings.                                  | [`Config`]                                   |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use rtmvisor::{Config, Connector, Event, EventLoop, HandlerError, MessagingClient};
//!
//! async fn echo_bot<C: MessagingClient>() -> Result<(), rtmvisor::RuntimeError> {
//!     let mut cfg = Config::default();
//!     cfg.handle_signals = true;
//!
//!     let lp = EventLoop::<C>::builder(cfg)
//!         .connector(Connector::EnvVar("SLACK_API_TOKEN".into()))
//!         .handle("*", |_client: Arc<C>, event: Event| async move {
//!             println!("{event:?}");
//!             Ok::<_, HandlerError>(())
//!         })
//!         .handle("message", |client: Arc<C>, event: Event| async move {
//!             let channel = event.get_str("channel").unwrap_or_default();
//!             client.send(channel, event.get_str("text").unwrap_or_default()).await?;
//!             Ok::<_, HandlerError>(())
//!         })
//!         .build();
//!
//!     lp.run().await
//! }
//! ```
mod client;
mod core;
mod error;
mod events;
mod handlers;
mod policies;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use client::{Connector, DEFAULT_TOKEN_ENV, MessagingClient};
pub use core::{Config, DispatchReport, EventLoop, EventLoopBuilder, RunState, Termination, dispatch};
pub use error::{HandlerError, RuntimeError, TransportError};
pub use events::{Bus, Event, Notice, NoticeKind, TYPE_FIELD};
pub use handlers::{
    BoxHandlerFuture, DispatchOrder, EventKey, EventKeys, Handler, HandlerFn, HandlerRef, Registry, WILDCARD,
};
pub use policies::{Backoff, BackoffPolicy, JitterPolicy, RetryPolicy};
