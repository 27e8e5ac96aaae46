//! Runtime core: connection lifecycle, dispatch and the run loop.
//!
//! The public API from this module is [`EventLoop`] (with its builder), its
//! [`Config`] and the [`RunState`] it moves through.
//!
//! Internal modules:
//! - [`connection`]: connect/reconnect state machine with retry and backoff;
//! - [`dispatcher`]: invokes handlers for a batch and contains their failures;
//! - [`event_loop`]: receive → dispatch → predicate cycle;
//! - [`shutdown`]: OS signal watcher.

mod builder;
mod config;
mod connection;
mod dispatcher;
mod event_loop;
mod shutdown;
mod state;

pub use builder::EventLoopBuilder;
pub use config::Config;
pub use dispatcher::{DispatchReport, dispatch};
pub use event_loop::EventLoop;
pub use state::{RunState, Termination};
