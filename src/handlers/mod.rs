//! # Handlers and their registry.
//!
//! - [`Handler`] trait for callbacks taking `(Arc<client>, Event)`
//! - [`HandlerFn`] closure-backed handler
//! - [`HandlerRef`] shared handle (`Arc<dyn Handler<C>>`)
//! - [`EventKey`], [`EventKeys`] registration keys (`"*"` is the wildcard)
//! - [`Registry`], [`DispatchOrder`] key → ordered handlers

mod handler;
mod handler_fn;
mod key;
mod registry;

pub use handler::{BoxHandlerFuture, Handler, HandlerRef};
pub use handler_fn::HandlerFn;
pub use key::{EventKey, EventKeys, WILDCARD};
pub use registry::{DispatchOrder, Registry};
