//! Events in and notices out.
//!
//! ## Contents
//! - [`Event`] inbound record from the messaging service, typed by its `"type"` field
//! - [`NoticeKind`], [`Notice`] lifecycle records emitted by the event loop
//! - [`Bus`] broadcast channel carrying notices
//!
//! ## Quick reference
//! - **Publishers**: `core::connection::Connection` (connect/retry/shutdown),
//!   `core::dispatcher` (handler failures and panics).
//! - **Consumers**: anything holding a receiver from `EventLoop::subscribe()`.

mod bus;
mod message;
mod notice;

pub use bus::Bus;
pub use message::{Event, TYPE_FIELD};
pub use notice::{Notice, NoticeKind};
