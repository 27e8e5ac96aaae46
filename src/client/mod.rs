//! # Messaging client seam.
//!
//! - [`MessagingClient`] trait implemented by transports (connect / receive / send / close)
//! - [`Connector`] where the client comes from (token, environment variable, prebuilt)

mod client;
mod connector;

pub use client::MessagingClient;
pub use connector::{Connector, DEFAULT_TOKEN_ENV};
