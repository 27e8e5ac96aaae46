//! # Credential resolution.
//!
//! A [`Connector`] says where the authenticated client comes from. It is resolved
//! exactly once per run, before the first connection attempt:
//!
//! ```text
//! Connector::Token(t)     → t empty?  MissingCredential : C::from_token(t)
//! Connector::EnvVar(name) → unset/empty? MissingCredential : C::from_token($name)
//! Connector::Client(c)    → c, untouched
//! ```
//!
//! `C::from_token` failing yields [`RuntimeError::InvalidCredential`]. Neither
//! credential error is retried.

use std::{fmt, sync::Arc};

use crate::{client::MessagingClient, error::RuntimeError};

/// Default environment variable holding the API token.
pub const DEFAULT_TOKEN_ENV: &str = "SLACK_API_TOKEN";

/// Source of the messaging client for a run.
pub enum Connector<C> {
    /// Build a client from this token.
    Token(String),
    /// Build a client from the token stored in this environment variable.
    EnvVar(String),
    /// Use this client as-is.
    Client(Arc<C>),
}

impl<C: MessagingClient> Connector<C> {
    /// Wraps an already-constructed client.
    pub fn client(client: C) -> Self {
        Connector::Client(Arc::new(client))
    }

    /// Resolves against the process environment.
    pub fn resolve(&self) -> Result<Arc<C>, RuntimeError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolves with a custom environment lookup.
    pub fn resolve_with<L>(&self, lookup: L) -> Result<Arc<C>, RuntimeError>
    where
        L: FnOnce(&str) -> Option<String>,
    {
        let token = match self {
            Connector::Client(client) => return Ok(Arc::clone(client)),
            Connector::Token(token) if token.is_empty() => {
                return Err(RuntimeError::MissingCredential {
                    origin: "the empty string is not a valid token".to_string(),
                });
            }
            Connector::Token(token) => token.clone(),
            Connector::EnvVar(name) => match lookup(name) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    return Err(RuntimeError::MissingCredential {
                        origin: format!("could not acquire token from {name}"),
                    });
                }
            },
        };

        C::from_token(token)
            .map(Arc::new)
            .map_err(|e| RuntimeError::InvalidCredential {
                error: e.to_string(),
            })
    }
}

impl<C> Default for Connector<C> {
    /// `EnvVar(DEFAULT_TOKEN_ENV)`.
    fn default() -> Self {
        Connector::EnvVar(DEFAULT_TOKEN_ENV.to_string())
    }
}

impl<C> fmt::Debug for Connector<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connector::Token(_) => f.write_str("Token(***)"),
            Connector::EnvVar(name) => f.debug_tuple("EnvVar").field(name).finish(),
            Connector::Client(_) => f.write_str("Client(..)"),
        }
    }
}
