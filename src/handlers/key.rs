//! # Event keys.
//!
//! [`EventKey`] names an event type or the wildcard (`"*"`). [`EventKeys`] is the set
//! of keys given in one registration: a single `&str`, an array, a `Vec`, or keys
//! built explicitly.
//!
//! ```rust
//! use rtmvisor::{EventKey, EventKeys};
//!
//! assert_eq!(EventKey::from("*"), EventKey::Any);
//! let keys = EventKeys::from(["message", "reaction_added", "message"]);
//! assert_eq!(keys.len(), 2);
//! ```

use std::fmt;

/// Spelling of the wildcard key.
pub const WILDCARD: &str = "*";

/// Registry key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// Events whose `"type"` equals this string.
    Type(String),
    /// Every event.
    Any,
}

impl From<&str> for EventKey {
    fn from(s: &str) -> Self {
        if s == WILDCARD {
            EventKey::Any
        } else {
            EventKey::Type(s.to_string())
        }
    }
}

impl From<String> for EventKey {
    fn from(s: String) -> Self {
        if s == WILDCARD {
            EventKey::Any
        } else {
            EventKey::Type(s)
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Type(kind) => f.write_str(kind),
            EventKey::Any => f.write_str(WILDCARD),
        }
    }
}

/// Keys of one registration act, duplicates removed, first occurrence kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventKeys(Vec<EventKey>);

impl EventKeys {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<EventKey>,
    {
        let mut out: Vec<EventKey> = Vec::new();
        for key in keys {
            let key = key.into();
            if !out.contains(&key) {
                out.push(key);
            }
        }
        Self(out)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventKey> {
        self.0.iter()
    }
}

impl From<EventKey> for EventKeys {
    fn from(key: EventKey) -> Self {
        Self(vec![key])
    }
}

impl From<&str> for EventKeys {
    fn from(key: &str) -> Self {
        Self(vec![key.into()])
    }
}

impl From<String> for EventKeys {
    fn from(key: String) -> Self {
        Self(vec![key.into()])
    }
}

impl<const N: usize> From<[&str; N]> for EventKeys {
    fn from(keys: [&str; N]) -> Self {
        Self::new(keys)
    }
}

impl From<Vec<&str>> for EventKeys {
    fn from(keys: Vec<&str>) -> Self {
        Self::new(keys)
    }
}

impl From<Vec<EventKey>> for EventKeys {
    fn from(keys: Vec<EventKey>) -> Self {
        Self::new(keys)
    }
}
