//! # Inbound events.
//!
//! An [`Event`] is a JSON object received from the messaging service. Its event type is
//! the string field `"type"`; events without one are dispatched under the empty
//! type `""` (plus wildcard handlers).
//!
//! ```rust
//! use rtmvisor::Event;
//! use serde_json::json;
//!
//! let ev = Event::try_from(json!({"type": "message", "text": "hi"})).unwrap();
//! assert_eq!(ev.kind(), Some("message"));
//! assert_eq!(ev.get_str("text"), Some("hi"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the event type.
pub const TYPE_FIELD: &str = "type";

/// A structured record received from the messaging client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Map<String, Value>);

impl Event {
    /// Creates an event with only its `"type"` set.
    pub fn new(kind: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_FIELD.to_string(), Value::String(kind.into()));
        Self(fields)
    }

    /// Sets a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Event type, if the record carries a string `"type"`.
    ///
    /// `None` here routes the event to handlers registered under `""` and `"*"`.
    pub fn kind(&self) -> Option<&str> {
        self.0.get(TYPE_FIELD).and_then(Value::as_str)
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field access.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Borrow the underlying map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Event {
    type Error = Value;

    /// Accepts JSON objects; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_requires_string_type() {
        let ev = Event::try_from(json!({"type": 7})).unwrap();
        assert_eq!(ev.kind(), None);
        assert_eq!(Event::default().kind(), None);
    }

    #[test]
    fn non_objects_are_rejected() {
        assert_eq!(Event::try_from(json!([1, 2])), Err(json!([1, 2])));
    }

    #[test]
    fn deserializes_transparently() {
        let ev: Event =
            serde_json::from_str(r#"{"type":"member_left_channel","user":"U1"}"#).unwrap();
        assert_eq!(ev, Event::new("member_left_channel").with("user", "U1"));
    }
}
