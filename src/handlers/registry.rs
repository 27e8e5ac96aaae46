//! # Handler registry.
//!
//! Maps [`EventKey`]s to ordered handler slots.
//!
//! ## Rules
//! - Insertion order is invocation order within a key.
//! - [`lookup`](Registry::lookup) returns exact-type slots, then wildcard slots
//!   ([`DispatchOrder::ExactFirst`]), or the reverse with [`DispatchOrder::WildcardFirst`].
//! - One registration act under several keys yields **one** invocation per event,
//!   even when both the exact key and `*` match.
//! - Two separate registrations of the same handler yield **two** invocations.
//! - An event without a string `"type"` is looked up under the empty type `""`.
//!
//! ```text
//! register(["message", "*"], debug)   → act #0 : slots message[0], *[0]
//! register("message", echo)           → act #1 : slots message[1]
//! register("message", echo)           → act #2 : slots message[2]
//!
//! lookup({type: "message"}) → debug, echo, echo
//! lookup({type: "hello"})   → debug
//! ```

use std::{collections::HashMap, sync::Arc};

use crate::{
    events::Event,
    handlers::{
        handler::HandlerRef,
        key::{EventKey, EventKeys},
    },
};

/// Relative order of exact-type and wildcard handlers for one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchOrder {
    /// Handlers registered for the event's type first, then wildcard handlers.
    #[default]
    ExactFirst,
    /// Wildcard handlers first, then handlers for the event's type.
    WildcardFirst,
}

struct Slot<C> {
    act: u64,
    handler: HandlerRef<C>,
}

/// Event key → ordered handler slots.
pub struct Registry<C> {
    slots: HashMap<EventKey, Vec<Slot<C>>>,
    order: DispatchOrder,
    next_act: u64,
}

impl<C> Registry<C> {
    pub fn new(order: DispatchOrder) -> Self {
        Self {
            slots: HashMap::new(),
            order,
            next_act: 0,
        }
    }

    /// Registers `handler` under every key in `keys` and returns it unchanged.
    pub fn register(&mut self, keys: impl Into<EventKeys>, handler: HandlerRef<C>) -> HandlerRef<C> {
        let act = self.next_act;
        self.next_act += 1;

        for key in keys.into().iter() {
            self.slots.entry(key.clone()).or_default().push(Slot {
                act,
                handler: Arc::clone(&handler),
            });
        }
        handler
    }

    /// Handlers to invoke for `event`, in invocation order.
    pub fn lookup(&self, event: &Event) -> Vec<HandlerRef<C>> {
        let kind = event.kind().unwrap_or_default();
        let exact = self.slots.get(&EventKey::Type(kind.to_string()));
        let wildcard = self.slots.get(&EventKey::Any);

        let (first, second) = match self.order {
            DispatchOrder::ExactFirst => (exact, wildcard),
            DispatchOrder::WildcardFirst => (wildcard, exact),
        };

        let mut seen: Vec<u64> = Vec::new();
        let mut out = Vec::new();
        for slot in first.into_iter().flatten() {
            seen.push(slot.act);
            out.push(Arc::clone(&slot.handler));
        }
        for slot in second.into_iter().flatten() {
            if !seen.contains(&slot.act) {
                out.push(Arc::clone(&slot.handler));
            }
        }
        out
    }

    /// Number of registration acts so far.
    pub fn len(&self) -> usize {
        self.next_act as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_act == 0
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new(DispatchOrder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::HandlerFn;

    fn named(name: &'static str) -> HandlerRef<()> {
        HandlerFn::arc(name, |_c: Arc<()>, _e: Event| async {
            Ok::<_, HandlerError>(())
        })
    }

    fn names(handlers: &[HandlerRef<()>]) -> Vec<&str> {
        handlers.iter().map(|h| h.name()).collect()
    }

    #[test]
    fn register_returns_same_handler() {
        let mut reg = Registry::default();
        let h = named("hello");
        let back = reg.register("hello", Arc::clone(&h));
        assert!(Arc::ptr_eq(&h, &back));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn multi_key_handler_matches_only_its_keys() {
        let mut reg = Registry::default();
        reg.register(["a", "b"], named("ab"));

        assert_eq!(names(&reg.lookup(&Event::new("a"))), ["ab"]);
        assert_eq!(names(&reg.lookup(&Event::new("b"))), ["ab"]);
        assert!(reg.lookup(&Event::new("c")).is_empty());
    }

    #[test]
    fn exact_handlers_precede_wildcard_in_registration_order() {
        let mut reg = Registry::default();
        reg.register("*", named("w1"));
        reg.register("message", named("m1"));
        reg.register("*", named("w2"));
        reg.register("message", named("m2"));

        let ev = Event::new("message");
        assert_eq!(names(&reg.lookup(&ev)), ["m1", "m2", "w1", "w2"]);
        // Replaying the same event yields the same order.
        assert_eq!(names(&reg.lookup(&ev)), ["m1", "m2", "w1", "w2"]);
    }

    #[test]
    fn wildcard_first_order() {
        let mut reg = Registry::new(DispatchOrder::WildcardFirst);
        reg.register("message", named("m"));
        reg.register("*", named("w"));
        assert_eq!(names(&reg.lookup(&Event::new("message"))), ["w", "m"]);
    }

    #[test]
    fn one_act_under_exact_and_wildcard_runs_once() {
        let mut reg = Registry::default();
        reg.register(["message", "*"], named("both"));
        assert_eq!(names(&reg.lookup(&Event::new("message"))), ["both"]);
        assert_eq!(names(&reg.lookup(&Event::new("hello"))), ["both"]);
    }

    #[test]
    fn repeated_registration_is_not_deduplicated() {
        let mut reg = Registry::default();
        let h = named("twice");
        reg.register("message", Arc::clone(&h));
        reg.register("message", Arc::clone(&h));
        reg.register("*", h);
        assert_eq!(names(&reg.lookup(&Event::new("message"))), ["twice", "twice", "twice"]);
    }

    #[test]
    fn untyped_event_is_looked_up_under_empty_type() {
        let mut reg = Registry::default();
        reg.register("", named("empty"));
        reg.register("message", named("m"));
        reg.register("*", named("w"));
        assert_eq!(names(&reg.lookup(&Event::default())), ["empty", "w"]);
        assert_eq!(names(&reg.lookup(&Event::new("message"))), ["m", "w"]);
    }
}
