//! # Notice bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. The event loop
//! publishes [`Notice`]s; callers obtain receivers via
//! [`EventLoop::subscribe`](crate::EventLoop::subscribe).
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits on receivers.
//! - **Bounded capacity**: slow receivers get `RecvError::Lagged(n)` and skip `n` notices.
//! - **No persistence**: notices are dropped when nobody is subscribed.

use tokio::sync::broadcast;

use super::notice::Notice;

/// Broadcast channel for lifecycle notices. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Notice>,
}

impl Bus {
    /// Creates a bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Notice>(capacity.max(1));
        Self { tx }
    }

    /// Publishes to every live receiver; dropped if there are none.
    pub fn publish(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }

    /// New receiver observing notices sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoticeKind;

    #[tokio::test]
    async fn subscriber_sees_later_notices_only() {
        let bus = Bus::new(0);
        bus.publish(Notice::new(NoticeKind::Connecting));

        let mut rx = bus.subscribe();
        bus.publish(Notice::new(NoticeKind::Connected));

        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind, NoticeKind::Connected);
        assert!(rx.try_recv().is_err());
    }
}
