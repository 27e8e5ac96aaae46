//! # Dispatch one batch of events.
//!
//! ```text
//! for event in batch            (receipt order)
//!   for handler in registry.lookup(event)
//!     handler.call(client, event)  ──► await
//!        ├─ Ok(())      → next
//!        ├─ Err(e)      → warn!, publish HandlerFailed, next
//!        └─ panic       → warn!, publish HandlerPanicked, next
//! ```
//!
//! ## Rules
//! - Handlers run **sequentially**; a slow handler delays the rest of the batch.
//! - Failures never escape: a misbehaving handler cannot stop the loop or
//!   starve other handlers/events.
//! - `AssertUnwindSafe` is used, so a handler panicking while holding a lock it shares
//!   with others may leave that state inconsistent.

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tracing::warn;

use crate::{
    events::{Bus, Event, Notice, NoticeKind},
    handlers::Registry,
};

/// Counts from one [`dispatch`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handler invocations started.
    pub invoked: usize,
    /// Invocations that returned an error or panicked.
    pub failed: usize,
}

/// Invokes every matching handler for every event of `events`.
pub async fn dispatch<C: Send + Sync + 'static>(
    registry: &Registry<C>,
    client: &Arc<C>,
    events: &[Event],
    bus: &Bus,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for event in events {
        for handler in registry.lookup(event) {
            report.invoked += 1;

            let started = std::panic::catch_unwind(AssertUnwindSafe(|| {
                handler.call(Arc::clone(client), event.clone())
            }));
            let outcome = match started {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(panic) => Err(panic),
            };

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    report.failed += 1;
                    warn!(handler = handler.name(), event = ?event.kind(), error = %e, "handler failed");
                    bus.publish(
                        Notice::new(NoticeKind::HandlerFailed)
                            .with_handler(handler.name())
                            .with_event_kind(event.kind())
                            .with_error(e.to_string()),
                    );
                }
                Err(panic) => {
                    report.failed += 1;
                    let info = panic_message(panic.as_ref());
                    warn!(handler = handler.name(), event = ?event.kind(), panic = %info, "handler panicked");
                    bus.publish(
                        Notice::new(NoticeKind::HandlerPanicked)
                            .with_handler(handler.name())
                            .with_event_kind(event.kind())
                            .with_error(info),
                    );
                }
            }
        }
    }
    report
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::HandlerError,
        handlers::{HandlerFn, HandlerRef},
    };
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(name: &'static str, log: &Log) -> HandlerRef<()> {
        let log = Arc::clone(log);
        HandlerFn::arc(name, move |_c: Arc<()>, e: Event| {
            let log = Arc::clone(&log);
            async move {
                log.lock()
                    .unwrap()
                    .push(format!("{name}:{}", e.kind().unwrap_or("-")));
                Ok::<_, HandlerError>(())
            }
        })
    }

    fn taken(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    #[tokio::test]
    async fn wildcard_and_exact_scenario() {
        let log: Log = Arc::default();
        let mut reg = Registry::default();
        reg.register("*", recorder("debug", &log));
        reg.register("message", recorder("echo", &log));

        let batch = [
            Event::new("message").with("text", "hi"),
            Event::new("member_left_channel"),
        ];
        let report = dispatch(&reg, &Arc::new(()), &batch, &Bus::new(8)).await;

        assert_eq!(
            taken(&log),
            ["echo:message", "debug:message", "debug:member_left_channel"]
        );
        assert_eq!(report, DispatchReport { invoked: 3, failed: 0 });
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let log: Log = Arc::default();
        let mut reg = Registry::default();
        reg.register(
            "boom",
            HandlerFn::arc("fails", |_c: Arc<()>, _e: Event| async {
                Err::<(), _>(HandlerError::fail("nope"))
            }),
        );
        reg.register(
            "boom",
            HandlerFn::arc("panics-in-future", |_c: Arc<()>, e: Event| async move {
                if e.kind() == Some("boom") {
                    panic!("kaboom");
                }
                Ok::<_, HandlerError>(())
            }),
        );
        reg.register(
            "boom",
            HandlerFn::arc("panics-on-call", |_c: Arc<()>, _e: Event| -> futures::future::Ready<Result<(), HandlerError>> {
                panic!("before the future exists")
            }),
        );
        reg.register("*", recorder("after", &log));

        let bus = Bus::new(16);
        let mut notices = bus.subscribe();
        let batch = [Event::new("boom"), Event::new("next")];
        let report = dispatch(&reg, &Arc::new(()), &batch, &bus).await;

        assert_eq!(taken(&log), ["after:boom", "after:next"]);
        assert_eq!(report, DispatchReport { invoked: 5, failed: 3 });

        let kinds: Vec<(NoticeKind, Option<String>)> = std::iter::from_fn(|| notices.try_recv().ok())
            .map(|n| (n.kind, n.error))
            .collect();
        assert_eq!(
            kinds,
            [
                (NoticeKind::HandlerFailed, Some("handler failed: nope".to_string())),
                (NoticeKind::HandlerPanicked, Some("kaboom".to_string())),
                (NoticeKind::HandlerPanicked, Some("before the future exists".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn handlers_can_send_through_client() {
        use crate::{testing::ScriptedClient, MessagingClient};

        let mut reg: Registry<ScriptedClient> = Registry::default();
        reg.register(
            "message",
            HandlerFn::arc("echo", |client: Arc<ScriptedClient>, e: Event| async move {
                let channel = e.get_str("channel").unwrap_or_default();
                client.send(channel, e.get_str("text").unwrap_or_default()).await?;
                Ok::<_, HandlerError>(())
            }),
        );
        let client = Arc::new(ScriptedClient::new());
        let batch = [Event::new("message").with("channel", "C1").with("text", "hi")];
        dispatch(&reg, &client, &batch, &Bus::new(1)).await;

        assert_eq!(client.sent(), [("C1".to_string(), "hi".to_string())]);
    }
}
