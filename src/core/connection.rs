//! # Connection: lifecycle and retry state machine.
//!
//! Owns the client for one run and drives it through [`RunState`]:
//! - connects with retries per [`RetryPolicy`],
//! - waits between attempts per [`Backoff`],
//! - turns a failed `receive()` into a reconnect episode,
//! - closes the client on shutdown.
//!
//! ## Retry episode
//! ```text
//! attempt = 0
//! loop {
//!   ├─► attempt += 1
//!   ├─► publish Connecting{attempt}
//!   ├─► client.connect()            (cancellable)
//!   │       ├─ Ok  ──► Connected, publish Connected, return Ready
//!   │       └─ Err ──► publish ConnectFailed
//!   │                  ├─ delay = backoff.delay(attempt)
//!   │                  ├─ Retrying{attempt, delay}, publish BackoffScheduled
//!   │                  ├─ sleep(delay)     (cancellable)
//!   │                  └─ retry.allows(attempt) == false
//!   │                         ─► Terminated(Fatal), publish RetriesExhausted,
//!   │                            return FailedConnection{attempts, last error}
//! }
//! ```
//!
//! ## Rules
//! - The attempt counter is local to an episode: every reconnect starts from zero.
//! - Every failed attempt is followed by its backoff, the final one included:
//!   `N` failed attempts take at least `delay(1) + .. + delay(N)`.
//! - A failed `receive()` moves `Connected → Retrying{attempt: 0}` before reconnecting.
//! - The current [`RunState`] is published on a `watch` channel shared with the event loop.
//! - Cancellation is honoured at safe points only: `connect()`, `receive()` and backoff sleeps.
//! - The registry is never touched here.

use std::{sync::Arc, time::Duration};

use tokio::{select, sync::watch, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    client::MessagingClient,
    core::state::{RunState, Termination},
    error::{RuntimeError, TransportError},
    events::{Bus, Event, Notice, NoticeKind},
    policies::{Backoff, RetryPolicy},
};

/// Outcome of a connect or receive step.
#[derive(Debug)]
pub enum Step<T> {
    Ready(T),
    Cancelled,
}

/// Client plus the state machine around it.
pub struct Connection<C> {
    client: Arc<C>,
    retry: RetryPolicy,
    backoff: Backoff,
    bus: Bus,
    state: Arc<watch::Sender<RunState>>,
}

impl<C: MessagingClient> Connection<C> {
    /// Creates the machine and resets `state` to [`RunState::NotStarted`].
    pub fn new(
        client: Arc<C>,
        retry: RetryPolicy,
        backoff: Backoff,
        bus: Bus,
        state: Arc<watch::Sender<RunState>>,
    ) -> Self {
        state.send_replace(RunState::NotStarted);
        Self {
            client,
            retry,
            backoff,
            bus,
            state,
        }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    fn set_state(&self, next: RunState) {
        self.state.send_replace(next);
    }

    #[inline]
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Initial connect. A client that already reports `is_connected()` is reused as-is.
    pub async fn open(&mut self, stop: &CancellationToken) -> Result<Step<()>, RuntimeError> {
        if self.client.is_connected() {
            debug!("client already connected");
            self.set_state(RunState::Connected);
            self.bus.publish(Notice::new(NoticeKind::Connected).with_attempt(0));
            return Ok(Step::Ready(()));
        }
        self.connect_with_retry(stop).await
    }

    /// Receives the next batch.
    ///
    /// A transport failure starts a reconnect episode; on success the caller gets an
    /// empty batch.
    pub async fn receive(&mut self, stop: &CancellationToken) -> Result<Step<Vec<Event>>, RuntimeError> {
        let res = select! {
            biased;
            _ = stop.cancelled() => return Ok(Step::Cancelled),
            res = self.client.receive() => res,
        };

        match res {
            Ok(batch) => Ok(Step::Ready(batch)),
            Err(e) => {
                warn!(error = %e, label = e.as_label(), "lost connection, reconnecting");
                self.set_state(RunState::Retrying {
                    attempt: 0,
                    next_delay: Duration::ZERO,
                });
                self.bus
                    .publish(Notice::new(NoticeKind::ConnectionLost).with_error(e.to_string()));

                match self.connect_with_retry(stop).await? {
                    Step::Ready(()) => Ok(Step::Ready(Vec::new())),
                    Step::Cancelled => Ok(Step::Cancelled),
                }
            }
        }
    }

    async fn connect_with_retry(&mut self, stop: &CancellationToken) -> Result<Step<()>, RuntimeError> {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            self.bus
                .publish(Notice::new(NoticeKind::Connecting).with_attempt(attempt));

            let res = select! {
                biased;
                _ = stop.cancelled() => return Ok(Step::Cancelled),
                res = self.client.connect() => res,
            };

            let err = match res {
                Ok(()) => {
                    debug!(attempt, "connected");
                    self.set_state(RunState::Connected);
                    self.bus
                        .publish(Notice::new(NoticeKind::Connected).with_attempt(attempt));
                    return Ok(Step::Ready(()));
                }
                Err(e) => e,
            };

            warn!(attempt, error = %err, "connect failed");
            self.bus.publish(
                Notice::new(NoticeKind::ConnectFailed)
                    .with_attempt(attempt)
                    .with_error(err.to_string()),
            );

            let delay = self.backoff.delay(attempt);
            self.set_state(RunState::Retrying {
                attempt,
                next_delay: delay,
            });
            debug!(attempt, ?delay, "waiting before next attempt");
            self.bus.publish(
                Notice::new(NoticeKind::BackoffScheduled)
                    .with_attempt(attempt)
                    .with_delay(delay)
                    .with_error(err.to_string()),
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = stop.cancelled() => return Ok(Step::Cancelled),
                _ = &mut sleep => {}
            }

            if !self.retry.allows(attempt) {
                return Err(self.exhausted(attempt, err));
            }
        }
    }

    fn exhausted(&self, attempts: u32, source: TransportError) -> RuntimeError {
        self.set_state(RunState::Terminated(Termination::Fatal));
        self.bus.publish(
            Notice::new(NoticeKind::RetriesExhausted)
                .with_attempt(attempts)
                .with_error(source.to_string()),
        );
        RuntimeError::FailedConnection { attempts, source }
    }

    /// Clean stop: `ShuttingDown`, close the client, `Terminated(Clean)`.
    pub async fn shutdown(&mut self) {
        self.set_state(RunState::ShuttingDown);
        self.bus.publish(Notice::new(NoticeKind::ShutdownRequested));
        debug!("closing client");
        self.client.close().await;
        self.set_state(RunState::Terminated(Termination::Clean));
        self.bus.publish(Notice::new(NoticeKind::Stopped));
    }

    /// Fatal stop: close the client and stay `Terminated(Fatal)`.
    pub async fn abort(&mut self) {
        self.client.close().await;
        self.set_state(RunState::Terminated(Termination::Fatal));
        self.bus.publish(Notice::new(NoticeKind::Stopped));
    }
}
