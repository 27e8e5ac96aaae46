//! # EventLoop: receive, dispatch, decide.
//!
//! The [`EventLoop`] owns the handler registry, the connector and the notice bus.
//! Each `run*` call resolves a client, connects it and drives it until the
//! continuation predicate says stop, the shutdown token fires or the connection
//! cannot be re-established.
//!
//! ## Flow
//! ```text
//! run_until(pred)
//!   ├─► connector.resolve()             (MissingCredential / InvalidCredential: return)
//!   ├─► [handle_signals] spawn watcher  (cancels the run token)
//!   ├─► connection.open()               (retry + backoff)
//!   └─► loop {
//!         ├─ batch = connection.receive()        (reconnects on failure → empty batch)
//!         ├─ dispatch(registry, client, batch)   (sequential, failures contained)
//!         ├─ pred(batch) == false        ─► stop
//!         ├─ token cancelled             ─► stop
//!         └─ sleep(interval)             (only if interval > 0, cancellable)
//!       }
//!
//! stop:  ShuttingDown → client.close() → Terminated(Clean) → Ok(())
//! fatal: client.close() → Terminated(Fatal) → Err(FailedConnection)
//! ```
//!
//! ## Rules
//! - The predicate runs after dispatch of the batch it is given.
//! - Handlers are never preempted; cancellation is observed at safe points.
//! - Handlers registered before a run survive every reconnect of that run.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use rtmvisor::{Config, Event, EventLoop, HandlerError, MessagingClient};
//!
//! async fn serve<C: MessagingClient>() -> Result<(), rtmvisor::RuntimeError> {
//!     let mut lp: EventLoop<C> = EventLoop::new(Config::default());
//!
//!     lp.handle("*", |_client: Arc<C>, event: Event| async move {
//!         println!("{event:?}");
//!         Ok::<_, HandlerError>(())
//!     });
//!     lp.handle("message", |client: Arc<C>, event: Event| async move {
//!         let channel = event.get_str("channel").unwrap_or_default();
//!         let text = event.get_str("text").unwrap_or_default();
//!         client.send(channel, text).await?;
//!         Ok::<_, HandlerError>(())
//!     });
//!
//!     lp.run().await
//! }
//! ```

use std::{future::Future, sync::Arc};

use tokio::{
    select,
    sync::{broadcast, watch},
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{
    builder::EventLoopBuilder,
    config::Config,
    connection::{Connection, Step},
    dispatcher, shutdown,
    state::RunState,
};
use crate::{
    client::{Connector, MessagingClient},
    error::{HandlerError, RuntimeError},
    events::{Bus, Event, Notice},
    handlers::{EventKeys, HandlerFn, HandlerRef, Registry},
};

/// Handler registry plus the machinery to run it against a live client.
pub struct EventLoop<C: MessagingClient> {
    cfg: Config,
    connector: Connector<C>,
    registry: Registry<C>,
    bus: Bus,
    token: CancellationToken,
    state: Arc<watch::Sender<RunState>>,
}

impl<C: MessagingClient> EventLoop<C> {
    /// Creates a loop reading its token from `cfg.token_env`.
    pub fn new(cfg: Config) -> Self {
        let connector = Connector::EnvVar(cfg.token_env.clone());
        let registry = Registry::new(cfg.order);
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            connector,
            registry,
            bus,
            token: CancellationToken::new(),
            state: Arc::new(watch::channel(RunState::NotStarted).0),
        }
    }

    /// Starts a builder with the given configuration.
    pub fn builder(cfg: Config) -> EventLoopBuilder<C> {
        EventLoopBuilder::new(cfg)
    }

    /// Replaces the connector.
    pub fn set_connector(&mut self, connector: Connector<C>) {
        self.connector = connector;
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Wraps `f` in a [`HandlerFn`] and registers it under `keys`.
    pub fn handle<F, Fut>(&mut self, keys: impl Into<EventKeys>, f: F) -> HandlerRef<C>
    where
        F: Fn(Arc<C>, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let handler: HandlerRef<C> = HandlerFn::arc(std::any::type_name::<F>(), f);
        self.register(keys, handler)
    }

    /// Registers `handler` under `keys` and returns it unchanged.
    pub fn register(&mut self, keys: impl Into<EventKeys>, handler: HandlerRef<C>) -> HandlerRef<C> {
        self.registry.register(keys, handler)
    }

    #[inline]
    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    /// Receiver for lifecycle [`Notice`]s.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.bus.subscribe()
    }

    /// State of the current run, or the final state of the last one.
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Receiver notified on every [`RunState`] transition.
    pub fn watch_state(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Token that stops every current and future run once cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Runs until stopped through the shutdown token, a signal or a fatal error.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.drive(|_| true).await
    }

    /// Runs while `pred(batch)` returns `true`; `batch` is the batch just dispatched.
    pub async fn run_until<P>(&self, mut pred: P) -> Result<(), RuntimeError>
    where
        P: FnMut(&[Event]) -> bool,
    {
        self.drive(|batch| pred(&batch)).await
    }

    /// Runs while `pred(history)` returns `true`; `history` holds every event
    /// received during this run, in receipt order.
    pub async fn run_until_history<P>(&self, mut pred: P) -> Result<(), RuntimeError>
    where
        P: FnMut(&[Event]) -> bool,
    {
        let mut history = Vec::new();
        self.drive(move |batch| {
            history.extend(batch);
            pred(&history)
        })
        .await
    }

    async fn drive<P>(&self, keep_going: P) -> Result<(), RuntimeError>
    where
        P: FnMut(Vec<Event>) -> bool,
    {
        let client = self.connector.resolve().inspect_err(|e| {
            debug!(error = %e, label = e.as_label(), "connector resolution failed");
        })?;

        let stop = self.token.child_token();
        let watcher = self
            .cfg
            .handle_signals
            .then(|| shutdown::watch_signals(stop.clone()));

        let mut conn = Connection::new(
            client,
            self.cfg.retry,
            self.cfg.backoff.clone(),
            self.bus.clone(),
            Arc::clone(&self.state),
        );
        let res = self.cycle(&mut conn, &stop, keep_going).await;

        if let Some(watcher) = watcher {
            watcher.abort();
        }
        match res {
            Ok(()) => {
                conn.shutdown().await;
                Ok(())
            }
            Err(e) => {
                conn.abort().await;
                Err(e)
            }
        }
    }

    async fn cycle<P>(
        &self,
        conn: &mut Connection<C>,
        stop: &CancellationToken,
        mut keep_going: P,
    ) -> Result<(), RuntimeError>
    where
        P: FnMut(Vec<Event>) -> bool,
    {
        if let Step::Cancelled = conn.open(stop).await? {
            debug!("cancelled while connecting");
            return Ok(());
        }

        loop {
            let batch = match conn.receive(stop).await? {
                Step::Ready(batch) => batch,
                Step::Cancelled => {
                    debug!("cancelled while receiving");
                    return Ok(());
                }
            };

            let report = dispatcher::dispatch(&self.registry, conn.client(), &batch, &self.bus).await;
            debug!(
                events = batch.len(),
                invoked = report.invoked,
                failed = report.failed,
                "batch dispatched"
            );

            if !keep_going(batch) {
                debug!("predicate requested stop");
                return Ok(());
            }
            if stop.is_cancelled() {
                return Ok(());
            }
            if let Some(pause) = self.cfg.pause() {
                select! {
                    biased;
                    _ = stop.cancelled() => return Ok(()),
                    _ = time::sleep(pause) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::state::Termination,
        error::TransportError,
        events::NoticeKind,
        policies::{Backoff, RetryPolicy},
        testing::ScriptedClient,
    };
    use std::{sync::Mutex, time::Duration};

    fn event_loop(client: &Arc<ScriptedClient>, cfg: Config) -> EventLoop<ScriptedClient> {
        let mut lp = EventLoop::new(cfg);
        lp.set_connector(Connector::Client(Arc::clone(client)));
        lp
    }

    fn record_into(lp: &mut EventLoop<ScriptedClient>, key: &str) -> Arc<Mutex<Vec<String>>> {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        lp.handle(key, move |_c: Arc<ScriptedClient>, e: Event| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(e.kind().unwrap_or("-").to_string());
                Ok::<_, HandlerError>(())
            }
        });
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_predicate_returns_false() {
        let client = Arc::new(
            ScriptedClient::new().with_reads([Ok(vec![Event::new("message")]), Ok(vec![Event::new("late")])]),
        );
        let mut lp = event_loop(&client, Config::default());
        let seen = record_into(&mut lp, "*");
        let mut notices = lp.subscribe();

        lp.run_until(|_| false).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), ["message"]);
        assert_eq!(client.receive_calls(), 1);
        assert_eq!(client.close_calls(), 1);

        let kinds: Vec<NoticeKind> = std::iter::from_fn(|| notices.try_recv().ok())
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                NoticeKind::Connecting,
                NoticeKind::Connected,
                NoticeKind::ShutdownRequested,
                NoticeKind::Stopped
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn missing_credential_never_connects() {
        let mut cfg = Config::default();
        cfg.token_env = "RTMVISOR_TEST_TOKEN_THAT_IS_NEVER_SET".to_string();
        let lp: EventLoop<ScriptedClient> = EventLoop::new(cfg);

        let err = lp.run().await.unwrap_err();
        assert!(matches!(err, RuntimeError::MissingCredential { .. }));
        assert_eq!(
            err.to_string(),
            "missing credential: could not acquire token from RTMVISOR_TEST_TOKEN_THAT_IS_NEVER_SET"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_token_is_invalid_credential() {
        let mut lp: EventLoop<ScriptedClient> = EventLoop::new(Config::default());
        lp.set_connector(Connector::Token(ScriptedClient::REJECTED_TOKEN.to_string()));

        let err = lp.run().await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidCredential { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_close_client_and_fail() {
        let client = Arc::new(ScriptedClient::new().with_connects((0..3).map(|_| Err(TransportError::Closed))));
        let mut cfg = Config::default();
        cfg.retry = RetryPolicy::Attempts(3);
        cfg.backoff = Backoff::custom(|_| Duration::from_secs(1));
        let lp = event_loop(&client, cfg);

        let started = time::Instant::now();
        let err = lp.run().await.unwrap_err();

        assert!(matches!(err, RuntimeError::FailedConnection { attempts: 3, .. }));
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(client.connect_calls(), 3);
        assert_eq!(client.close_calls(), 1);
        assert_eq!(lp.state(), RunState::Terminated(Termination::Fatal));
    }

    #[tokio::test(start_paused = true)]
    async fn lost_connection_that_never_comes_back_is_fatal() {
        let client = Arc::new(
            ScriptedClient::new()
                .with_connects(
                    std::iter::once(Ok(())).chain((0..4).map(|_| Err(TransportError::Timeout))),
                )
                .with_reads([Ok(vec![Event::new("hello")]), Err(TransportError::Closed)]),
        );
        let mut cfg = Config::default();
        cfg.retry = RetryPolicy::Attempts(4);
        cfg.backoff = Backoff::custom(|_| Duration::from_millis(500));
        let mut lp = event_loop(&client, cfg);
        let seen = record_into(&mut lp, "*");

        let started = time::Instant::now();
        let err = lp.run().await.unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::FailedConnection { attempts: 4, source: TransportError::Timeout }
        ));
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(*seen.lock().unwrap(), ["hello"]);
        assert_eq!(client.connect_calls(), 5);
        assert_eq!(client.receive_calls(), 2);
        assert_eq!(client.close_calls(), 1);
        assert_eq!(lp.state(), RunState::Terminated(Termination::Fatal));
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_keeps_handlers_and_reports_empty_batch() {
        let client = Arc::new(
            ScriptedClient::new()
                .with_connects([Ok(()), Err(TransportError::Timeout), Ok(())])
                .with_reads([
                    Ok(vec![Event::new("a")]),
                    Err(TransportError::Closed),
                    Ok(vec![Event::new("b")]),
                ]),
        );
        let mut cfg = Config::default();
        cfg.backoff = Backoff::none();
        let mut lp = event_loop(&client, cfg);
        let seen = record_into(&mut lp, "*");

        let mut sizes = Vec::new();
        lp.run_until(|batch| {
            sizes.push(batch.len());
            sizes.len() < 3
        })
        .await
        .unwrap();

        assert_eq!(sizes, [1, 0, 1]);
        assert_eq!(*seen.lock().unwrap(), ["a", "b"]);
        assert_eq!(client.connect_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_token_stops_a_blocked_receive() {
        let client = Arc::new(ScriptedClient::new());
        let lp = event_loop(&client, Config::default());
        let token = lp.shutdown_token();

        let (res, ()) = tokio::join!(lp.run(), async {
            time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        res.unwrap();
        assert_eq!(client.receive_calls(), 1);
        assert_eq!(client.close_calls(), 1);
        assert_eq!(lp.state(), RunState::Terminated(Termination::Clean));
    }

    #[tokio::test(start_paused = true)]
    async fn state_is_observable_while_running() {
        let client = Arc::new(ScriptedClient::new());
        let lp = event_loop(&client, Config::default());
        let token = lp.shutdown_token();
        let mut states = lp.watch_state();
        assert_eq!(lp.state(), RunState::NotStarted);

        let (res, during) = tokio::join!(lp.run(), async {
            time::sleep(Duration::from_secs(1)).await;
            let during = lp.state();
            token.cancel();
            during
        });

        res.unwrap();
        assert_eq!(during, RunState::Connected);
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), RunState::Terminated(Termination::Clean));
    }

    #[tokio::test(start_paused = true)]
    async fn history_predicate_sees_every_event() {
        let client = Arc::new(ScriptedClient::new().with_reads([
            Ok(vec![Event::new("a")]),
            Ok(vec![Event::new("b"), Event::new("c")]),
            Ok(vec![Event::new("d")]),
        ]));
        let lp = event_loop(&client, Config::default());

        let mut last = Vec::new();
        lp.run_until_history(|history| {
            last = history.iter().filter_map(|e| e.kind().map(str::to_string)).collect();
            history.len() < 3
        })
        .await
        .unwrap();

        assert_eq!(last, ["a", "b", "c"]);
        assert_eq!(client.receive_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_pauses_between_cycles() {
        let client = Arc::new(
            ScriptedClient::new().with_reads([Ok(vec![Event::new("a")]), Ok(vec![Event::new("b")])]),
        );
        let mut cfg = Config::default();
        cfg.interval = Duration::from_secs(10);
        let lp = event_loop(&client, cfg);

        let started = time::Instant::now();
        let mut batches = 0;
        lp.run_until(|_| {
            batches += 1;
            batches < 2
        })
        .await
        .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(10));
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_handler_does_not_stop_the_loop() {
        let client = Arc::new(ScriptedClient::new().with_reads([
            Ok(vec![Event::new("message")]),
            Ok(vec![Event::new("message")]),
        ]));
        let mut lp = event_loop(&client, Config::default());
        lp.handle("message", |_c: Arc<ScriptedClient>, _e: Event| async {
            Err::<(), _>(HandlerError::fail("boom"))
        });
        let seen = record_into(&mut lp, "message");

        let mut batches = 0;
        lp.run_until(|_| {
            batches += 1;
            batches < 2
        })
        .await
        .unwrap();

        assert_eq!(*seen.lock().unwrap(), ["message", "message"]);
    }
}
