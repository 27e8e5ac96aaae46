//! Scripted in-memory client for unit tests.

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::{error::TransportError, events::Event, MessagingClient};

/// Replays scripted `connect()` and `receive()` outcomes.
///
/// Exhausted connect scripts succeed (or wait forever after [`stall_connects`]);
/// exhausted receive scripts wait forever.
///
/// [`stall_connects`]: ScriptedClient::stall_connects
#[derive(Debug, Default)]
pub struct ScriptedClient {
    token: Option<String>,
    connects: Mutex<VecDeque<Result<(), TransportError>>>,
    reads: Mutex<VecDeque<Result<Vec<Event>, TransportError>>>,
    connected: AtomicBool,
    stall: AtomicBool,
    connect_calls: AtomicUsize,
    receive_calls: AtomicUsize,
    close_calls: AtomicUsize,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub const REJECTED_TOKEN: &'static str = "rejected";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connects<I>(self, script: I) -> Self
    where
        I: IntoIterator<Item = Result<(), TransportError>>,
    {
        self.connects.lock().unwrap().extend(script);
        self
    }

    pub fn with_reads<I>(self, script: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<Event>, TransportError>>,
    {
        self.reads.lock().unwrap().extend(script);
        self
    }

    pub fn stall_connects(self) -> Self {
        self.stall.store(true, Ordering::SeqCst);
        self
    }

    pub fn already_connected(self) -> Self {
        self.connected.store(true, Ordering::SeqCst);
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingClient for ScriptedClient {
    fn from_token(token: String) -> Result<Self, TransportError> {
        if token == Self::REJECTED_TOKEN {
            return Err(TransportError::Protocol("invalid_auth".into()));
        }
        Ok(Self {
            token: Some(token),
            ..Self::default()
        })
    }

    async fn connect(&self) -> Result<(), TransportError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.connects.lock().unwrap().pop_front();
        if next.is_none() && self.stall.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let res = next.unwrap_or(Ok(()));
        self.connected.store(res.is_ok(), Ordering::SeqCst);
        res
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn receive(&self) -> Result<Vec<Event>, TransportError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.reads.lock().unwrap().pop_front();
        match next {
            Some(Err(e)) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(e)
            }
            Some(ok) => ok,
            None => std::future::pending().await,
        }
    }

    async fn send(&self, channel: &str, payload: &str) -> Result<(), TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), payload.to_string()));
        Ok(())
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }
}
