//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify the unit's
//! contracts without a real coordination service.

use async_trait::async_trait;
use leaderwatch_core::error::Result;
use leaderwatch_core::traits::{Abort, CoordSession, NodeEvent, ObservedValue, ValueTracker};
use leaderwatch_core::{Error, WatchConfig};
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// A controlled single-path session that can emit events on demand
pub struct ControlledSession {
    /// Current node payload, `None` when the node does not exist
    data: Mutex<Option<Vec<u8>>>,
    /// Sender for the test to publish events; dropping it ends the stream
    event_tx: Mutex<Option<mpsc::UnboundedSender<NodeEvent>>>,
    /// Receiver for the tracker's watch stream
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<NodeEvent>>>,
    /// Call counter for read()
    read_call_count: AtomicUsize,
}

impl ControlledSession {
    /// Create a session whose node does not exist yet
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            data: Mutex::new(None),
            event_tx: Mutex::new(Some(tx)),
            event_rx: Mutex::new(Some(rx)),
            read_call_count: AtomicUsize::new(0),
        }
    }

    /// Create a session whose node already holds a payload
    pub fn with_value(data: &[u8]) -> Self {
        let session = Self::new();
        *session.data.lock().unwrap() = Some(data.to_vec());
        session
    }

    /// Create or replace the node payload, emitting the matching event
    pub fn set(&self, data: &[u8]) {
        let existed = {
            let mut guard = self.data.lock().unwrap();
            let existed = guard.is_some();
            *guard = Some(data.to_vec());
            existed
        };
        let event = if existed {
            NodeEvent::DataChanged(data.to_vec())
        } else {
            NodeEvent::Created(data.to_vec())
        };
        self.send(event);
    }

    /// Delete the node
    pub fn delete(&self) {
        *self.data.lock().unwrap() = None;
        self.send(NodeEvent::Deleted);
    }

    /// Drop the event sender, ending the watch stream (simulates a session
    /// that can no longer keep its watch alive)
    pub fn lose_watch(&self) {
        self.event_tx.lock().unwrap().take();
    }

    /// Get the number of times read() was called
    pub fn read_call_count(&self) -> usize {
        self.read_call_count.load(Ordering::SeqCst)
    }

    fn send(&self, event: NodeEvent) {
        if let Some(tx) = self.event_tx.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl CoordSession for ControlledSession {
    async fn read(&self, _path: &str) -> Result<Option<Vec<u8>>> {
        self.read_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.lock().unwrap().clone())
    }

    fn watch(&self, _path: &str) -> Pin<Box<dyn Stream<Item = NodeEvent> + Send + 'static>> {
        // Take the receiver (only called once)
        let rx = self
            .event_rx
            .lock()
            .unwrap()
            .take()
            .expect("watch() can only be called once");
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// A controlled ValueTracker double driven directly by the test
pub struct ControlledTracker {
    slot: watch::Sender<Option<ObservedValue>>,
}

impl ControlledTracker {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Record an observation, waking any blocked waiter
    pub fn set_value(&self, data: &[u8]) {
        self.slot
            .send_replace(Some(ObservedValue::new(data.to_vec())));
    }

    /// Clear the observation
    pub fn clear(&self) {
        self.slot.send_replace(None);
    }
}

#[async_trait]
impl ValueTracker for ControlledTracker {
    fn current(&self) -> Option<ObservedValue> {
        self.slot.borrow().clone()
    }

    async fn await_value(&self, timeout: Duration) -> Result<Option<ObservedValue>> {
        let mut rx = self.slot.subscribe();

        let wait = async move {
            loop {
                if let Some(value) = (*rx.borrow_and_update()).clone() {
                    return Ok(Some(value));
                }
                if rx.changed().await.is_err() {
                    return Err(Error::cancelled("tracker double dropped"));
                }
            }
        };

        if timeout.is_zero() {
            wait.await
        } else {
            match tokio::time::timeout(timeout, wait).await {
                Ok(outcome) => outcome,
                Err(_) => Ok(None),
            }
        }
    }
}

/// An abort handler that counts invocations
pub struct CountingAbort {
    count: AtomicUsize,
    last: Mutex<Option<String>>,
}

impl CountingAbort {
    pub fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }
}

impl Abort for CountingAbort {
    fn abort(&self, why: &str, cause: Error) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(format!("{why}: {cause}"));
    }
}

/// Helper to create a minimal WatchConfig for testing
pub fn watch_config() -> WatchConfig {
    WatchConfig::new("/cluster/leader").with_label("leader-address")
}
