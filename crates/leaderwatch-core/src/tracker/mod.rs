//! Watched-node tracker
//!
//! The NodeTracker is responsible for:
//! - Consuming change notifications for one coordination path via CoordSession
//! - Maintaining the last-observed-value slot those notifications drive
//! - Waking blocked waiters the moment a value appears
//! - Delegating unrecoverable watch loss to the Abort handler
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ CoordSession │─── NodeEvent ─────▶│  pump task   │
//! └──────────────┘                    └──────┬───────┘
//!                                            │ send_replace
//!                                            ▼
//!                                    ┌──────────────┐
//!                                    │     slot     │ (watch channel)
//!                                    └──────┬───────┘
//!                                            │
//!                     current() / await_value()  ──▶ callers
//! ```
//!
//! ## Event Flow
//!
//! 1. `start()` registers the watch, then seeds the slot from an initial read
//! 2. The pump task applies each incoming event to the slot
//! 3. Readers snapshot the slot; waiters are woken through the watch channel
//! 4. Watch loss marks the slot failed, cancels waiters, and invokes abort

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, error, warn};

use crate::config::WatchConfig;
use crate::error::{Error, Result};
use crate::traits::{Abort, CoordSession, NodeEvent, ObservedValue, ValueTracker};

/// Events emitted by the NodeTracker for external monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Tracking started (watch registered, slot seeded)
    Started { path: String },

    /// A payload was observed (node created or updated)
    ValueObserved { path: String, bytes: usize },

    /// The node was deleted
    ValueCleared { path: String },

    /// The watch was irrecoverably lost
    WatchLost { path: String },

    /// Tracking stopped by its owner
    Stopped { path: String },
}

/// The slot's three states. `Failed` is terminal: entered on owner stop or
/// watch loss, and wakes every blocked waiter with a cancellation.
#[derive(Debug, Clone)]
enum Slot {
    Absent,
    Present(ObservedValue),
    Failed,
}

struct PumpHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Watch-driven single-value tracker for one coordination path
///
/// The tracker owns the unit's only shared mutable state: a watch channel
/// holding the last observed payload. Notification delivery happens on a
/// pump task the callers do not control; the watch channel's mark-seen
/// semantics make the "check current value, then register for wake-up"
/// sequence atomic, so a value recorded before a wait begins is always
/// returned immediately.
///
/// ## Lifecycle
///
/// 1. Create with [`NodeTracker::new()`]
/// 2. Start tracking with [`NodeTracker::start()`] (one-shot)
/// 3. Stop with [`NodeTracker::stop()`]; stopping is terminal
///
/// The tracker performs no recovery and no retries: a session that cannot
/// keep its watch alive ends the event stream, and the tracker hands the
/// failure to the [`Abort`] handler supplied at construction.
pub struct NodeTracker {
    /// Tracked coordination path, fixed for the tracker's lifetime
    path: String,

    /// Log identity supplied by the owner
    label: String,

    /// Last-observed-value slot
    slot: watch::Sender<Slot>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<TrackerEvent>,

    /// Receiver for unrecoverable failures
    abort: Arc<dyn Abort>,

    /// Guards one-shot start
    running: AtomicBool,

    /// Shutdown handle for the pump task
    pump: Mutex<Option<PumpHandle>>,
}

impl NodeTracker {
    /// Create a tracker for the configured path
    ///
    /// # Returns
    ///
    /// A tuple of (tracker, event_receiver) where event_receiver yields
    /// [`TrackerEvent`]s for monitoring/logging.
    pub fn new(
        config: WatchConfig,
        abort: Arc<dyn Abort>,
    ) -> Result<(Self, mpsc::Receiver<TrackerEvent>)> {
        config.validate()?;

        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity);
        let (slot, _) = watch::channel(Slot::Absent);
        let label = config.effective_label().to_string();

        let tracker = Self {
            path: config.path,
            label,
            slot,
            event_tx,
            abort,
            running: AtomicBool::new(false),
            pump: Mutex::new(None),
        };

        Ok((tracker, event_rx))
    }

    /// The tracked path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The log identity
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start tracking: register the watch, seed the slot, spawn the pump
    ///
    /// `start` is one-shot; calling it again is an error. The watch is
    /// registered before the initial read, so a change landing between the
    /// two is delivered through the stream instead of being lost.
    pub async fn start(&self, session: Arc<dyn CoordSession>) -> Result<()> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::tracker(format!(
                "tracker for {} already started",
                self.path
            )));
        }

        let mut stream = session.watch(&self.path);

        let initial = match session.read(&self.path).await {
            Ok(initial) => initial,
            Err(e) => {
                self.running.store(false, Ordering::Release);
                return Err(e);
            }
        };

        Self::emit_to(
            &self.event_tx,
            TrackerEvent::Started {
                path: self.path.clone(),
            },
        );

        if let Some(data) = initial {
            debug!(tracker = %self.label, path = %self.path, "seeded from initial read");
            Self::apply_to_slot(
                &self.slot,
                &self.event_tx,
                &self.label,
                &self.path,
                NodeEvent::Created(data),
            );
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let slot = self.slot.clone();
        let event_tx = self.event_tx.clone();
        let label = self.label.clone();
        let path = self.path.clone();
        let abort = Arc::clone(&self.abort);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = stream.next() => match event {
                        Some(event) => {
                            Self::apply_to_slot(&slot, &event_tx, &label, &path, event);
                        }
                        None => {
                            // the stream only ends when the session cannot
                            // keep its watch alive
                            error!(tracker = %label, path = %path, "watch lost");
                            slot.send_replace(Slot::Failed);
                            Self::emit_to(
                                &event_tx,
                                TrackerEvent::WatchLost { path: path.clone() },
                            );
                            abort.abort(
                                "coordination watch lost",
                                Error::session(format!("watch stream for {path} ended")),
                            );
                            break;
                        }
                    },

                    _ = &mut shutdown_rx => break,
                }
            }
        });

        let mut pump = self.pump.lock().unwrap();
        *pump = Some(PumpHandle {
            shutdown: shutdown_tx,
            task,
        });

        Ok(())
    }

    /// Stop tracking
    ///
    /// Shuts the pump down, then marks the slot failed so every blocked
    /// waiter wakes with a cancellation error. Stopping is terminal; the
    /// tracker cannot be restarted.
    pub async fn stop(&self) {
        let handle = self.pump.lock().unwrap().take();
        if let Some(PumpHandle { shutdown, task }) = handle {
            drop(shutdown);
            let _ = task.await;
        }

        self.slot.send_replace(Slot::Failed);
        Self::emit_to(
            &self.event_tx,
            TrackerEvent::Stopped {
                path: self.path.clone(),
            },
        );
        debug!(tracker = %self.label, path = %self.path, "tracker stopped");
    }

    /// Apply a change notification directly
    ///
    /// This is the same path the pump uses. It is public for:
    /// - Callback-style session integrations that deliver events without
    ///   a stream
    /// - Contract tests
    pub fn apply(&self, event: NodeEvent) {
        Self::apply_to_slot(&self.slot, &self.event_tx, &self.label, &self.path, event);
    }

    fn apply_to_slot(
        slot: &watch::Sender<Slot>,
        event_tx: &mpsc::Sender<TrackerEvent>,
        label: &str,
        path: &str,
        event: NodeEvent,
    ) {
        match event {
            NodeEvent::Created(data) | NodeEvent::DataChanged(data) => {
                let bytes = data.len();
                let mut applied = false;
                slot.send_modify(|state| {
                    // Failed is terminal; late events must not resurrect a value
                    if !matches!(state, Slot::Failed) {
                        *state = Slot::Present(ObservedValue::new(data));
                        applied = true;
                    }
                });
                if applied {
                    debug!(tracker = %label, path = %path, bytes, "node value observed");
                    Self::emit_to(
                        event_tx,
                        TrackerEvent::ValueObserved {
                            path: path.to_string(),
                            bytes,
                        },
                    );
                }
            }
            NodeEvent::Deleted => {
                let mut applied = false;
                slot.send_modify(|state| {
                    if !matches!(state, Slot::Failed) {
                        *state = Slot::Absent;
                        applied = true;
                    }
                });
                if applied {
                    debug!(tracker = %label, path = %path, "node deleted");
                    Self::emit_to(
                        event_tx,
                        TrackerEvent::ValueCleared {
                            path: path.to_string(),
                        },
                    );
                }
            }
        }
    }

    fn emit_to(event_tx: &mpsc::Sender<TrackerEvent>, event: TrackerEvent) {
        match event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(?event, "tracker event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[async_trait]
impl ValueTracker for NodeTracker {
    fn current(&self) -> Option<ObservedValue> {
        match &*self.slot.borrow() {
            Slot::Present(value) => Some(value.clone()),
            Slot::Absent | Slot::Failed => None,
        }
    }

    fn has_value(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Present(_))
    }

    async fn await_value(&self, timeout: Duration) -> Result<Option<ObservedValue>> {
        let mut rx = self.slot.subscribe();

        let wait = async move {
            loop {
                match (*rx.borrow_and_update()).clone() {
                    Slot::Present(value) => return Ok(Some(value)),
                    Slot::Failed => {
                        return Err(Error::cancelled(
                            "tracker stopped while waiting for a value",
                        ));
                    }
                    Slot::Absent => {}
                }

                if rx.changed().await.is_err() {
                    return Err(Error::cancelled(
                        "tracker dropped while waiting for a value",
                    ));
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
