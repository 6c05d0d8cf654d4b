// # Value Tracker Trait
//
// Defines the interface between the watched-value slot and the leader
// address cache layered on top of it.
//
// ## Purpose
//
// The tracker owns the only shared mutable state in the unit: the last
// observed payload of one coordination path. The cache holds no state of
// its own; it reads through this trait and decodes on every call.
//
// ## Implementations
//
// - `NodeTracker` in this crate (the watch-channel-backed slot)
// - Test doubles in contract tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::Result;

/// One observation of the tracked path's payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedValue {
    /// The raw payload as last observed
    pub data: Vec<u8>,
    /// When this observation was recorded
    pub observed_at: DateTime<Utc>,
}

impl ObservedValue {
    /// Record an observation, stamped now
    ///
    /// This constructor is public for use in:
    /// - `ValueTracker` implementations
    /// - Contract tests and test doubles
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            observed_at: Utc::now(),
        }
    }
}

/// Trait for watched-value tracker implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks,
/// concurrently with notification delivery on a task the caller does not
/// control.
#[async_trait]
pub trait ValueTracker: Send + Sync {
    /// Immediate snapshot of the last observed value
    ///
    /// Never suspends. Returns `None` if the path does not currently exist,
    /// has not yet been observed, or the tracker has shut down.
    fn current(&self) -> Option<ObservedValue>;

    /// Presence check without copying the payload
    fn has_value(&self) -> bool {
        self.current().is_some()
    }

    /// Block until a value is present, the timeout elapses, or the wait
    /// is cancelled
    ///
    /// A zero timeout waits indefinitely. A value recorded before this call
    /// begins is returned immediately — implementations must close the
    /// check-then-wait race so no wakeup is ever missed.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: a value was present or appeared in time
    /// - `Ok(None)`: the deadline elapsed with no value
    /// - `Err(Error::Cancelled)`: the tracker stopped or failed mid-wait
    async fn await_value(&self, timeout: Duration) -> Result<Option<ObservedValue>>;
}
