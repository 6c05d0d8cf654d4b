//! Leader address cache
//!
//! A thin interpretive layer over the watched-value tracker: it translates
//! byte presence/absence at the tracked path into leader-address
//! presence/absence, with a non-blocking snapshot read, a cheap presence
//! check, and a blocking wait with timeout and cancellation semantics.
//!
//! The cache holds no state of its own beyond a reference to the tracker
//! and the lock that serializes the blocking path. The leader address is
//! reconstructed from the raw payload on every read, never stored.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::addr::LeaderAddr;
use crate::error::Result;
use crate::traits::ValueTracker;

/// Tracks the network address of the current cluster leader
///
/// The leader publishes its address at a well-known coordination path; this
/// cache observes it through a [`ValueTracker`] and republishes it as a
/// structured address. It never elects, never writes to the coordination
/// service, and never caches historical values — only the most recent
/// observation is visible.
///
/// Use [`address()`](Self::address) for the current leader, or the blocking
/// [`wait_for_address()`](Self::wait_for_address) to block until one is
/// available.
///
/// ## Threading
///
/// [`address()`](Self::address) and [`has_leader()`](Self::has_leader) are
/// point-in-time snapshot reads: they never suspend and may run fully
/// concurrently with each other, with waiters, and with notification
/// delivery. The blocking path is serialized per cache instance (see
/// [`wait_for_address()`](Self::wait_for_address)).
pub struct LeaderCache {
    /// Watched-value tracker for the leader's path
    tracker: Arc<dyn ValueTracker>,

    /// Serializes the blocking wait path
    wait_lock: Mutex<()>,
}

impl LeaderCache {
    /// Create a cache over an already-constructed tracker
    ///
    /// The cache does not own the tracker's lifecycle: starting and
    /// stopping the watch belong to the tracker's owner.
    pub fn new(tracker: Arc<dyn ValueTracker>) -> Self {
        Self {
            tracker,
            wait_lock: Mutex::new(()),
        }
    }

    /// Get the address of the current leader, if one is available
    ///
    /// Non-blocking snapshot read. Returns `Ok(None)` if no leader is
    /// currently published — the normal "no leader" state, never an error.
    /// A present but malformed payload is a decode error, surfaced
    /// distinctly from absence.
    ///
    /// Use [`wait_for_address()`](Self::wait_for_address) to block until a
    /// leader is available.
    pub fn address(&self) -> Result<Option<LeaderAddr>> {
        match self.tracker.current() {
            Some(observed) => LeaderAddr::decode(&observed.data).map(Some),
            None => Ok(None),
        }
    }

    /// Check if a leader is currently published
    ///
    /// Non-blocking presence check; does not pay the decode cost. Returns
    /// `false` exactly when the tracked path does not currently exist or
    /// has not yet been observed.
    pub fn has_leader(&self) -> bool {
        self.tracker.has_value()
    }

    /// Get the address of the current leader, blocking until one is
    /// available, the timeout elapses, or the wait is cancelled
    ///
    /// A zero `timeout` waits indefinitely. A value recorded before this
    /// call begins is returned immediately.
    ///
    /// `Ok(None)` means no leader was observed within the deadline. By
    /// contract this does not distinguish "there is no leader" from "the
    /// deadline elapsed first"; callers must not treat it as a hard
    /// failure.
    ///
    /// Waiters on one cache instance are served one at a time: a second
    /// concurrent caller blocks until the first observes a value or times
    /// out, and its own deadline clock starts when its turn begins. This
    /// delays later waiters by at most the first waiter's observation
    /// time; it never loses a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(addr))`: the leader's address
    /// - `Ok(None)`: no leader observed within the deadline
    /// - `Err(Error::Cancelled)`: the tracker shut down mid-wait
    /// - `Err(Error::Decode)`: a value appeared but was malformed
    pub async fn wait_for_address(&self, timeout: Duration) -> Result<Option<LeaderAddr>> {
        let _turn = self.wait_lock.lock().await;

        match self.tracker.await_value(timeout).await? {
            Some(observed) => LeaderAddr::decode(&observed.data).map(Some),
            None => Ok(None),
        }
    }
}
