// # Coordination Session Trait
//
// Defines the interface to the external coordination service for one
// watched path.
//
// ## Implementations
//
// - In-process (embedding, CI): `leaderwatch-coord-memory` crate
// - Future: ZooKeeper-backed, etcd-backed sessions
//
// ## Scope
//
// Session and connection management, watch registration, and watch
// re-registration after disconnect/reconnect all live BEHIND this trait.
// The tracker consumes the session as a trusted collaborator: it reads a
// snapshot, consumes the notification stream, and does nothing else. A
// session that can no longer maintain its watch ends the stream; recovery
// policy belongs to the session, never to the tracker.

use async_trait::async_trait;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;

use crate::config::SessionConfig;
use crate::error::Result;

/// A change notification for a watched path
///
/// Create/update events carry the node's new payload so consumers never
/// have to issue a follow-up read that could race a later change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    /// The path came into existence with the given payload
    Created(Vec<u8>),
    /// The path's payload was replaced
    DataChanged(Vec<u8>),
    /// The path was deleted
    Deleted,
}

/// Trait for coordination session implementations
///
/// This trait defines two core capabilities:
/// 1. **read()**: immediate snapshot of one path's payload
/// 2. **watch()**: stream of change notifications for one path
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Behavior
///
/// - `watch()` must be registered before any `read()` whose result is used
///   to seed a tracker, so no change slips between the two.
/// - The stream yields one event per create/update/delete and should run
///   until the session is closed; ending the stream signals that the watch
///   is irrecoverably lost.
/// - Must be cancellation-safe (dropping the stream cleans up resources).
#[async_trait]
pub trait CoordSession: Send + Sync {
    /// Read the current payload of a path
    ///
    /// Returns immediately with the payload, or `None` if the path does
    /// not exist.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Watch a path for changes
    ///
    /// Returns a pinned boxed stream of [`NodeEvent`] items.
    fn watch(&self, path: &str) -> Pin<Box<dyn Stream<Item = NodeEvent> + Send + 'static>>;
}

/// Helper trait for constructing sessions from configuration
pub trait SessionFactory: Send + Sync {
    /// Create a session instance from configuration
    fn create(&self, config: &SessionConfig) -> Result<Arc<dyn CoordSession>>;
}
