// # Memory Coordination Session
//
// This crate provides an in-process coordination session for the
// leaderwatch system.
//
// ## Purpose
//
// This is an **embedded session** for:
// - Single-process clusters and embedding scenarios
// - CI/CD testing
// - Debugging and validation
//
// ## IMPORTANT: Not a Replicated Store
//
// In production, leader addresses live in a consensus-backed coordination
// service and members connect through a real session implementation. This
// session keeps nodes in process memory: there is no replication, no
// sessions to expire, and consequently no disconnect/reconnect handling.
//
// ## Architecture
//
// A node map plus per-path watcher fan-out. Every create/set/delete
// notifies all live watchers of that path, in order; closed watchers are
// pruned on the next notification.

use async_trait::async_trait;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use leaderwatch_core::SessionRegistry;
use leaderwatch_core::config::SessionConfig;
use leaderwatch_core::traits::{CoordSession, NodeEvent, SessionFactory};
use leaderwatch_core::{Error, Result};

#[derive(Default)]
struct CoordState {
    /// Node payloads by path
    nodes: HashMap<String, Vec<u8>>,
    /// Live watchers by path
    watchers: HashMap<String, Vec<mpsc::UnboundedSender<NodeEvent>>>,
}

/// In-process coordination service
///
/// Clones share the same node namespace, so one handle can publish while
/// another is handed to a tracker as its session.
///
/// # Example
///
/// ```rust,no_run
/// use leaderwatch_coord_memory::MemoryCoordinator;
///
/// let coordinator = MemoryCoordinator::new();
/// coordinator.publish("/cluster/leader", b"10.0.0.5:60000");
/// coordinator.delete("/cluster/leader").unwrap();
/// ```
#[derive(Clone, Default)]
pub struct MemoryCoordinator {
    inner: Arc<Mutex<CoordState>>,
}

impl MemoryCoordinator {
    /// Create a new empty coordinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node
    ///
    /// Fails if the path already exists, matching the coordination
    /// service's create semantics.
    pub fn create_node(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.nodes.contains_key(path) {
            return Err(Error::session(format!("node already exists: {path}")));
        }
        state.nodes.insert(path.to_string(), data.to_vec());
        debug!(%path, bytes = data.len(), "node created");
        Self::notify(&mut state, path, NodeEvent::Created(data.to_vec()));
        Ok(())
    }

    /// Replace an existing node's payload
    pub fn set_data(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if !state.nodes.contains_key(path) {
            return Err(Error::session(format!("no node at: {path}")));
        }
        state.nodes.insert(path.to_string(), data.to_vec());
        debug!(%path, bytes = data.len(), "node data changed");
        Self::notify(&mut state, path, NodeEvent::DataChanged(data.to_vec()));
        Ok(())
    }

    /// Create the node or replace its payload
    pub fn publish(&self, path: &str, data: &[u8]) {
        let mut state = self.inner.lock().unwrap();
        let existed = state
            .nodes
            .insert(path.to_string(), data.to_vec())
            .is_some();
        debug!(%path, bytes = data.len(), existed, "node published");
        let event = if existed {
            NodeEvent::DataChanged(data.to_vec())
        } else {
            NodeEvent::Created(data.to_vec())
        };
        Self::notify(&mut state, path, event);
    }

    /// Delete a node
    pub fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.nodes.remove(path).is_none() {
            return Err(Error::session(format!("no node at: {path}")));
        }
        debug!(%path, "node deleted");
        Self::notify(&mut state, path, NodeEvent::Deleted);
        Ok(())
    }

    /// Check whether a node exists
    pub fn exists(&self, path: &str) -> bool {
        self.inner.lock().unwrap().nodes.contains_key(path)
    }

    fn notify(state: &mut CoordState, path: &str, event: NodeEvent) {
        if let Some(watchers) = state.watchers.get_mut(path) {
            watchers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

#[async_trait]
impl CoordSession for MemoryCoordinator {
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.lock().unwrap().nodes.get(path).cloned())
    }

    fn watch(&self, path: &str) -> Pin<Box<dyn Stream<Item = NodeEvent> + Send + 'static>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .lock()
            .unwrap()
            .watchers
            .entry(path.to_string())
            .or_default()
            .push(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// Factory for creating memory sessions
pub struct MemoryFactory;

impl SessionFactory for MemoryFactory {
    fn create(&self, config: &SessionConfig) -> Result<Arc<dyn CoordSession>> {
        match config {
            SessionConfig::Memory => Ok(Arc::new(MemoryCoordinator::new())),
            _ => Err(Error::config("Invalid config for memory session")),
        }
    }
}

/// Register the memory session with a registry
pub fn register(registry: &SessionRegistry) {
    registry.register_session("memory", Box::new(MemoryFactory));
}
