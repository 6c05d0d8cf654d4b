//! Plugin-based session registry
//!
//! The registry allows coordination session implementations to be
//! registered dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Registration
//!
//! Implementations should register themselves during initialization:
//!
//! ```rust,ignore
//! // In a session implementation crate
//! pub fn register(registry: &SessionRegistry) {
//!     registry.register_session("memory", Box::new(MemoryFactory));
//! }
//! ```

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::traits::{CoordSession, SessionFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry for plugin-based coordination session creation
///
/// The registry maintains a map of session type names to factory objects,
/// allowing dynamic instantiation of sessions based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct SessionRegistry {
    /// Registered session factories
    sessions: RwLock<HashMap<String, Arc<dyn SessionFactory>>>,
}

impl SessionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session factory
    ///
    /// # Parameters
    ///
    /// - `name`: Session type name (e.g., "memory", "zookeeper")
    /// - `factory`: Factory object for creating session instances
    pub fn register_session(&self, name: impl Into<String>, factory: Box<dyn SessionFactory>) {
        let name = name.into();
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(name, Arc::from(factory));
    }

    /// Create a session from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn CoordSession>)`: Created session instance
    /// - `Err(Error)`: If the session type is not registered or creation fails
    pub fn create_session(&self, config: &SessionConfig) -> Result<Arc<dyn CoordSession>> {
        let session_type = config.type_name();
        let sessions = self.sessions.read().unwrap();

        let factory = sessions
            .get(session_type)
            .ok_or_else(|| Error::config(format!("Unknown session type: {}", session_type)))?;

        factory.create(config)
    }

    /// List all registered session types
    pub fn list_sessions(&self) -> Vec<String> {
        let sessions = self.sessions.read().unwrap();
        sessions.keys().cloned().collect()
    }

    /// Check if a session type is registered
    pub fn has_session(&self, name: &str) -> bool {
        let sessions = self.sessions.read().unwrap();
        sessions.contains_key(name)
    }
}
