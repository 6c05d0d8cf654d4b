//! Configuration types for the leaderwatch system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main leaderwatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderWatchConfig {
    /// Coordination session configuration
    pub session: SessionConfig,

    /// Watched-node configuration
    pub watch: WatchConfig,
}

impl LeaderWatchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.session.validate()?;
        self.watch.validate()?;
        Ok(())
    }

    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Coordination session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionConfig {
    /// In-process coordination service (single process, not replicated)
    Memory,

    /// Custom coordination session
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl SessionConfig {
    /// Validate the session configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SessionConfig::Memory => Ok(()),
            SessionConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom session factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom session config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the session type name
    pub fn type_name(&self) -> &str {
        match self {
            SessionConfig::Memory => "memory",
            SessionConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::Memory
    }
}

/// Watched-node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Coordination namespace path where the leader publishes its address
    /// (e.g., "/cluster/leader")
    pub path: String,

    /// Log identity attached to tracker diagnostics
    ///
    /// Supplied by the component that owns the tracker so its log lines are
    /// attributable to that component's purpose. Defaults to the path.
    #[serde(default)]
    pub label: Option<String>,

    /// Capacity of the tracker event channel
    ///
    /// When full, new tracker events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl WatchConfig {
    /// Create a configuration for one watched path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: None,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Set the log identity
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The log identity to use: the explicit label, or the path
    pub fn effective_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.path)
    }

    /// Validate the watch configuration
    ///
    /// The path must be absolute and each segment non-empty, matching the
    /// coordination service's namespace rules.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.path.is_empty() {
            return Err(crate::Error::config("Watched path cannot be empty"));
        }

        if !self.path.starts_with('/') {
            return Err(crate::Error::config(format!(
                "Watched path must be absolute (start with '/'). Got: {}",
                self.path
            )));
        }

        for segment in self.path[1..].split('/') {
            if segment.is_empty() {
                return Err(crate::Error::config(format!(
                    "Watched path has an empty segment: '{}'",
                    self.path
                )));
            }
        }

        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Event channel capacity must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn default_event_channel_capacity() -> usize {
    256
}
