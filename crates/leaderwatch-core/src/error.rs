//! Error types for the leaderwatch system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for leaderwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the leaderwatch system
#[derive(Error, Debug)]
pub enum Error {
    /// The tracked node holds bytes that are not a valid leader address
    #[error("malformed leader address payload: {0}")]
    Decode(String),

    /// A blocked wait was cancelled before a value appeared
    ///
    /// Raised when the tracker is stopped or its watch is irrecoverably
    /// lost while a caller is blocked. Distinct from a timeout, which is
    /// reported as an absent value, not an error.
    #[error("wait cancelled: {0}")]
    Cancelled(String),

    /// Coordination session errors (read failures, lost watches)
    #[error("coordination session error: {0}")]
    Session(String),

    /// Tracker lifecycle errors
    #[error("tracker error: {0}")]
    Tracker(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors (from session implementations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a cancellation error
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Create a coordination session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a tracker error
    pub fn tracker(msg: impl Into<String>) -> Self {
        Self::Tracker(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True if this error reports a cancelled wait
    ///
    /// Callers that block for the leader address use this to tell "the
    /// tracker went away under me" apart from every other failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
