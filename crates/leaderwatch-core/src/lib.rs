// # leaderwatch-core
//
// Core library for watch-driven cluster leader address tracking.
//
// ## Architecture Overview
//
// A cluster member discovers the current leader's network address through a
// coordination service's watched node:
//
// - **CoordSession**: Trait for reading and watching one coordination path
// - **NodeTracker**: Watch-driven single-value slot for one path
// - **LeaderCache**: Decodes the slot into the leader's network address
// - **Abort**: Out-of-band delegation of unrecoverable failures
// - **SessionRegistry**: Plugin-based registry for session implementations
//
// ## Design Principles
//
// 1. **Observation only**: This library never elects a leader and never
//    writes to the coordination service; it republishes what it observes
// 2. **Event-Driven**: Notifications drive the slot; readers never poll
// 3. **Composition**: A generic watched-value tracker with address decoding
//    layered on top, not a specialized subclass
// 4. **Library-First**: Lifecycle is fully owned by the embedding process

pub mod addr;
pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod tracker;
pub mod traits;

// Re-export core types for convenience
pub use addr::LeaderAddr;
pub use cache::LeaderCache;
pub use config::{LeaderWatchConfig, SessionConfig, WatchConfig};
pub use error::{Error, Result};
pub use registry::SessionRegistry;
pub use tracker::{NodeTracker, TrackerEvent};
pub use traits::{Abort, CoordSession, LogAbort, NodeEvent, ObservedValue, ValueTracker};
