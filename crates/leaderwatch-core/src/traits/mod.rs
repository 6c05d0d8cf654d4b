//! Core traits for the leaderwatch system
//!
//! This module defines the abstract interfaces at the unit's boundaries.
//!
//! - [`CoordSession`]: read and watch one coordination-service path
//! - [`ValueTracker`]: the watched-value slot consumed by the leader cache
//! - [`Abort`]: out-of-band delegation of unrecoverable failures

pub mod abort;
pub mod coord_session;
pub mod value_tracker;

pub use abort::{Abort, LogAbort};
pub use coord_session::{CoordSession, NodeEvent, SessionFactory};
pub use value_tracker::{ObservedValue, ValueTracker};
