//! # tracker
//!
//! The presence tracking loop. [`policy`] decides which targets transitioned, [`PeriodicRunner`]
//! owns the cadence, and [`Tracker`] ties a cycle together: snapshot, one batch query,
//! remove-then-notify for every fired target.

pub mod policy;
mod periodic;
mod tracking;

pub use periodic::PeriodicRunner;
pub use tracking::{Tracker, DEFAULT_TRACK_INTERVAL};
