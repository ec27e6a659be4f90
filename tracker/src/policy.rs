//! Transition policy. Pure functions; no I/O, no clock.

use tracer_core::{Presence, TrackedTarget};

/// True when `current` shows the target came online or its last-seen time moved since the
/// stored snapshot.
pub fn has_transitioned(stored: &TrackedTarget, current: &Presence) -> bool {
    current.online || current.last_seen != stored.last_seen
}

/// Stored targets that transitioned, in record order. Every snapshot entry sharing a record's
/// id is checked, so duplicate ids all show up here.
pub fn detect(snapshot: &[TrackedTarget], records: &[Presence]) -> Vec<TrackedTarget> {
    records
        .iter()
        .flat_map(|record| {
            snapshot
                .iter()
                .filter(move |stored| stored.id == record.id && has_transitioned(stored, record))
        })
        .cloned()
        .collect()
}
