//! Shared registry of tracked identities.
//!
//! Insertion-ordered, unique by id. Every operation takes the whole-list lock once, so no
//! caller can observe a half-applied mutation from the tracking loop or a command handler.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::types::TrackedTarget;

/// Cheap to clone; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct WatchList {
    targets: Arc<Mutex<Vec<TrackedTarget>>>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the target with `id`, if tracked.
    pub async fn find(&self, id: i64) -> Option<TrackedTarget> {
        let targets = self.targets.lock().await;
        targets.iter().find(|t| t.id == id).cloned()
    }

    /// Appends `target` unless its id is already tracked. Returns true if it was inserted.
    pub async fn add(&self, target: TrackedTarget) -> bool {
        let mut targets = self.targets.lock().await;
        if targets.iter().any(|t| t.id == target.id) {
            debug!(target_id = target.id, "watch list: already tracked, add skipped");
            return false;
        }
        debug!(target_id = target.id, "watch list: added");
        targets.push(target);
        true
    }

    /// Removes every entry with `id`. Returns how many were removed (0 when absent).
    pub async fn remove(&self, id: i64) -> usize {
        let mut targets = self.targets.lock().await;
        let before = targets.len();
        targets.retain(|t| t.id != id);
        before - targets.len()
    }

    /// Removes `stored` only if the list still holds that exact entry. Returns false when the
    /// id is gone or was replaced by a fresh entry since `stored` was read.
    pub async fn remove_if_unchanged(&self, stored: &TrackedTarget) -> bool {
        let mut targets = self.targets.lock().await;
        let Some(pos) = targets.iter().position(|t| t == stored) else {
            debug!(target_id = stored.id, "watch list: entry changed, conditional remove skipped");
            return false;
        };
        targets.remove(pos);
        true
    }

    /// Removes the first target the operator's argument names (see [`TrackedTarget::matches`])
    /// and returns it.
    pub async fn remove_matching(&self, arg: &str) -> Option<TrackedTarget> {
        let mut targets = self.targets.lock().await;
        let found = targets.iter().find(|t| t.matches(arg)).cloned()?;
        targets.retain(|t| t.id != found.id);
        Some(found)
    }

    /// Empties the list. Returns how many targets were dropped.
    pub async fn clear(&self) -> usize {
        let mut targets = self.targets.lock().await;
        let count = targets.len();
        targets.clear();
        count
    }

    /// Copy of the list in insertion order.
    pub async fn snapshot(&self) -> Vec<TrackedTarget> {
        self.targets.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.targets.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.targets.lock().await.is_empty()
    }
}
