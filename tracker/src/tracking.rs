//! The tracking cycle.

use std::sync::Arc;
use std::time::Duration;

use handlers::replies;
use tokio::task::JoinHandle;
use tracer_core::{
    ActionButton, MessagingGateway, Presence, PresenceGateway, RepeatAction, Result, SendOptions,
    TrackedTarget, WatchList,
};
use tracing::{debug, error, info, instrument};

use crate::periodic::PeriodicRunner;
use crate::policy;

pub const DEFAULT_TRACK_INTERVAL: Duration = Duration::from_secs(7);

/// Watches the shared list and notifies the operator once per transition.
#[derive(Clone)]
pub struct Tracker {
    watch_list: WatchList,
    presence: Arc<dyn PresenceGateway>,
    messenger: Arc<dyn MessagingGateway>,
    operator_chat: i64,
}

impl Tracker {
    pub fn new(
        watch_list: WatchList,
        presence: Arc<dyn PresenceGateway>,
        messenger: Arc<dyn MessagingGateway>,
        operator_chat: i64,
    ) -> Self {
        Self {
            watch_list,
            presence,
            messenger,
            operator_chat,
        }
    }

    /// One cycle. Skips the remote call on an empty list. A query failure is returned before
    /// anything is removed. Every fired target is removed first and then notified in its own
    /// task; the returned handles belong to those notifications.
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> Result<Vec<JoinHandle<()>>> {
        let snapshot = self.watch_list.snapshot().await;
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = snapshot.iter().map(|t| t.id.to_string()).collect();
        let records = self.presence.batch_query(&keys).await?;
        debug!(tracked = snapshot.len(), returned = records.len(), "step: presence fetched");

        let mut notifications = Vec::new();
        for target in policy::detect(&snapshot, &records) {
            // Removed, cleared or re-armed since the snapshot: the live entry was never judged.
            if !self.watch_list.remove_if_unchanged(&target).await {
                debug!(target_id = target.id, "fired target already gone or replaced");
                continue;
            }
            let last_seen_at = records
                .iter()
                .find(|r| r.id == target.id)
                .and_then(Presence::last_seen_at);
            info!(
                target_id = target.id,
                last_seen_at = ?last_seen_at,
                "step: target transitioned"
            );
            notifications.push(self.spawn_notification(target));
        }
        Ok(notifications)
    }

    fn spawn_notification(&self, target: TrackedTarget) -> JoinHandle<()> {
        let messenger = self.messenger.clone();
        let chat_id = self.operator_chat;
        tokio::spawn(async move {
            let repeat = RepeatAction {
                id: target.id,
                domain_is_primary: target.domain_is_primary,
            };
            let options =
                SendOptions::with_action(ActionButton::new(replies::REPEAT_BUTTON, repeat.encode()));
            if let Err(e) = messenger
                .send_message(chat_id, &replies::online(&target), options)
                .await
            {
                error!(error = %e, target_id = target.id, chat_id, "Failed to send notification");
            }
        })
    }

    /// Runs a cycle every `period`, forever.
    pub async fn run(self, period: Duration) {
        let tracker = Arc::new(self);
        PeriodicRunner::new("tracking", period)
            .run(move || {
                let tracker = tracker.clone();
                async move { tracker.poll_once().await.map(|n| n.len()) }
            })
            .await;
    }
}
