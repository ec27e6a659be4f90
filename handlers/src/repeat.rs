//! `repeat:` button callbacks: re-arm a target after its notification fired.

use std::sync::Arc;

use async_trait::async_trait;
use tracer_core::{
    ActionButton, ActionPayload, CallbackAction, Event, EventKind, Handler, HandlerResponse,
    MessagingGateway, PresenceGateway, RepeatAction, Result, TrackedTarget, WatchList,
    PLUG_PAYLOAD,
};
use tracing::{error, info, instrument, warn};

use crate::replies;

pub struct RepeatHandler {
    watch_list: WatchList,
    presence: Arc<dyn PresenceGateway>,
    messenger: Arc<dyn MessagingGateway>,
}

impl RepeatHandler {
    pub fn new(
        watch_list: WatchList,
        presence: Arc<dyn PresenceGateway>,
        messenger: Arc<dyn MessagingGateway>,
    ) -> Self {
        Self {
            watch_list,
            presence,
            messenger,
        }
    }

    async fn answer(&self, action: &CallbackAction, text: &str) {
        if let Err(e) = self.messenger.answer_action(&action.id, text, false).await {
            error!(error = %e, callback_id = %action.id, "Failed to answer callback");
        }
    }

    /// Re-queries the identity and adds it back with fresh fields unless it is online now.
    #[instrument(skip(self, action), fields(target_id = repeat.id))]
    async fn rearm(&self, action: &CallbackAction, repeat: RepeatAction) {
        let presences = match self.presence.batch_query(&[repeat.id.to_string()]).await {
            Ok(presences) => presences,
            Err(e) => {
                error!(error = %e, "Presence query for re-arm failed");
                self.answer(action, replies::ERROR_OCCURRED).await;
                return;
            }
        };
        let [presence] = presences.as_slice() else {
            warn!(count = presences.len(), "Re-arm query did not return exactly one user");
            self.answer(action, replies::ERROR_OCCURRED).await;
            return;
        };

        if presence.online {
            self.answer(action, replies::USER_IS_ONLINE).await;
            return;
        }

        let target = TrackedTarget::from_presence(presence, repeat.domain_is_primary);
        if !self.watch_list.add(target).await {
            self.answer(action, replies::ALREADY_ADDED).await;
            return;
        }
        info!("step: target re-armed");
        self.answer(action, replies::USER_ADDED_AGAIN).await;

        if let Some(origin) = action.origin {
            let marker = vec![ActionButton::new(replies::REPEATED_BUTTON, PLUG_PAYLOAD)];
            if let Err(e) = self.messenger.edit_message_actions(origin, marker).await {
                error!(
                    error = %e,
                    chat_id = origin.chat_id,
                    message_id = origin.message_id,
                    "Failed to mark notification as repeated"
                );
            }
        }
    }
}

#[async_trait]
impl Handler for RepeatHandler {
    #[instrument(skip(self, event), fields(update_id = event.update_id))]
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        let EventKind::Callback(action) = &event.kind else {
            return Ok(HandlerResponse::Ignore);
        };

        match ActionPayload::parse(&action.data) {
            Ok(ActionPayload::Repeat(repeat)) => self.rearm(action, repeat).await,
            Ok(ActionPayload::Unknown) => self.answer(action, "").await,
            Err(e) => {
                warn!(error = %e, "Rejected callback payload");
                self.answer(action, replies::ERROR_OCCURRED).await;
            }
        }
        Ok(HandlerResponse::Stop)
    }
}
