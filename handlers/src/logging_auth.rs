//! Handlers for logging and the single-operator filter.

use async_trait::async_trait;
use tracer_core::{Event, EventKind, Handler, HandlerError, HandlerResponse, Result};
use tracing::{debug, info, instrument, warn};

/// Logs each event in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, event))]
    async fn before(&self, event: &Event) -> Result<bool> {
        match &event.kind {
            EventKind::Message(m) => info!(
                update_id = event.update_id,
                user_id = m.user_id,
                chat_id = m.chat.id,
                message_content = %m.text,
                "Received message"
            ),
            EventKind::Callback(c) => info!(
                update_id = event.update_id,
                user_id = c.user_id,
                payload = %c.data,
                "Received callback"
            ),
            EventKind::Other => debug!(update_id = event.update_id, "Received other update"),
        }
        Ok(true)
    }

    #[instrument(skip(self, event, response))]
    async fn after(&self, event: &Event, response: &HandlerResponse) -> Result<()> {
        debug!(
            update_id = event.update_id,
            response = ?response,
            "Processed event"
        );
        Ok(())
    }
}

/// Drops every event that is not from the operator in a private chat. Dropped events end
/// the chain quietly; nothing is sent back.
pub struct AuthHandler {
    operator_id: i64,
}

impl AuthHandler {
    /// Creates a filter that lets through only `operator_id`.
    pub fn new(operator_id: i64) -> Self {
        Self { operator_id }
    }

    fn is_allowed(&self, event: &Event) -> bool {
        if event.user_id() != Some(self.operator_id) {
            return false;
        }
        match &event.kind {
            EventKind::Message(m) => m.chat.is_private(),
            // Callbacks may have lost their origin message; the sender check is enough then.
            EventKind::Callback(c) => c.chat.as_ref().map_or(true, |chat| chat.is_private()),
            EventKind::Other => false,
        }
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, event))]
    async fn before(&self, event: &Event) -> Result<bool> {
        if self.is_allowed(event) {
            debug!(user_id = ?event.user_id(), "Operator authorized");
            Ok(true)
        } else {
            warn!(
                error = %HandlerError::Unauthorized,
                user_id = ?event.user_id(),
                chat_id = ?event.chat().map(|c| c.id),
                kind = event.kind_name(),
                "Ignoring event from outside the operator chat"
            );
            Ok(false)
        }
    }
}
