//! Gateway abstractions for the two external services.
//!
//! [`PresenceGateway`] answers "who is online" for a batch of identities; [`MessagingGateway`]
//! talks to the operator. Both are stateless and transport-agnostic: production code plugs in
//! the VK and teloxide implementations, tests plug in recording mocks.

use crate::error::Result;
use crate::types::{ActionButton, Event, MessageRef, Presence, SendOptions};
use async_trait::async_trait;

/// Batch presence lookup.
#[async_trait]
pub trait PresenceGateway: Send + Sync {
    /// Looks up every key (numeric id or alias) in one call. Keys that resolve to nothing are
    /// simply missing from the result; a failure fails the whole batch.
    async fn batch_query(&self, keys: &[String]) -> Result<Vec<Presence>>;
}

/// Operator-facing messaging channel.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends a text message and returns its handle.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: SendOptions,
    ) -> Result<MessageRef>;

    /// Answers a pending button tap. An empty `text` just dismisses the client spinner.
    async fn answer_action(&self, action_id: &str, text: &str, alert: bool) -> Result<()>;

    /// Replaces the inline buttons of a previously sent message.
    async fn edit_message_actions(
        &self,
        message: MessageRef,
        action_row: Vec<ActionButton>,
    ) -> Result<()>;

    /// Long-polls for inbound events starting at `offset` (None = from now), waiting up to
    /// `timeout_secs` on the server side when nothing is pending.
    async fn fetch_events(&self, offset: Option<i32>, timeout_secs: u32) -> Result<Vec<Event>>;
}
