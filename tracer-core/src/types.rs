//! Core types: tracked targets, presence records, inbound events, outbound message options,
//! and the Handler trait run by the handler chain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of one identity as reported by the presence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub id: i64,
    /// Short alias (screen name) of the identity.
    pub domain: String,
    pub first_name: String,
    pub last_name: String,
    pub online: bool,
    /// Unix timestamp of the last visit; 0 when the service hides it.
    pub last_seen: i64,
}

impl Presence {
    /// Last visit as a UTC time, when the service reports one.
    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        if self.last_seen <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.last_seen, 0)
    }

    /// True if the operator's argument names this identity: the numeric id, `id<number>`,
    /// or the alias (ASCII case-insensitive).
    pub fn matches_argument(&self, arg: &str) -> bool {
        names_identity(self.id, &self.domain, arg)
    }

    /// True if `arg` names this identity by alias rather than by numeric id.
    pub fn is_alias_argument(&self, arg: &str) -> bool {
        !self.domain.is_empty()
            && arg.eq_ignore_ascii_case(&self.domain)
            && arg != self.id.to_string()
    }
}

/// Operator argument matching shared by `/add` and `/remove`: the numeric id, `id<number>`,
/// or the alias (ASCII case-insensitive). An empty argument names nothing.
fn names_identity(id: i64, domain: &str, arg: &str) -> bool {
    if arg.is_empty() {
        return false;
    }
    arg == id.to_string()
        || arg.strip_prefix("id") == Some(id.to_string().as_str())
        || arg.eq_ignore_ascii_case(domain)
}

/// One watched identity. Never edited in place: a transition removes it, a re-arm adds a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTarget {
    pub id: i64,
    pub domain: String,
    /// The operator referred to this identity by alias; controls how it is echoed back.
    pub domain_is_primary: bool,
    pub first_name: String,
    pub last_name: String,
    /// Last-seen snapshot taken when the target was added or re-armed.
    pub last_seen: i64,
}

impl TrackedTarget {
    /// Captures a target from a live presence record.
    pub fn from_presence(presence: &Presence, domain_is_primary: bool) -> Self {
        Self {
            id: presence.id,
            domain: presence.domain.clone(),
            domain_is_primary,
            first_name: presence.first_name.clone(),
            last_name: presence.last_name.clone(),
            last_seen: presence.last_seen,
        }
    }

    /// Alias when the operator used it, numeric id otherwise.
    pub fn label(&self) -> String {
        if self.domain_is_primary {
            self.domain.clone()
        } else {
            self.id.to_string()
        }
    }

    /// True if the operator's argument names this target, by the same rule `/add` uses.
    pub fn matches(&self, arg: &str) -> bool {
        names_identity(self.id, &self.domain, arg)
    }
}

/// Chat an inbound event came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// "private", "group", "supergroup" or "channel".
    pub chat_type: String,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.chat_type == "private"
    }
}

/// Handle of a message the bot sent; used to edit its buttons later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Text message from a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i32,
    /// Sender id; 0 when the message has no sender (channel posts).
    pub user_id: i64,
    pub chat: Chat,
    pub text: String,
}

/// A tap on an inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackAction {
    /// Opaque id used to answer the callback.
    pub id: String,
    pub user_id: i64,
    /// Button payload; empty when absent.
    pub data: String,
    /// Message carrying the tapped button, when still accessible.
    pub origin: Option<MessageRef>,
    /// Chat of the origin message, when known.
    pub chat: Option<Chat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Message(IncomingMessage),
    Callback(CallbackAction),
    /// Any update kind the tracer does not handle.
    Other,
}

/// One inbound update. `update_id` increases monotonically across the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub update_id: i32,
    pub kind: EventKind,
}

impl Event {
    /// Sender of the event, if it has one.
    pub fn user_id(&self) -> Option<i64> {
        match &self.kind {
            EventKind::Message(m) if m.user_id != 0 => Some(m.user_id),
            EventKind::Callback(c) => Some(c.user_id),
            _ => None,
        }
    }

    /// Chat of the event, if known.
    pub fn chat(&self) -> Option<&Chat> {
        match &self.kind {
            EventKind::Message(m) => Some(&m.chat),
            EventKind::Callback(c) => c.chat.as_ref(),
            EventKind::Other => None,
        }
    }

    /// Short name of the event kind for logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            EventKind::Message(_) => "message",
            EventKind::Callback(_) => "callback",
            EventKind::Other => "other",
        }
    }
}

/// Inline button: label plus opaque callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    pub payload: String,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Optional parts of an outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    /// One row of inline buttons under the message.
    pub action_row: Vec<ActionButton>,
    /// Persistent reply-keyboard labels, one per row.
    pub menu: Vec<String>,
    pub disable_notification: bool,
    pub reply_to: Option<i32>,
}

impl SendOptions {
    pub fn with_action(button: ActionButton) -> Self {
        Self {
            action_row: vec![button],
            ..Default::default()
        }
    }

    pub fn with_menu<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            menu: labels.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; the event was handled or dropped.
    Stop,
    /// Not for this handler, try next.
    Ignore,
}

/// Converts a transport-specific update to a core [`Event`].
pub trait ToCoreEvent: Send + Sync {
    fn to_core(&self) -> Event;
}

/// Single handler concept: optional before / handle / after. The chain runs all before →
/// handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _event: &Event) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the event. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _event: &Event) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _event: &Event,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
