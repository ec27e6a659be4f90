//! Adapters from Telegram (teloxide) types to tracer_core types.
//! Depends only on teloxide and tracer_core type definitions.

use teloxide::types::{CallbackQuery, UpdateKind};
use tracer_core::{
    CallbackAction, Chat, Event, EventKind, IncomingMessage, MessageRef, ToCoreEvent,
};

/// Maps a teloxide chat to a core [`Chat`].
pub fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_private() {
        "private"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "unknown"
    };
    Chat {
        id: chat.id.0,
        chat_type: chat_type.to_string(),
    }
}

/// Wraps a teloxide Message for conversion to core [`IncomingMessage`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    pub fn to_core(&self) -> IncomingMessage {
        IncomingMessage {
            message_id: self.0.id.0,
            user_id: self.0.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0),
            chat: core_chat(&self.0.chat),
            text: self.0.text().unwrap_or("").to_string(),
        }
    }
}

/// Wraps a teloxide CallbackQuery for conversion to core [`CallbackAction`].
pub struct TelegramCallbackWrapper<'a>(pub &'a CallbackQuery);

impl<'a> TelegramCallbackWrapper<'a> {
    pub fn to_core(&self) -> CallbackAction {
        let origin = self.0.message.as_ref().map(|m| MessageRef {
            chat_id: m.chat().id.0,
            message_id: m.id().0,
        });
        CallbackAction {
            id: self.0.id.0.clone(),
            user_id: self.0.from.id.0 as i64,
            data: self.0.data.clone().unwrap_or_default(),
            origin,
            chat: self.0.message.as_ref().map(|m| core_chat(m.chat())),
        }
    }
}

/// Wraps a teloxide Update for conversion to a core [`Event`].
pub struct TelegramUpdateWrapper<'a>(pub &'a teloxide::types::Update);

impl<'a> ToCoreEvent for TelegramUpdateWrapper<'a> {
    fn to_core(&self) -> Event {
        let kind = match &self.0.kind {
            UpdateKind::Message(message) => {
                EventKind::Message(TelegramMessageWrapper(message).to_core())
            }
            UpdateKind::CallbackQuery(query) => {
                EventKind::Callback(TelegramCallbackWrapper(query).to_core())
            }
            _ => EventKind::Other,
        };
        Event {
            update_id: self.0.id.0 as i32,
            kind,
        }
    }
}
