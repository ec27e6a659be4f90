//! Wraps teloxide::Bot and implements [`MessagingGateway`]. Production code talks to Telegram;
//! tests substitute another gateway impl.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup, MessageId, ReplyMarkup, ReplyParameters,
};
use teloxide::RequestError;
use tracer_core::{
    ActionButton, Event, MessageRef, MessagingGateway, Result, SendOptions, ToCoreEvent,
    TracerError,
};
use tracing::{debug, warn};

use crate::adapters::TelegramUpdateWrapper;

/// HTTP timeout for Bot API calls. Must exceed the long-poll wait or idle polls time out.
pub const TELEGRAM_HTTP_TIMEOUT: Duration = Duration::from_secs(45);

/// Builds the reqwest client used by teloxide, with a timeout longer than the long poll.
pub fn build_telegram_http_client() -> reqwest::Client {
    let builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(TELEGRAM_HTTP_TIMEOUT)
        .tcp_nodelay(true);

    match builder.build() {
        Ok(client) => client,
        Err(error) => {
            warn!(
                %error,
                "failed to create telegram reqwest client with custom timeout, falling back to default client"
            );
            reqwest::Client::new()
        }
    }
}

/// Maps teloxide errors onto the tracer's transport/protocol split.
pub fn map_request_error(error: RequestError) -> TracerError {
    match error {
        RequestError::Network(e) => TracerError::Transport(e.to_string()),
        RequestError::Io(e) => TracerError::Transport(e.to_string()),
        other => TracerError::Protocol(other.to_string()),
    }
}

fn inline_row(buttons: Vec<ActionButton>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![buttons
        .into_iter()
        .map(|b| InlineKeyboardButton::callback(b.label, b.payload))
        .collect::<Vec<_>>()])
}

fn menu_keyboard(labels: Vec<String>) -> KeyboardMarkup {
    KeyboardMarkup::new(
        labels
            .into_iter()
            .map(|label| vec![KeyboardButton::new(label)])
            .collect::<Vec<_>>(),
    )
    .resize_keyboard()
}

/// Thin wrapper around teloxide::Bot that implements [`MessagingGateway`].
#[derive(Clone)]
pub struct TelegramGateway {
    bot: teloxide::Bot,
}

impl TelegramGateway {
    /// Creates a gateway from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Creates a gateway for `token` with the long-poll-safe HTTP client and an optional
    /// Bot API base URL.
    pub fn from_token(token: String, api_url: Option<&str>) -> anyhow::Result<Self> {
        let mut bot = teloxide::Bot::with_client(token, build_telegram_http_client());
        if let Some(url) = api_url {
            bot = bot.set_api_url(reqwest::Url::parse(url)?);
        }
        Ok(Self { bot })
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: SendOptions,
    ) -> Result<MessageRef> {
        let mut request = self.bot.send_message(ChatId(chat_id), text.to_string());
        if !options.action_row.is_empty() {
            request = request.reply_markup(ReplyMarkup::InlineKeyboard(inline_row(
                options.action_row,
            )));
        } else if !options.menu.is_empty() {
            request = request.reply_markup(ReplyMarkup::Keyboard(menu_keyboard(options.menu)));
        }
        if options.disable_notification {
            request = request.disable_notification(true);
        }
        if let Some(reply_to) = options.reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(reply_to)));
        }

        let sent = request.await.map_err(map_request_error)?;
        Ok(MessageRef {
            chat_id: sent.chat.id.0,
            message_id: sent.id.0,
        })
    }

    async fn answer_action(&self, action_id: &str, text: &str, alert: bool) -> Result<()> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(action_id.to_string()));
        if !text.is_empty() {
            request = request.text(text.to_string());
        }
        if alert {
            request = request.show_alert(true);
        }
        request.await.map_err(map_request_error)?;
        Ok(())
    }

    async fn edit_message_actions(
        &self,
        message: MessageRef,
        action_row: Vec<ActionButton>,
    ) -> Result<()> {
        self.bot
            .edit_message_reply_markup(ChatId(message.chat_id), MessageId(message.message_id))
            .reply_markup(inline_row(action_row))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn fetch_events(&self, offset: Option<i32>, timeout_secs: u32) -> Result<Vec<Event>> {
        let mut request = self.bot.get_updates().timeout(timeout_secs);
        if let Some(offset) = offset {
            request = request.offset(offset);
        }
        let updates = request.await.map_err(map_request_error)?;
        debug!(count = updates.len(), offset = ?offset, "getUpdates returned");
        Ok(updates
            .iter()
            .map(|update| TelegramUpdateWrapper(update).to_core())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_from_token_with_api_url() {
        let gateway =
            TelegramGateway::from_token("123:abc".to_string(), Some("http://localhost:8081"))
                .unwrap();
        assert_eq!(gateway.inner().api_url().as_str(), "http://localhost:8081/");
    }

    #[test]
    fn test_gateway_from_token_rejects_bad_api_url() {
        assert!(TelegramGateway::from_token("123:abc".to_string(), Some("not a url")).is_err());
    }

    #[test]
    fn test_inline_row_keeps_button_order() {
        let markup = inline_row(vec![
            ActionButton::new("🔄 Repeat", "repeat:1:true"),
            ActionButton::new("x", "plug"),
        ]);
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "🔄 Repeat");
    }

    #[test]
    fn test_menu_keyboard_one_label_per_row() {
        let keyboard = menu_keyboard(vec!["📝 List".to_string(), "♻️ Clear List".to_string()]);
        assert_eq!(keyboard.keyboard.len(), 2);
        assert_eq!(keyboard.keyboard[1][0].text, "♻️ Clear List");
    }
}
