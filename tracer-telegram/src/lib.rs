//! # tracer-telegram
//!
//! Telegram layer: adapters from teloxide types, the [`tracer_core::MessagingGateway`]
//! implementation, the resumable update ingestion loop, and event dispatch into the handler
//! chain. No command logic lives here.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{
    core_chat, TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUpdateWrapper,
};
pub use bot_adapter::{
    build_telegram_http_client, map_request_error, TelegramGateway, TELEGRAM_HTTP_TIMEOUT,
};
pub use runner::{run_dispatch, UpdateIngestion, FETCH_RETRY_DELAY, LONG_POLL_TIMEOUT_SECS};
