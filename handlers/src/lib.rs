//! # Handlers for vk-tracer
//!
//! Chain handlers for inbound operator events: logging, the operator filter, `/command`
//! messages and `repeat:` button callbacks.

mod commands;
mod fan_out;
mod logging_auth;
pub mod replies;
mod repeat;

#[cfg(test)]
mod test;

pub use commands::{Command, CommandHandler};
pub use logging_auth::{AuthHandler, LoggingHandler};
pub use repeat::RepeatHandler;
