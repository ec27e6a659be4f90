//! # tracer-bot
//!
//! Process wiring for vk-tracer: CLI parsing, configuration, and the runner that starts the
//! tracking, ingestion and dispatch loops.

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands};
pub use config::AppConfig;
pub use runner::{build_handler_chain, run_tracer};
