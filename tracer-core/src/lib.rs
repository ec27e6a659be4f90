//! # tracer-core
//!
//! Core types and traits for the tracer: [`WatchList`], [`PresenceGateway`],
//! [`MessagingGateway`], [`Handler`], inbound events, button payloads, errors, and tracing
//! initialization. Transport-agnostic; used by every other crate in the workspace.

pub mod action;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod types;
pub mod watch_list;

pub use action::{ActionPayload, RepeatAction, PLUG_PAYLOAD};
pub use error::{HandlerError, Result, TracerError};
pub use gateway::{MessagingGateway, PresenceGateway};
pub use logger::init_tracing;
pub use types::{
    ActionButton, CallbackAction, Chat, Event, EventKind, Handler, HandlerResponse,
    IncomingMessage, MessageRef, Presence, SendOptions, ToCoreEvent, TrackedTarget,
};
pub use watch_list::WatchList;
