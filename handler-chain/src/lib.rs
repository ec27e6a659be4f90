//! # Handler chain
//!
//! Runs a sequence of handlers for each inbound event. Every handler's `before` runs first and
//! any of them can drop the event; then `handle` runs in order until one returns Stop; finally
//! `after` runs in reverse order with the final response.

use std::sync::Arc;
use tracer_core::{Event, Handler, HandlerResponse, Result};
use tracing::{debug, info, instrument};

/// Ordered list of handlers shared by every dispatched event.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop ends the handle phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before for all handlers, then handle until Stop, then after in reverse.
    /// Returns Stop when a before dropped the event or a handler consumed it, else Continue.
    #[instrument(skip(self, event), fields(update_id = event.update_id, kind = event.kind_name()))]
    pub async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        let mut final_response = HandlerResponse::Continue;

        debug!(user_id = ?event.user_id(), "step: handler_chain started");

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let should_continue = handler.before(event).await?;
            if !should_continue {
                debug!(
                    handler = %handler_name,
                    "step: handler before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(event).await?;
            debug!(
                handler = %handler_name,
                response = ?response,
                "step: handler done"
            );

            match response {
                HandlerResponse::Stop => {
                    info!(handler = %handler_name, "step: event handled");
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(event, &final_response).await?;
        }

        debug!(user_id = ?event.user_id(), "step: handler_chain finished");

        Ok(final_response)
    }
}
