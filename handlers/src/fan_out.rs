use std::sync::Arc;

use tokio::task::JoinSet;
use tracer_core::{MessagingGateway, SendOptions};
use tracing::{error, warn};

/// Sends several replies to one chat concurrently; [`ReplyFanOut::join`] waits for all of them.
pub struct ReplyFanOut {
    messenger: Arc<dyn MessagingGateway>,
    chat_id: i64,
    tasks: JoinSet<bool>,
}

impl ReplyFanOut {
    pub fn new(messenger: Arc<dyn MessagingGateway>, chat_id: i64) -> Self {
        Self {
            messenger,
            chat_id,
            tasks: JoinSet::new(),
        }
    }

    /// Starts sending `text` right away.
    pub fn push(&mut self, text: String) {
        let messenger = self.messenger.clone();
        let chat_id = self.chat_id;
        self.tasks.spawn(async move {
            match messenger
                .send_message(chat_id, &text, SendOptions::default())
                .await
            {
                Ok(_) => true,
                Err(e) => {
                    error!(error = %e, chat_id, reply = %text, "Failed to send reply");
                    false
                }
            }
        });
    }

    /// Replies started so far.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every pending reply. Returns how many were delivered.
    pub async fn join(mut self) -> usize {
        let mut delivered = 0;
        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(true) => delivered += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Reply task panicked"),
            }
        }
        delivered
    }
}
