//! Update ingestion and dispatch.
//!
//! [`UpdateIngestion`] long-polls the messaging gateway with a resumable offset and pushes every
//! event, in order, into an unbounded channel. [`run_dispatch`] drains that channel and hands
//! each event to the handler chain in its own task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use handler_chain::HandlerChain;
use tokio::sync::mpsc;
use tracer_core::{Event, MessagingGateway, Result, TracerError};
use tracing::{error, info, instrument, warn};

/// Server-side wait for one long poll.
pub const LONG_POLL_TIMEOUT_SECS: u32 = 30;
/// Pause before retrying after a failed fetch.
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Resumable long-poll loop over [`MessagingGateway::fetch_events`].
///
/// The offset starts unset ("from now"). After a non-empty batch has been fully pushed it
/// becomes `last update id + 1`, so each event reaches the channel exactly once; a failed
/// fetch leaves it untouched.
pub struct UpdateIngestion {
    gateway: Arc<dyn MessagingGateway>,
    offset: Option<i32>,
    timeout_secs: u32,
    retry_delay: Duration,
}

impl UpdateIngestion {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            gateway,
            offset: None,
            timeout_secs: LONG_POLL_TIMEOUT_SECS,
            retry_delay: FETCH_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Next offset sent to the gateway; None until the first event arrives.
    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    /// One fetch. Pushes every returned event into `tx` in order, then advances the offset.
    /// Returns how many events were pushed. Fails on a fetch error (offset unchanged) or with
    /// [`TracerError::StreamClosed`] when the receiving side is gone.
    pub async fn poll_once(&mut self, tx: &mpsc::UnboundedSender<Event>) -> Result<usize> {
        let events = self
            .gateway
            .fetch_events(self.offset, self.timeout_secs)
            .await?;

        let Some(last_id) = events.last().map(|e| e.update_id) else {
            return Ok(0);
        };

        let count = events.len();
        for event in events {
            tx.send(event).map_err(|_| TracerError::StreamClosed)?;
        }
        self.offset = Some(last_id + 1);
        Ok(count)
    }

    /// Polls forever. Fetch failures are logged and retried after the fixed delay with the
    /// same offset. Returns only when the receiving side of `tx` is dropped.
    #[instrument(skip(self, tx))]
    pub async fn run(mut self, tx: mpsc::UnboundedSender<Event>) {
        info!(timeout_secs = self.timeout_secs, "update ingestion started");
        loop {
            let started = Instant::now();
            match self.poll_once(&tx).await {
                Ok(0) => {}
                Ok(count) => {
                    info!(count, next_offset = ?self.offset, "step: events received");
                }
                Err(TracerError::StreamClosed) => {
                    warn!(offset = ?self.offset, "event stream closed, update ingestion stopped");
                    return;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        offset = ?self.offset,
                        retry_delay_secs = self.retry_delay.as_secs(),
                        "fetching updates failed"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}

/// Drains the event stream, handing each event to `chain` in a separate task. Delivery order is
/// the stream order; handlers may finish in any order. Returns when the stream closes.
#[instrument(skip(chain, rx))]
pub async fn run_dispatch(chain: HandlerChain, mut rx: mpsc::UnboundedReceiver<Event>) {
    while let Some(event) = rx.recv().await {
        let chain = chain.clone();
        tokio::spawn(async move {
            if let Err(e) = chain.handle(&event).await {
                error!(
                    error = %e,
                    update_id = event.update_id,
                    user_id = ?event.user_id(),
                    "Handler chain failed"
                );
            }
        });
    }
    warn!("event stream closed, dispatch stopped");
}
