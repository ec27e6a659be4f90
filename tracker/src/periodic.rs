use std::future::Future;
use std::time::Duration;

use tracer_core::Result;
use tracing::{debug, error, info, warn};

/// Runs a job forever: wait one period, run the job, repeat. Each run is its own task so a
/// failing or panicking run is logged and the next period starts regardless.
#[derive(Debug, Clone)]
pub struct PeriodicRunner {
    name: &'static str,
    period: Duration,
}

impl PeriodicRunner {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self { name, period }
    }

    /// Never returns.
    pub async fn run<F, Fut, T>(self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        info!(
            task = self.name,
            period_secs = self.period.as_secs_f64(),
            "periodic task started"
        );
        loop {
            tokio::time::sleep(self.period).await;
            match tokio::spawn(job()).await {
                Ok(Ok(_)) => debug!(task = self.name, "step: cycle finished"),
                Ok(Err(e)) if e.is_transient() => {
                    warn!(task = self.name, error = %e, "cycle skipped")
                }
                Ok(Err(e)) => error!(task = self.name, error = %e, "cycle failed"),
                Err(e) => error!(task = self.name, error = %e, "cycle panicked"),
            }
        }
    }
}
