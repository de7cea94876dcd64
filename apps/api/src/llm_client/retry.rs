//! Opt-in retry decorator for any [`GenerationBackend`].
//!
//! The generation contract is one attempt per request. Wrapping the backend
//! in `RetryingBackend` adds exponential backoff on transient failures
//! without touching that contract; with `max_retries = 0` it is a pass-through.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{GenerationBackend, LlmError};

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

pub struct RetryingBackend {
    inner: Arc<dyn GenerationBackend>,
    max_retries: u32,
    base_delay: Duration,
}

impl RetryingBackend {
    pub fn new(inner: Arc<dyn GenerationBackend>, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        // 1x, 2x, 4x ... of the base delay
        self.base_delay * (1u32 << (attempt - 1).min(16))
    }
}

#[async_trait]
impl GenerationBackend for RetryingBackend {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Option<String>, LlmError> {
        let mut attempt = 0;
        loop {
            match self.inner.generate(prompt, schema).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    warn!(
                        "Generation attempt {} failed ({e}), retrying after {}ms...",
                        attempt,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}
