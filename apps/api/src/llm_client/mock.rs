//! Mock generation backend for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{GenerationBackend, LlmError};

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this raw text payload.
    Text(String),
    /// Answer without a text payload.
    Empty,
    /// Fail with an API error carrying this status.
    Status(u16),
    /// Fail with a non-transient backend refusal.
    Blocked,
}

impl MockResponse {
    pub fn json(value: Value) -> Self {
        MockResponse::Text(value.to_string())
    }

    fn into_result(self) -> Result<Option<String>, LlmError> {
        match self {
            MockResponse::Text(t) => Ok(Some(t)),
            MockResponse::Empty => Ok(None),
            MockResponse::Status(status) => Err(LlmError::Api {
                status,
                message: format!("mock status {status}"),
            }),
            MockResponse::Blocked => Err(LlmError::Blocked {
                reason: "SAFETY".to_string(),
            }),
        }
    }
}

/// A hand-rolled mock implementing [`GenerationBackend`].
///
/// Returns queued responses in order, repeating the last one, and records
/// every prompt it receives.
pub struct MockBackend {
    responses: Mutex<Vec<MockResponse>>,
    fallback: Mutex<MockResponse>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockBackend {
    pub fn new(response: MockResponse) -> Self {
        Self::with_sequence(vec![response])
    }

    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        responses.reverse();
        let fallback = responses.first().cloned().unwrap_or(MockResponse::Empty);
        Self {
            responses: Mutex::new(responses),
            fallback: Mutex::new(fallback),
            delay: None,
            prompts: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str, _schema: &Value) -> Result<Option<String>, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().unwrap().pop();
        let response = match next {
            Some(r) => {
                *self.fallback.lock().unwrap() = r.clone();
                r
            }
            None => self.fallback.lock().unwrap().clone(),
        };
        response.into_result()
    }
}
