use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::application::{CompletionClient, GenerationClient};
use crate::domain::{ChatMessage, DomainError};

/// A request as received by [`MockVendorClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Completion {
        model: String,
        messages: Vec<ChatMessage>,
    },
    Generation {
        model: String,
        prompt: String,
    },
}

/// Offline vendor that answers both wire shapes with canned bodies and
/// records every request it receives.
pub struct MockVendorClient {
    completion_response: Value,
    generation_response: Value,
    failure: Option<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockVendorClient {
    pub const DEFAULT_REPLY: &'static str = "This is a mock reply.";

    pub fn new() -> Self {
        Self {
            completion_response: json!({
                "choices": [{"message": {"role": "assistant", "content": Self::DEFAULT_REPLY}}],
                "usage": {"prompt_tokens": 0, "completion_tokens": 0, "total_tokens": 0}
            }),
            generation_response: json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": Self::DEFAULT_REPLY}]}}],
                "usageMetadata": {"promptTokenCount": 0, "candidatesTokenCount": 0, "totalTokenCount": 0}
            }),
            failure: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_completion_response(mut self, body: Value) -> Self {
        self.completion_response = body;
        self
    }

    pub fn with_generation_response(mut self, body: Value) -> Self {
        self.generation_response = body;
        self
    }

    /// Every call fails with a vendor error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    async fn respond(&self, request: RecordedRequest, body: &Value) -> Result<Value, DomainError> {
        debug!("MockVendorClient: {:?}", request);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => Err(DomainError::vendor(format!("mock: {message}"))),
            None => Ok(body.clone()),
        }
    }
}

impl Default for MockVendorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockVendorClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, DomainError> {
        let request = RecordedRequest::Completion {
            model: model.to_string(),
            messages: messages.to_vec(),
        };
        self.respond(request, &self.completion_response).await
    }

    fn vendor(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl GenerationClient for MockVendorClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Value, DomainError> {
        let request = RecordedRequest::Generation {
            model: model.to_string(),
            prompt: prompt.to_string(),
        };
        self.respond(request, &self.generation_response).await
    }

    fn vendor(&self) -> &str {
        "mock"
    }
}
