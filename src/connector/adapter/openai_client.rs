use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::application::CompletionClient;
use crate::connector::adapter::vendor_http::{build_http_client, send_json};
use crate::domain::{ChatMessage, DomainError};

pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const COMPLETIONS_PATH: &str = "/chat/completions";
pub const OPENAI_DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

/// Client for the OpenAI chat-completions API and compatible servers.
///
/// Sampling temperature is fixed at construction and sent unchanged with
/// every request.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        let base: String = base_url.into();
        Self {
            client: build_http_client(timeout),
            api_key: api_key.into(),
            url: format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH),
            temperature,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, DomainError> {
        debug!("OpenAiClient: POST {} model={model}", self.url);

        let request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&ApiRequest {
                model,
                messages,
                temperature: self.temperature,
            });

        send_json(self.vendor(), request).await
    }

    fn vendor(&self) -> &str {
        "openai"
    }
}
