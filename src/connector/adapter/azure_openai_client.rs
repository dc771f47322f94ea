use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::application::CompletionClient;
use crate::connector::adapter::vendor_http::{build_http_client, send_json};
use crate::domain::{ChatMessage, DomainError};

pub const AZURE_DEFAULT_API_VERSION: &str = "2024-06-01";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Chat-completions client for Azure OpenAI deployments.
///
/// The model name passed to [`CompletionClient::complete`] is the deployment
/// name; Azure routes on the URL path rather than a `model` body field:
///
/// ```text
/// POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}
/// api-key: <key>
/// ```
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: build_http_client(timeout),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: api_version.into(),
        }
    }

    fn url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, deployment
        )
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, DomainError> {
        let url = self.url(model);
        debug!("AzureOpenAiClient: POST {url} ({} messages)", messages.len());

        let request = self
            .client
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&ApiRequest { messages });

        send_json(self.vendor(), request).await
    }

    fn vendor(&self) -> &str {
        "azure_openai"
    }
}
