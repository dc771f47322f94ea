use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ModelRegistry, VendorTarget};
use crate::connector::adapter::{AzureOpenAiClient, GeminiClient, MockVendorClient, OpenAiClient};
use crate::connector::config::{AppConfig, ModelEntry, VendorKind};
use crate::domain::DomainError;

/// Model registry over a fixed, priority-ordered list of vendor targets.
///
/// Clients are built once and shared by every target that resolves to them.
pub struct ConfiguredModelRegistry {
    targets: Vec<(String, VendorTarget)>,
    default_model: Option<String>,
}

impl ConfiguredModelRegistry {
    pub fn new(targets: Vec<(String, VendorTarget)>) -> Self {
        Self {
            targets,
            default_model: None,
        }
    }

    /// Build targets for every model with credentials.
    ///
    /// An available Azure model without an endpoint is a configuration error.
    /// A `DOCCHAT_DEFAULT_MODEL` naming an unavailable model is ignored.
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let targets = config
            .available_models()
            .map(|entry| {
                debug!(
                    "Configuring model {} ({} via {}, {})",
                    entry.id,
                    entry.model,
                    entry.vendor.as_str(),
                    entry.family()
                );
                Ok((entry.id.clone(), build_target(entry, config)?))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let default_model = match &config.default_model {
            Some(id) if targets.iter().any(|(t, _)| t == id) => Some(id.clone()),
            Some(id) => {
                warn!("Default model '{id}' has no credentials configured, ignoring");
                None
            }
            None => None,
        };

        debug!(
            "Model registry: {:?} (default: {:?})",
            targets.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            default_model
        );

        Ok(Self {
            targets,
            default_model,
        })
    }

    /// Offline registry: `mock-completion` and `mock-generation`, both
    /// answered by one shared [`MockVendorClient`].
    pub fn mock() -> Self {
        let client = Arc::new(MockVendorClient::new());
        Self::new(vec![
            (
                "mock-completion".to_string(),
                VendorTarget::completion("mock-chat-model", client.clone()),
            ),
            (
                "mock-generation".to_string(),
                VendorTarget::generation("mock-generate-model", client),
            ),
        ])
    }

    pub fn with_default(mut self, model_id: impl Into<String>) -> Self {
        self.default_model = Some(model_id.into());
        self
    }
}

fn build_target(entry: &ModelEntry, config: &AppConfig) -> Result<VendorTarget, DomainError> {
    let api_key = entry.api_key.clone().unwrap_or_default();
    let timeout = config.request_timeout;

    let target = match entry.vendor {
        VendorKind::Gemini => VendorTarget::generation(
            &entry.model,
            Arc::new(GeminiClient::new(api_key, &config.gemini_base_url, timeout)),
        ),
        VendorKind::AzureOpenAi => {
            let endpoint = entry.endpoint.as_deref().ok_or_else(|| {
                DomainError::config(format!(
                    "model '{}' has an API key but no endpoint configured",
                    entry.id
                ))
            })?;
            VendorTarget::completion(
                &entry.model,
                Arc::new(AzureOpenAiClient::new(
                    endpoint,
                    api_key,
                    entry.api_version.clone().unwrap_or_default(),
                    timeout,
                )),
            )
        }
        VendorKind::OpenAi => VendorTarget::completion(
            &entry.model,
            Arc::new(OpenAiClient::new(
                api_key,
                &config.openai_base_url,
                config.openai_temperature,
                timeout,
            )),
        ),
    };

    Ok(target)
}

impl ModelRegistry for ConfiguredModelRegistry {
    fn resolve(&self, model_id: &str) -> Result<VendorTarget, DomainError> {
        self.targets
            .iter()
            .find(|(id, _)| id == model_id)
            .map(|(_, target)| target.clone())
            .ok_or_else(|| DomainError::unknown_model(model_id))
    }

    fn available_models(&self) -> Vec<String> {
        self.targets.iter().map(|(id, _)| id.clone()).collect()
    }

    fn default_model(&self) -> Option<String> {
        self.default_model
            .clone()
            .or_else(|| self.targets.first().map(|(id, _)| id.clone()))
    }
}
