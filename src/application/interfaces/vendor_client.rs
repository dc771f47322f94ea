use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ChatMessage, DomainError, VendorFamily};

/// Sends an ordered list of role-tagged messages to a chat-completion API.
///
/// Implementors own transport, authentication and serialization. The raw JSON
/// body is returned untouched so reply text and usage can be read with the
/// vendor's own field layout.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Value, DomainError>;

    /// Short vendor name for logging.
    fn vendor(&self) -> &str;
}

/// Sends a single concatenated prompt string to a generate-content API.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<Value, DomainError>;

    fn vendor(&self) -> &str;
}

/// Live handle to a vendor client, tagged by the wire shape it speaks.
#[derive(Clone)]
pub enum VendorClient {
    Completion(Arc<dyn CompletionClient>),
    Generation(Arc<dyn GenerationClient>),
}

impl VendorClient {
    pub fn family(&self) -> VendorFamily {
        match self {
            VendorClient::Completion(_) => VendorFamily::Completion,
            VendorClient::Generation(_) => VendorFamily::Generation,
        }
    }

    pub fn vendor(&self) -> &str {
        match self {
            VendorClient::Completion(c) => c.vendor(),
            VendorClient::Generation(c) => c.vendor(),
        }
    }
}

impl fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VendorClient::{}({})", self.family(), self.vendor())
    }
}

/// Which backend and model a dispatch call goes to.
///
/// Built by a [`super::ModelRegistry`]. Cloning is cheap; every dispatch call
/// works on its own snapshot, so replacing the caller's selected target never
/// affects a call already in flight.
#[derive(Debug, Clone)]
pub struct VendorTarget {
    family: VendorFamily,
    model_name: String,
    client: VendorClient,
}

impl VendorTarget {
    pub fn new(family: VendorFamily, model_name: impl Into<String>, client: VendorClient) -> Self {
        Self {
            family,
            model_name: model_name.into(),
            client,
        }
    }

    pub fn completion(model_name: impl Into<String>, client: Arc<dyn CompletionClient>) -> Self {
        Self::new(
            VendorFamily::Completion,
            model_name,
            VendorClient::Completion(client),
        )
    }

    pub fn generation(model_name: impl Into<String>, client: Arc<dyn GenerationClient>) -> Self {
        Self::new(
            VendorFamily::Generation,
            model_name,
            VendorClient::Generation(client),
        )
    }

    pub fn family(&self) -> VendorFamily {
        self.family
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn client(&self) -> &VendorClient {
        &self.client
    }
}
