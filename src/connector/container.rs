use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::{AskUseCase, ContextProvider, ModelRegistry};
use crate::connector::{AppConfig, ConfiguredModelRegistry, FileContextProvider};
use crate::domain::DomainError;

pub struct ContainerConfig {
    /// `.env` file to load before reading the environment; `./.env` is tried
    /// when unset.
    pub env_file: Option<PathBuf>,
    /// Serve every request from the offline mock vendor.
    pub mock: bool,
}

/// Wires configuration, registry and context provider into use cases.
pub struct Container {
    registry: Arc<dyn ModelRegistry>,
    context_provider: Arc<dyn ContextProvider>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self, DomainError> {
        let app_config = AppConfig::load(config.env_file.as_deref())?;

        let registry: Arc<dyn ModelRegistry> = if config.mock {
            debug!("Using mock vendor registry");
            Arc::new(ConfiguredModelRegistry::mock())
        } else {
            Arc::new(ConfiguredModelRegistry::from_config(&app_config)?)
        };

        let context_provider: Arc<dyn ContextProvider> = Arc::new(FileContextProvider::new(
            app_config.context_token_budget,
            app_config.chars_per_token,
        ));

        Ok(Self::from_parts(registry, context_provider))
    }

    pub fn from_parts(
        registry: Arc<dyn ModelRegistry>,
        context_provider: Arc<dyn ContextProvider>,
    ) -> Self {
        Self {
            registry,
            context_provider,
        }
    }

    pub fn ask_use_case(&self) -> AskUseCase {
        AskUseCase::new(self.registry.clone(), self.context_provider.clone())
    }

    pub fn registry(&self) -> Arc<dyn ModelRegistry> {
        self.registry.clone()
    }
}
