use crate::application::VendorTarget;
use crate::domain::DomainError;

/// Maps user-facing model identifiers to configured vendor targets.
pub trait ModelRegistry: Send + Sync {
    /// Fails with [`DomainError::UnknownModel`] when `model_id` is not configured.
    fn resolve(&self, model_id: &str) -> Result<VendorTarget, DomainError>;

    /// Configured model ids, highest priority first.
    fn available_models(&self) -> Vec<String>;

    fn default_model(&self) -> Option<String> {
        self.available_models().into_iter().next()
    }
}
