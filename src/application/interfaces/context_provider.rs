use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{Context, DomainError};

/// Turns caller-supplied document paths into grounding context.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Extract and combine the text of `paths`, truncated to the provider's
    /// budget. Returns `None` when there is nothing to ground on.
    async fn get_context(&self, paths: &[PathBuf]) -> Result<Option<Context>, DomainError>;
}
