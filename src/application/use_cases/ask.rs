use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::{ContextProvider, DispatchRequestUseCase, ModelRegistry};
use crate::domain::{ConversationTurn, DomainError, Response};

/// Everything a front-end collects for one chat turn.
#[derive(Debug, Clone, Default)]
pub struct AskRequest {
    pub message: String,
    pub history: Vec<ConversationTurn>,
    pub files: Vec<PathBuf>,
    /// Falls back to the registry's highest-priority model when unset.
    pub model_id: Option<String>,
}

impl AskRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}

/// Runs the full chat pipeline: document context, model resolution, dispatch.
pub struct AskUseCase {
    registry: Arc<dyn ModelRegistry>,
    context_provider: Arc<dyn ContextProvider>,
    dispatcher: DispatchRequestUseCase,
}

impl AskUseCase {
    pub fn new(registry: Arc<dyn ModelRegistry>, context_provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            registry,
            context_provider,
            dispatcher: DispatchRequestUseCase::new(),
        }
    }

    pub async fn execute(&self, request: &AskRequest) -> Result<Response, DomainError> {
        self.execute_with_cancel(request, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_cancel(
        &self,
        request: &AskRequest,
        cancel: &CancellationToken,
    ) -> Result<Response, DomainError> {
        let model_id = match &request.model_id {
            Some(id) => id.clone(),
            None => self
                .registry
                .default_model()
                .ok_or_else(|| DomainError::config("no model has credentials configured"))?,
        };
        let target = self.registry.resolve(&model_id)?;

        let context = self.context_provider.get_context(&request.files).await?;
        if let Some(ctx) = &context {
            info!(
                "Grounding on {} document(s), {} bytes of context",
                ctx.source_count(),
                ctx.text().len()
            );
        }

        self.dispatcher
            .dispatch_with_cancel(
                &request.message,
                &request.history,
                context.as_ref().map(|c| c.text()),
                &target,
                cancel,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::application::VendorTarget;
    use crate::connector::{MockVendorClient, RecordedRequest};
    use crate::domain::{ChatMessage, Context};

    struct StaticRegistry {
        targets: Vec<(String, VendorTarget)>,
    }

    impl ModelRegistry for StaticRegistry {
        fn resolve(&self, model_id: &str) -> Result<VendorTarget, DomainError> {
            self.targets
                .iter()
                .find(|(id, _)| id == model_id)
                .map(|(_, t)| t.clone())
                .ok_or_else(|| DomainError::unknown_model(model_id))
        }

        fn available_models(&self) -> Vec<String> {
            self.targets.iter().map(|(id, _)| id.clone()).collect()
        }
    }

    struct StaticContext(HashMap<PathBuf, String>);

    #[async_trait]
    impl ContextProvider for StaticContext {
        async fn get_context(&self, paths: &[PathBuf]) -> Result<Option<Context>, DomainError> {
            let texts: Vec<&str> = paths
                .iter()
                .filter_map(|p| self.0.get(p).map(String::as_str))
                .collect();
            if texts.is_empty() {
                return Ok(None);
            }
            Ok(Some(Context::new(texts.join("\n"), texts.len())))
        }
    }

    fn setup(mock: Arc<MockVendorClient>) -> AskUseCase {
        let registry = StaticRegistry {
            targets: vec![
                ("gemini".to_string(), VendorTarget::generation("gemini-2.0-flash", mock.clone())),
                ("gpt-4o".to_string(), VendorTarget::completion("gpt-4o-deploy", mock)),
            ],
        };
        let docs = HashMap::from([(PathBuf::from("notes.txt"), "The sky is green.".to_string())]);
        AskUseCase::new(Arc::new(registry), Arc::new(StaticContext(docs)))
    }

    #[tokio::test]
    async fn uses_default_model_when_none_selected() {
        let mock = Arc::new(MockVendorClient::new());
        let use_case = setup(mock.clone());

        use_case.execute(&AskRequest::new("hi")).await.unwrap();

        assert!(matches!(
            mock.requests().as_slice(),
            [RecordedRequest::Generation { model, .. }] if model == "gemini-2.0-flash"
        ));
    }

    #[tokio::test]
    async fn grounds_selected_model_on_documents() {
        let mock = Arc::new(MockVendorClient::new());
        let use_case = setup(mock.clone());

        let request = AskRequest::new("what colour is the sky?")
            .with_model("gpt-4o")
            .with_files(vec![PathBuf::from("notes.txt")]);
        use_case.execute(&request).await.unwrap();

        match mock.requests().as_slice() {
            [RecordedRequest::Completion { model, messages }] => {
                assert_eq!(model, "gpt-4o-deploy");
                assert_eq!(messages[0], ChatMessage::system("The sky is green."));
            }
            other => panic!("unexpected requests: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_model_fails_before_any_call() {
        let mock = Arc::new(MockVendorClient::new());
        let use_case = setup(mock.clone());

        let err = use_case
            .execute(&AskRequest::new("hi").with_model("claude"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UnknownModel(ref m) if m == "claude"));
        assert!(mock.requests().is_empty());
    }
}
