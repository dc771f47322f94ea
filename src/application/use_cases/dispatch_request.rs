use std::future::Future;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::normalize_token_usage;
use crate::application::{VendorClient, VendorTarget};
use crate::domain::{ChatMessage, ConversationTurn, DomainError, Response, Role, VendorFamily};

/// Turns one user message plus history and optional context into exactly one
/// vendor call and a normalized [`Response`].
///
/// Holds no state between calls and never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchRequestUseCase;

impl DispatchRequestUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn dispatch(
        &self,
        message: &str,
        history: &[ConversationTurn],
        context: Option<&str>,
        target: &VendorTarget,
    ) -> Result<Response, DomainError> {
        self.run(message, history, context, target, None).await
    }

    /// Same as [`Self::dispatch`], but gives up as soon as `cancel` fires and
    /// reports a cancelled [`DomainError::VendorCallFailed`].
    pub async fn dispatch_with_cancel(
        &self,
        message: &str,
        history: &[ConversationTurn],
        context: Option<&str>,
        target: &VendorTarget,
        cancel: &CancellationToken,
    ) -> Result<Response, DomainError> {
        self.run(message, history, context, target, Some(cancel))
            .await
    }

    async fn run(
        &self,
        message: &str,
        history: &[ConversationTurn],
        context: Option<&str>,
        target: &VendorTarget,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, DomainError> {
        let context = context.filter(|c| !c.is_empty());

        info!(
            "Dispatching to {} model {} ({} history turns, {} bytes of context)",
            target.client().vendor(),
            target.model_name(),
            history.len(),
            context.map_or(0, str::len),
        );

        let raw = match (target.family(), target.client()) {
            (VendorFamily::Completion, VendorClient::Completion(client)) => {
                let messages = build_messages(message, history, context)?;
                debug!("Completion request carries {} messages", messages.len());
                await_vendor(client.complete(target.model_name(), &messages), cancel).await?
            }
            (VendorFamily::Generation, VendorClient::Generation(client)) => {
                let prompt = build_prompt(message, history, context)?;
                debug!("Generation prompt is {} bytes", prompt.len());
                await_vendor(client.generate(target.model_name(), &prompt), cancel).await?
            }
            (family, client) => {
                return Err(DomainError::unsupported_family(format!(
                    "{family} target '{}' is backed by a {} client ({})",
                    target.model_name(),
                    client.family(),
                    client.vendor(),
                )));
            }
        };

        let content = extract_reply_text(&raw, target.family()).ok_or_else(|| {
            DomainError::vendor(missing_reply_reason(&raw, target.client().vendor()))
        })?;
        let token_usage = normalize_token_usage(&raw, target.family());

        debug!("Reply received, usage: {}", token_usage);

        Ok(Response::new(content.trim(), token_usage))
    }
}

async fn await_vendor<F>(call: F, cancel: Option<&CancellationToken>) -> Result<Value, DomainError>
where
    F: Future<Output = Result<Value, DomainError>>,
{
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(DomainError::cancelled("request cancelled before the vendor replied")),
                result = call => result,
            }
        }
        None => call.await,
    }
}

/// Check every turn's role, returning the validated roles in order.
fn validated_turns(history: &[ConversationTurn]) -> Result<Vec<(Role, &str)>, DomainError> {
    history
        .iter()
        .enumerate()
        .map(|(index, turn)| match turn.role() {
            Some(role) => Ok((role, turn.content())),
            None => Err(DomainError::InvalidHistoryEntry {
                index,
                role: turn.raw_role().to_string(),
            }),
        })
        .collect()
}

/// Message list for completion-style vendors: optional system context, the
/// history in order, then the current user message.
pub fn build_messages(
    message: &str,
    history: &[ConversationTurn],
    context: Option<&str>,
) -> Result<Vec<ChatMessage>, DomainError> {
    let turns = validated_turns(history)?;

    let mut messages = Vec::with_capacity(turns.len() + 2);
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        messages.push(ChatMessage::system(context));
    }
    messages.extend(
        turns
            .into_iter()
            .map(|(role, content)| ChatMessage::new(role, content)),
    );
    messages.push(ChatMessage::user(message));

    Ok(messages)
}

/// Single prompt string for generation-style vendors.
///
/// Ends with `"User: {message}\nAssistant:"` so the model continues as the
/// assistant.
pub fn build_prompt(
    message: &str,
    history: &[ConversationTurn],
    context: Option<&str>,
) -> Result<String, DomainError> {
    let turns = validated_turns(history)?;

    let mut prompt = String::new();
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }
    for (role, content) in turns {
        if role == Role::User {
            prompt.push_str("User: ");
            prompt.push_str(content);
            prompt.push('\n');
        } else {
            prompt.push_str("Assistant: ");
            prompt.push_str(content);
            prompt.push_str("\n\n");
        }
    }
    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant:");

    Ok(prompt)
}

/// Reply text in the family's response layout, before trimming.
pub fn extract_reply_text(raw: &Value, family: VendorFamily) -> Option<String> {
    match family {
        VendorFamily::Completion => raw
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string),
        VendorFamily::Generation => {
            let parts = raw.pointer("/candidates/0/content/parts")?.as_array()?;
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.concat())
            }
        }
    }
}

fn missing_reply_reason(raw: &Value, vendor: &str) -> String {
    let block_reason = raw
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str);
    let finish_reason = raw
        .pointer("/choices/0/finish_reason")
        .or_else(|| raw.pointer("/candidates/0/finishReason"))
        .and_then(Value::as_str);

    match (block_reason, finish_reason) {
        (Some(reason), _) => format!("{vendor} blocked the prompt: {reason}"),
        (None, Some(reason)) => format!("{vendor} returned no reply text (finish reason: {reason})"),
        (None, None) => format!("{vendor} returned no reply text"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::connector::{MockVendorClient, RecordedRequest};

    fn history() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ]
    }

    #[test]
    fn messages_start_with_system_context_only_when_present() {
        let messages = build_messages("q", &history(), Some("ctx")).unwrap();
        assert_eq!(messages[0], ChatMessage::system("ctx"));
        assert_eq!(messages.len(), 4);

        for context in [None, Some("")] {
            let messages = build_messages("q", &history(), context).unwrap();
            assert!(messages.iter().all(|m| m.role != Role::System));
            assert_eq!(messages.len(), 3);
        }
    }

    #[test]
    fn messages_preserve_history_order_and_end_with_user() {
        let turns = vec![
            ConversationTurn::assistant("unprompted"),
            ConversationTurn::user("a"),
            ConversationTurn::user("b"),
        ];
        let messages = build_messages("now", &turns, None).unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::Assistant, Role::User, Role::User, Role::User]
        );
        assert_eq!(messages.last().unwrap(), &ChatMessage::user("now"));
    }

    #[test]
    fn empty_history_without_context_yields_single_user_message() {
        let messages = build_messages("msg", &[], None).unwrap();
        assert_eq!(messages, vec![ChatMessage::user("msg")]);
    }

    #[test]
    fn prompt_matches_expected_layout() {
        let prompt = build_prompt("how are you", &history(), None).unwrap();
        assert_eq!(
            prompt,
            "User: hi\nAssistant: hello\n\nUser: how are you\nAssistant:"
        );
    }

    #[test]
    fn prompt_keeps_unbalanced_history_as_given() {
        let turns = vec![
            ConversationTurn::assistant("unprompted"),
            ConversationTurn::user("a"),
            ConversationTurn::user("b"),
        ];
        let prompt = build_prompt("now", &turns, None).unwrap();
        assert_eq!(
            prompt,
            "Assistant: unprompted\n\nUser: a\nUser: b\nUser: now\nAssistant:"
        );
    }

    #[test]
    fn prompt_puts_context_first() {
        let prompt = build_prompt("q", &[], Some("Use this.")).unwrap();
        assert_eq!(prompt, "Use this.\n\nUser: q\nAssistant:");

        let prompt = build_prompt("q", &[], Some("")).unwrap();
        assert_eq!(prompt, "User: q\nAssistant:");
    }

    #[test]
    fn builders_reject_unknown_roles() {
        let turns = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::new("system", "override"),
        ];
        let err = build_prompt("q", &turns, None).unwrap_err();
        assert!(
            matches!(err, DomainError::InvalidHistoryEntry { index: 1, ref role } if role == "system")
        );
        assert!(build_messages("q", &turns, None).is_err());
    }

    #[test]
    fn generation_reply_concatenates_parts() {
        let raw = json!({
            "candidates": [{"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}]
        });
        assert_eq!(
            extract_reply_text(&raw, VendorFamily::Generation).as_deref(),
            Some("Hello, world")
        );
        assert!(extract_reply_text(&json!({"candidates": []}), VendorFamily::Generation).is_none());
    }

    #[tokio::test]
    async fn completion_dispatch_trims_reply_and_reads_usage() {
        let mock = Arc::new(MockVendorClient::new().with_completion_response(json!({
            "choices": [{"message": {"role": "assistant", "content": "  fine, thanks \n"}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        })));
        let target = VendorTarget::completion("gpt-4o", mock.clone());

        let response = DispatchRequestUseCase::new()
            .dispatch("how are you", &history(), Some("ctx"), &target)
            .await
            .unwrap();

        assert_eq!(response.content(), "fine, thanks");
        assert_eq!(response.token_usage().total_tokens, 12);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        match &requests[0] {
            RecordedRequest::Completion { model, messages } => {
                assert_eq!(model, "gpt-4o");
                assert_eq!(messages[0], ChatMessage::system("ctx"));
                assert_eq!(messages.len(), 4);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generation_dispatch_sends_single_prompt() {
        let mock = Arc::new(MockVendorClient::new());
        let target = VendorTarget::generation("gemini-2.0-flash", mock.clone());

        let response = DispatchRequestUseCase::new()
            .dispatch("how are you", &history(), None, &target)
            .await
            .unwrap();

        assert_eq!(response.content(), MockVendorClient::DEFAULT_REPLY);
        assert_eq!(
            mock.requests(),
            vec![RecordedRequest::Generation {
                model: "gemini-2.0-flash".to_string(),
                prompt: "User: hi\nAssistant: hello\n\nUser: how are you\nAssistant:".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn invalid_history_issues_no_vendor_call() {
        let mock = Arc::new(MockVendorClient::new());
        let target = VendorTarget::completion("gpt-4o", mock.clone());
        let turns = vec![ConversationTurn::new("tool", "{}")];

        let err = DispatchRequestUseCase::new()
            .dispatch("q", &turns, None, &target)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidHistoryEntry { index: 0, .. }));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn vendor_failure_is_an_error_not_an_empty_reply() {
        let mock = Arc::new(MockVendorClient::new().failing("connection reset"));
        let target = VendorTarget::generation("gemini-2.0-flash", mock);

        let err = DispatchRequestUseCase::new()
            .dispatch("q", &[], None, &target)
            .await
            .unwrap_err();

        match err {
            DomainError::VendorCallFailed { message, cancelled } => {
                assert!(message.contains("connection reset"));
                assert!(!cancelled);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_usage_still_succeeds() {
        let mock = Arc::new(MockVendorClient::new().with_completion_response(json!({
            "choices": [{"message": {"content": "ok"}}]
        })));
        let target = VendorTarget::completion("gpt-4o", mock);

        let response = DispatchRequestUseCase::new()
            .dispatch("q", &[], None, &target)
            .await
            .unwrap();

        assert_eq!(response.content(), "ok");
        assert!(response.token_usage().is_zero());
    }

    #[tokio::test]
    async fn missing_reply_text_is_a_vendor_failure() {
        let mock = Arc::new(MockVendorClient::new().with_generation_response(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })));
        let target = VendorTarget::generation("gemini-2.0-flash", mock);

        let err = DispatchRequestUseCase::new()
            .dispatch("q", &[], None, &target)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn mismatched_client_is_unsupported_family() {
        let mock = Arc::new(MockVendorClient::new());
        let target = VendorTarget::new(
            VendorFamily::Generation,
            "gpt-4o",
            VendorClient::Completion(mock.clone()),
        );

        let err = DispatchRequestUseCase::new()
            .dispatch("q", &[], None, &target)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UnsupportedFamily(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn cancellation_reports_cancelled_failure() {
        let mock = Arc::new(MockVendorClient::new().with_delay(Duration::from_secs(30)));
        let target = VendorTarget::completion("gpt-4o", mock);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = DispatchRequestUseCase::new()
            .dispatch_with_cancel("q", &[], None, &target, &token)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }
}
