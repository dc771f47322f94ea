use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::domain::DomainError;

/// Build the shared HTTP client for a vendor adapter.
pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Send a prepared request and return the JSON body.
///
/// Transport errors, non-2xx statuses and unparseable bodies all become
/// [`DomainError::VendorCallFailed`] carrying the vendor's own message where
/// one is available.
pub(crate) async fn send_json(
    vendor: &str,
    request: reqwest::RequestBuilder,
) -> Result<Value, DomainError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            DomainError::vendor(format!("{vendor}: request timed out: {e}"))
        } else {
            DomainError::vendor(format!("{vendor}: request failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = vendor_error_message(&body).unwrap_or(body);
        warn!("{vendor}: API returned {status}: {message}");
        return Err(DomainError::vendor(format!(
            "{vendor}: API returned {status}: {message}"
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| DomainError::vendor(format!("{vendor}: failed to parse response: {e}")))
}

/// Pull `error.message` out of an error body; both OpenAI-style and Google
/// APIs use that shape.
fn vendor_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error": {"code": 401, "message": "API key not valid", "status": "UNAUTHENTICATED"}}"#;
        assert_eq!(
            vendor_error_message(body).as_deref(),
            Some("API key not valid")
        );
    }

    #[test]
    fn plain_text_errors_have_no_structured_message() {
        assert!(vendor_error_message("Bad Gateway").is_none());
        assert!(vendor_error_message(r#"{"detail": "nope"}"#).is_none());
    }
}
