use std::fmt;

use serde::{Deserialize, Serialize};

/// Token accounting reported by a vendor for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Prompt: {} | Completion: {} | Total: {}",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

/// Normalized result of one dispatch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    content: String,
    token_usage: TokenUsage,
}

impl Response {
    pub fn new(content: impl Into<String>, token_usage: TokenUsage) -> Self {
        Self {
            content: content.into(),
            token_usage,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn token_usage(&self) -> TokenUsage {
        self.token_usage
    }

    /// Footer line shown under a reply.
    pub fn usage_line(&self) -> String {
        format!("Token Usage: {}", self.token_usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_line_lists_all_counters() {
        let response = Response::new("ok", TokenUsage::new(12, 3, 15));
        assert_eq!(
            response.usage_line(),
            "Token Usage: Prompt: 12 | Completion: 3 | Total: 15"
        );
    }

    #[test]
    fn default_usage_is_zero() {
        assert!(TokenUsage::default().is_zero());
        assert!(!TokenUsage::new(0, 0, 1).is_zero());
    }
}
