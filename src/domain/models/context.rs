use serde::{Deserialize, Serialize};

/// Grounding text derived from caller-supplied documents for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    text: String,
    source_count: usize,
}

impl Context {
    pub fn new(text: impl Into<String>, source_count: usize) -> Self {
        Self {
            text: text.into(),
            source_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_count(&self) -> usize {
        self.source_count
    }
}
