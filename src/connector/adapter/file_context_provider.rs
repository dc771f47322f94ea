use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::ContextProvider;
use crate::domain::{Context, DomainError};

pub const CONTEXT_PREAMBLE: &str = "Use this information to answer questions:\n";
pub const DEFAULT_CONTEXT_TOKEN_BUDGET: usize = 100_000;
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Document kinds the provider knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "md" | "markdown" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// Reads PDF and plain-text files from disk into a single grounding context.
///
/// The character budget is derived from a token budget
/// (`token_budget * chars_per_token`) and split evenly across the files of a
/// request, so one large document cannot crowd out the others. Extracted text
/// is cached per path for the lifetime of the provider.
pub struct FileContextProvider {
    token_budget: usize,
    chars_per_token: usize,
    cache: Mutex<HashMap<PathBuf, Arc<String>>>,
}

impl FileContextProvider {
    pub fn new(token_budget: usize, chars_per_token: usize) -> Self {
        Self {
            token_budget,
            chars_per_token: chars_per_token.max(1),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn char_budget(&self) -> usize {
        self.token_budget.saturating_mul(self.chars_per_token)
    }

    async fn document_text(&self, path: &Path) -> Result<Arc<String>, DomainError> {
        if let Some(text) = self.cached(path) {
            debug!("Using cached text for {}", path.display());
            return Ok(text);
        }

        let kind = DocumentKind::from_path(path).ok_or_else(|| {
            DomainError::UnsupportedDocument(format!(
                "{} (expected .pdf, .txt or .md)",
                path.display()
            ))
        })?;

        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || extract_text(&owned, kind))
            .await
            .map_err(|e| DomainError::internal(format!("text extraction task failed: {e}")))??;

        info!("Extracted {} bytes of text from {}", text.len(), path.display());

        let text = Arc::new(text);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(path.to_path_buf(), Arc::clone(&text));
        }
        Ok(text)
    }

    fn cached(&self, path: &Path) -> Option<Arc<String>> {
        self.cache.lock().ok()?.get(path).cloned()
    }
}

impl Default for FileContextProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_TOKEN_BUDGET, DEFAULT_CHARS_PER_TOKEN)
    }
}

#[async_trait]
impl ContextProvider for FileContextProvider {
    async fn get_context(&self, paths: &[PathBuf]) -> Result<Option<Context>, DomainError> {
        if paths.is_empty() {
            return Ok(None);
        }

        let per_file = self.char_budget() / paths.len();
        if per_file == 0 {
            return Err(DomainError::config(format!(
                "context budget of {} chars cannot cover {} documents",
                self.char_budget(),
                paths.len()
            )));
        }
        let mut texts = Vec::with_capacity(paths.len());
        for path in paths {
            let text = self.document_text(path).await?;
            texts.push(truncate_chars(&text, per_file).to_string());
        }

        let context = format!("{CONTEXT_PREAMBLE}{}", texts.join("\n"));
        Ok(Some(Context::new(context, paths.len())))
    }
}

fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, DomainError> {
    match kind {
        DocumentKind::PlainText => Ok(std::fs::read_to_string(path)?),
        DocumentKind::Pdf => {
            let bytes = std::fs::read(path)?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
                DomainError::UnsupportedDocument(format!(
                    "{}: could not extract PDF text: {e}",
                    path.display()
                ))
            })
        }
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
