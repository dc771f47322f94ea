use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::connector::adapter::{
    AZURE_DEFAULT_API_VERSION, DEFAULT_CHARS_PER_TOKEN, DEFAULT_CONTEXT_TOKEN_BUDGET,
    GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL, OPENAI_DEFAULT_BASE_URL,
    OPENAI_DEFAULT_TEMPERATURE,
};
use crate::domain::{DomainError, VendorFamily};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Vendor API a configured model talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorKind {
    Gemini,
    AzureOpenAi,
    OpenAi,
}

impl VendorKind {
    pub fn family(&self) -> VendorFamily {
        match self {
            VendorKind::Gemini => VendorFamily::Generation,
            VendorKind::AzureOpenAi | VendorKind::OpenAi => VendorFamily::Completion,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorKind::Gemini => "gemini",
            VendorKind::AzureOpenAi => "azure_openai",
            VendorKind::OpenAi => "openai",
        }
    }
}

/// One selectable model and the credentials needed to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    /// User-facing identifier (`gemini`, `gpt-4o`, ...).
    pub id: String,
    pub vendor: VendorKind,
    /// Name sent to the vendor: model name, or deployment name on Azure.
    pub model: String,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
}

impl ModelEntry {
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn family(&self) -> VendorFamily {
        self.vendor.family()
    }
}

/// Process configuration read from the environment.
///
/// | Variable                        | Default        |
/// |---------------------------------|----------------|
/// | `GEMINI_API_KEY` / `GEMINI_MODEL` / `GEMINI_BASE_URL` | model `gemini-2.0-flash` |
/// | `GPT4O_KEY` / `GPT4O_ENDPOINT` / `GPT4O_VERSION` / `GPT4O_MODEL` | Azure deployment `gpt-4o` |
/// | `O1_KEY` / `O1_ENDPOINT` / `O1_VERSION` / `O1_MODEL` | Azure deployment `o1-preview` |
/// | `OPENAI_API_KEY` / `OPENAI_MODEL` / `OPENAI_BASE_URL` | model `gpt-3.5-turbo` |
/// | `OPENAI_TEMPERATURE`            | `0.7`          |
/// | `DOCCHAT_DEFAULT_MODEL`         | first available model |
/// | `DOCCHAT_REQUEST_TIMEOUT_SECS`  | `120`          |
/// | `DOCCHAT_CONTEXT_TOKEN_BUDGET`  | `100000`       |
/// | `DOCCHAT_CHARS_PER_TOKEN`       | `4`            |
///
/// Models are listed in priority order; the first one with an API key is the
/// default unless `DOCCHAT_DEFAULT_MODEL` says otherwise.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub models: Vec<ModelEntry>,
    pub default_model: Option<String>,
    pub request_timeout: Duration,
    pub context_token_budget: usize,
    pub chars_per_token: usize,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub openai_temperature: f32,
}

impl AppConfig {
    /// Load variables from a `.env` file (if given, or `./.env` if present)
    /// and then read the process environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, DomainError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    DomainError::config(format!("failed to load {}: {e}", path.display()))
                })?;
            }
            None => {
                if let Ok(path) = dotenvy::dotenv() {
                    debug!("Loaded environment from {}", path.display());
                }
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let models = vec![
            ModelEntry {
                id: "gemini".to_string(),
                vendor: VendorKind::Gemini,
                model: get("GEMINI_MODEL").unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string()),
                api_key: get("GEMINI_API_KEY"),
                endpoint: None,
                api_version: None,
            },
            azure_entry("gpt-4o", "GPT4O", &get),
            azure_entry("o1-preview", "O1", &get),
            ModelEntry {
                id: "openai".to_string(),
                vendor: VendorKind::OpenAi,
                model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
                api_key: get("OPENAI_API_KEY"),
                endpoint: None,
                api_version: None,
            },
        ];

        Ok(Self {
            models,
            default_model: get("DOCCHAT_DEFAULT_MODEL"),
            request_timeout: Duration::from_secs(
                parse_var(&get, "DOCCHAT_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            context_token_budget: parse_var(&get, "DOCCHAT_CONTEXT_TOKEN_BUDGET")?
                .unwrap_or(DEFAULT_CONTEXT_TOKEN_BUDGET),
            chars_per_token: parse_var(&get, "DOCCHAT_CHARS_PER_TOKEN")?
                .unwrap_or(DEFAULT_CHARS_PER_TOKEN),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| GEMINI_DEFAULT_BASE_URL.to_string()),
            openai_temperature: parse_var(&get, "OPENAI_TEMPERATURE")?
                .unwrap_or(OPENAI_DEFAULT_TEMPERATURE),
        })
    }

    /// Models with credentials, in priority order.
    pub fn available_models(&self) -> impl Iterator<Item = &ModelEntry> {
        self.models.iter().filter(|m| m.is_available())
    }
}

fn azure_entry<G>(id: &str, prefix: &str, get: &G) -> ModelEntry
where
    G: Fn(&str) -> Option<String>,
{
    ModelEntry {
        id: id.to_string(),
        vendor: VendorKind::AzureOpenAi,
        model: get(&format!("{prefix}_MODEL")).unwrap_or_else(|| id.to_string()),
        api_key: get(&format!("{prefix}_KEY")),
        endpoint: get(&format!("{prefix}_ENDPOINT")),
        api_version: Some(
            get(&format!("{prefix}_VERSION"))
                .unwrap_or_else(|| AZURE_DEFAULT_API_VERSION.to_string()),
        ),
    }
}

fn parse_var<G, T>(get: &G, key: &str) -> Result<Option<T>, DomainError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| DomainError::config(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}
