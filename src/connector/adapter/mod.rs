mod azure_openai_client;
mod configured_model_registry;
mod file_context_provider;
mod gemini_client;
mod mock_vendor_client;
mod openai_client;
mod vendor_http;

pub use azure_openai_client::*;
pub use configured_model_registry::*;
pub use file_context_provider::*;
pub use gemini_client::*;
pub use mock_vendor_client::*;
pub use openai_client::*;
