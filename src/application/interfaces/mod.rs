mod context_provider;
mod model_registry;
mod vendor_client;

pub use context_provider::*;
pub use model_registry::*;
pub use vendor_client::*;
