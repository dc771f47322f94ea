mod ask;
mod dispatch_request;
mod normalize_usage;

pub use ask::*;
pub use dispatch_request::*;
pub use normalize_usage::*;
