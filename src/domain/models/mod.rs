mod context;
mod conversation;
mod response;
mod vendor_family;

pub use context::*;
pub use conversation::*;
pub use response::*;
pub use vendor_family::*;
