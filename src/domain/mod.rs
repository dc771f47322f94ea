//! # Domain Layer
//!
//! Conversation, context and response models plus the error taxonomy.
//! This layer is independent of vendor SDKs and transport.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
