//! # Application Layer
//!
//! Vendor, registry and context-provider interfaces plus the dispatch and
//! ask use cases that coordinate them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
