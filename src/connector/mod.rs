//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Vendor clients (Azure OpenAI, OpenAI, Gemini, and an offline mock)
//! - Model registry built from environment configuration
//! - Document context from PDF and plain-text files

pub mod adapter;
pub mod config;
pub mod container;

pub use adapter::*;
pub use config::*;
pub use container::*;
