//! Provider adapters
//!
//! This module implements the translation layer between canonical
//! conversations and provider wire formats.

pub mod error;
pub mod workersai;

pub use error::{AdapterError, AdapterResult};

// Re-export the concrete generator
pub use workersai::{GeneratorConfig, WorkersAiGenerator};
