//! Workers AI Core Library
//!
//! This crate adapts a canonical, provider-agnostic conversation (messages,
//! tool requests and tool responses) to the Workers AI chat API and back.

pub mod config;
pub mod http;
pub mod protocol;
pub mod providers;

pub use providers::{AdapterError, AdapterResult, GeneratorConfig, WorkersAiGenerator};

/// Returns the version of the Workers AI Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
