//! Workers AI provider implementation
//!
//! This module provides an adapter for the Workers AI `ai/run` API,
//! translating between the canonical protocol and the provider's format.

pub mod arguments;
mod generator;
pub mod messages;
pub mod models;
pub mod response;
pub mod roles;
pub mod tools;
pub mod types;

pub use generator::{ChunkCallback, GeneratorConfig, WorkersAiGenerator, DEFAULT_BASE_URL};
pub use types::{WireConversation, WireMessage, WorkersAiRequest, WorkersAiResponse};
