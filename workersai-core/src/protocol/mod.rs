//! Protocol module for canonical conversation structures
//!
//! This module defines the provider-agnostic data model consumed from and
//! produced for the host orchestration layer. These structures are designed to be:
//! - Provider-agnostic
//! - Closed over their content kinds (exhaustive matching)
//! - Type-safe and serializable

pub mod types;

pub use types::{
    FinishReason, GenerationConfig, Message, ModelRequest, ModelResponse, ModelResponseChunk,
    Part, Role, ToolDefinition, ToolRequest, ToolResponse, Usage,
};
