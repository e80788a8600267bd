//! Adapter error types and handling

use crate::http::TransportError;
use thiserror::Error;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors surfaced to the caller of one turn
///
/// None of these are retried by the adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Canonical input could not be expressed on the wire
    #[error("Failed to encode {context}: {message}")]
    Encode { context: String, message: String },

    /// A tool schema uses a feature the provider cannot represent
    #[error("Failed to convert schema for tool '{tool}': {message}")]
    SchemaConversion { tool: String, message: String },

    /// The reply body or one of its tool calls could not be decoded
    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// The provider answered with `success: false`
    #[error("Provider error: {code}: {message}")]
    Provider { code: String, message: String },

    /// The transport failed before a reply was available
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl AdapterError {
    pub(crate) fn encode(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Encode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn schema(tool: impl Into<String>, message: impl ToString) -> Self {
        Self::SchemaConversion {
            tool: tool.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn decode(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error was reported by the transport collaborator
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
