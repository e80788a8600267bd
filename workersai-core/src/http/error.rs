//! Transport error types and HTTP error mapping

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by a transport while performing one request
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request did not finish before its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or I/O failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body exceeded the configured cap
    #[error("Response size {size} exceeds maximum {max}")]
    ResponseTooLarge { size: usize, max: usize },

    /// The HTTP client could not be built or the request could not be formed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl TransportError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Map a non-success status and its raw body to a transport error
pub fn map_http_error(
    status: StatusCode,
    body: Option<String>,
    request_id: Uuid,
) -> TransportError {
    let body = body
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("empty response body")
                .to_string()
        });

    tracing::debug!(
        "Mapped HTTP {} to transport error [request_id: {}]",
        status.as_u16(),
        request_id
    );

    TransportError::Status {
        status: status.as_u16(),
        body,
    }
}

/// Map a reqwest failure to a transport error
pub fn map_reqwest_error(
    err: reqwest::Error,
    timeout: Duration,
    request_id: Uuid,
) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Network {
            message: format!("Connection failed: {} [request_id: {}]", err, request_id),
        }
    } else if err.is_builder() {
        TransportError::Client(format!("{} [request_id: {}]", err, request_id))
    } else {
        TransportError::Network {
            message: format!("{} [request_id: {}]", err, request_id),
        }
    }
}
