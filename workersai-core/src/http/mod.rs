//! HTTP transport for provider requests
//!
//! This module implements the transport seam of the adapter, handling:
//! - Connection pooling and client management
//! - Request ID generation and correlation
//! - Mapping of timeouts, connection failures and non-2xx statuses
//!
//! The adapter only depends on the [`Transport`] trait; [`client::HttpClient`]
//! is the default implementation.

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::TransportError;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Options for a single transport call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Unique request ID for correlation
    pub request_id: Uuid,

    /// Deadline for the whole call
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RequestOptions {
    /// Create new request options with a generated request ID
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for this request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a caller-provided request ID
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}

/// An HTTP-shaped request ready for transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Absolute URL
    pub url: String,

    /// Header name/value pairs, in insertion order
    pub headers: Vec<(String, String)>,

    /// JSON body
    pub body: Value,
}

impl HttpRequest {
    /// Value of the first header with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Performs one request and returns the raw reply body
///
/// Implementations must be safe for concurrent use. Retries, if any, belong
/// to the implementation; the adapter never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a POST with a JSON body and return the raw 2xx body bytes
    async fn execute(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<Vec<u8>, TransportError>;
}
