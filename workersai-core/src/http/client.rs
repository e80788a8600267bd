//! HTTP client implementation using reqwest

use crate::http::error::{map_http_error, map_reqwest_error, TransportError};
use crate::http::{HttpRequest, RequestOptions, Transport};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Maximum response size (10MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("workersai-core/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with connection pooling
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: Arc<Client>,

    /// Maximum response size to prevent OOM
    max_response_size: usize,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(Duration::from_secs(10), Duration::from_secs(60), 10)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(
        connect_timeout: Duration,
        request_timeout: Duration,
        max_idle_per_host: usize,
    ) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| TransportError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }

    /// Override the response size cap
    pub fn with_max_response_size(mut self, max_response_size: usize) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    /// Check the advertised response size to prevent OOM
    fn check_content_length(&self, response: &Response) -> Result<(), TransportError> {
        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_size {
                return Err(TransportError::ResponseTooLarge {
                    size: content_length as usize,
                    max: self.max_response_size,
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
    ) -> Result<Vec<u8>, TransportError> {
        let request_id = options.request_id;

        info!("Executing HTTP request [request_id: {}]", request_id);
        debug!("Request URL: {}", request.url);

        let mut req_builder = self
            .client
            .post(&request.url)
            .timeout(options.timeout)
            .json(&request.body);

        for (key, value) in &request.headers {
            // Already set by `json`
            if key.eq_ignore_ascii_case("content-type") {
                continue;
            }
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        // Request ID header for correlation
        req_builder = req_builder.header("X-Request-ID", request_id.to_string());

        let response = req_builder.send().await.map_err(|e| {
            let mapped = map_reqwest_error(e, options.timeout, request_id);
            match &mapped {
                TransportError::Timeout(_) => {
                    warn!("Request timeout [request_id: {}]", request_id)
                }
                other => error!("Request error [request_id: {}]: {}", request_id, other),
            }
            mapped
        })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.ok();

            warn!(
                "Request failed with status {} [request_id: {}]",
                status, request_id
            );

            return Err(map_http_error(status, body, request_id));
        }

        self.check_content_length(&response)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(e, options.timeout, request_id))?;

        if bytes.len() > self.max_response_size {
            return Err(TransportError::ResponseTooLarge {
                size: bytes.len(),
                max: self.max_response_size,
            });
        }

        info!(
            "Request completed successfully [request_id: {}]",
            request_id
        );

        Ok(bytes.to_vec())
    }
}
