//! One-turn orchestration: encode, call the transport, decode

use super::messages::encode_conversation;
use super::models::model_ref;
use super::response::{decode_response, parse_response};
use super::tools::encode_tools;
use super::types::{WireConversation, WorkersAiRequest};
use crate::config::SecretString;
use crate::http::{HttpClient, HttpRequest, RequestOptions, Transport, TransportError};
use crate::protocol::{ModelRequest, ModelResponse, ModelResponseChunk};
use crate::providers::error::{AdapterError, AdapterResult};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Callback for incremental delivery
///
/// Accepted for interface compatibility; see [`WorkersAiGenerator::generate`].
pub type ChunkCallback<'a> = &'a (dyn Fn(&ModelResponseChunk) -> AdapterResult<()> + Send + Sync);

/// Immutable per-model configuration
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Model identifier, e.g. `@cf/meta/llama-3.3-70b-instruct-fp8-fast`
    pub model: String,

    /// Cloudflare account the model runs under
    pub account_id: String,

    /// Bearer token
    pub api_token: SecretString,

    /// API root, without trailing slash
    pub base_url: String,

    /// Deadline for one turn
    pub timeout: Duration,

    /// Log full request and response bodies at debug level
    pub debug: bool,
}

impl GeneratorConfig {
    /// Create a configuration with the default endpoint and timeout
    pub fn new(
        model: impl Into<String>,
        account_id: impl Into<String>,
        api_token: impl Into<SecretString>,
    ) -> Self {
        Self {
            model: model.into(),
            account_id: account_id.into(),
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            debug: false,
        }
    }

    /// Point at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-turn deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable body logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("model", &self.model)
            .field("account_id", &self.account_id)
            .field("api_token", &self.api_token)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Generates one conversation turn against a single Workers AI model
///
/// Holds no mutable state; share it behind an `Arc` to run turns
/// concurrently.
pub struct WorkersAiGenerator {
    config: GeneratorConfig,
    transport: Arc<dyn Transport>,
}

impl WorkersAiGenerator {
    /// Create a generator over a caller-supplied transport
    pub fn new(config: GeneratorConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Create a generator over a pooled reqwest client
    pub fn with_http_client(config: GeneratorConfig) -> AdapterResult<Self> {
        let client = HttpClient::new()?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Fully qualified model reference, e.g. `workersai/@cf/qwen/qwen3-30b-a3b-fp8`
    pub fn model_ref(&self) -> String {
        model_ref(&self.config.model)
    }

    /// URL of the run endpoint for the configured account and model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_id,
            self.config.model
        )
    }

    /// Build the wire request for one turn
    pub fn build_request(
        &self,
        request: &ModelRequest,
        streaming: bool,
    ) -> AdapterResult<HttpRequest> {
        let conversation = encode_conversation(&request.messages, &self.config.model)?;

        let (messages, prompt, tools) = match conversation {
            WireConversation::Messages(messages) => {
                (Some(messages), None, encode_tools(&request.tools)?)
            }
            WireConversation::Prompt(prompt) => {
                if !request.tools.is_empty() {
                    warn!(
                        "Model '{}' takes a flat prompt, dropping {} tool definition(s)",
                        self.config.model,
                        request.tools.len()
                    );
                }
                (None, Some(prompt), None)
            }
        };

        let body = WorkersAiRequest {
            messages,
            prompt,
            tools,
            stream: streaming.then_some(false),
            config: request.config.clone().unwrap_or_default(),
        };

        let body =
            serde_json::to_value(&body).map_err(|e| AdapterError::encode("request body", e))?;

        Ok(HttpRequest {
            url: self.endpoint(),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_token.expose_secret()),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    /// Run one turn with default request options
    ///
    /// A supplied `callback` is never invoked: the reply is buffered and
    /// decoded once, so callers asking for incremental delivery observe an
    /// ordinary completion.
    pub async fn generate(
        &self,
        request: &ModelRequest,
        callback: Option<ChunkCallback<'_>>,
    ) -> AdapterResult<ModelResponse> {
        let options = RequestOptions::new().with_timeout(self.config.timeout);
        self.generate_with_options(request, callback, options).await
    }

    /// Run one turn with explicit request options
    pub async fn generate_with_options(
        &self,
        request: &ModelRequest,
        callback: Option<ChunkCallback<'_>>,
        options: RequestOptions,
    ) -> AdapterResult<ModelResponse> {
        let request_id = options.request_id;
        let streaming = callback.is_some();

        info!(
            "Generating with {} [request_id: {}]",
            self.config.model, request_id
        );
        if streaming {
            debug!(
                "Streaming requested, delivering the buffered reply instead [request_id: {}]",
                request_id
            );
        }

        let http_request = self.build_request(request, streaming)?;
        if self.config.debug {
            debug!(
                "POST {} [request_id: {}]: {}",
                http_request.url, request_id, http_request.body
            );
        }

        let timeout = options.timeout;
        let body = tokio::time::timeout(timeout, self.transport.execute(http_request, &options))
            .await
            .map_err(|_| {
                warn!("Turn timed out after {:?} [request_id: {}]", timeout, request_id);
                TransportError::Timeout(timeout)
            })??;

        if self.config.debug {
            debug!(
                "Response body [request_id: {}]: {}",
                request_id,
                String::from_utf8_lossy(&body)
            );
        }

        let response = parse_response(&body)?;
        let decoded = decode_response(response, request)?;

        info!(
            "Generated {} part(s), {} input / {} output tokens [request_id: {}]",
            decoded.message.content.len(),
            decoded.usage.input_tokens,
            decoded.usage.output_tokens,
            request_id
        );

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Message, ToolDefinition};
    use crate::providers::workersai::models::LLAMA_3_3_70B_INSTRUCT_FP8_FAST;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport that records requests and replies with a fixed body
    struct CannedTransport {
        reply: Result<Vec<u8>, TransportError>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn replying(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(body.to_string().into_bytes()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(
            &self,
            request: HttpRequest,
            _options: &RequestOptions,
        ) -> Result<Vec<u8>, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    fn config(model: &str) -> GeneratorConfig {
        GeneratorConfig::new(model, "acct-123", "token-abc")
            .with_base_url("https://example.test/client/v4/")
    }

    #[test]
    fn test_endpoint_includes_account_and_model() {
        let transport = CannedTransport::replying(json!({}));
        let generator = WorkersAiGenerator::new(config("@cf/qwen/qwen3-30b-a3b-fp8"), transport);

        assert_eq!(
            generator.endpoint(),
            "https://example.test/client/v4/accounts/acct-123/ai/run/@cf/qwen/qwen3-30b-a3b-fp8"
        );
        assert_eq!(generator.model_ref(), "workersai/@cf/qwen/qwen3-30b-a3b-fp8");
    }

    #[test]
    fn test_build_request_for_single_user_message() {
        let transport = CannedTransport::replying(json!({}));
        let generator = WorkersAiGenerator::new(config(LLAMA_3_3_70B_INSTRUCT_FP8_FAST), transport);

        let request = generator
            .build_request(&ModelRequest::new(vec![Message::user("Hi")]), false)
            .unwrap();

        assert_eq!(request.header("authorization"), Some("Bearer token-abc"));
        assert_eq!(request.body, json!({"messages": [{"role": "user", "content": "Hi"}]}));
    }

    #[test]
    fn test_prompt_models_get_prompt_and_no_tools() {
        let transport = CannedTransport::replying(json!({}));
        let generator = WorkersAiGenerator::new(config("@cf/tiiuae/falcon-7b-instruct"), transport);

        let request = ModelRequest::new(vec![Message::system("Be brief."), Message::user("Hi")])
            .with_tools(vec![ToolDefinition::new("noop", "does nothing")]);
        let http = generator.build_request(&request, false).unwrap();

        assert_eq!(http.body, json!({"prompt": "System: Be brief.\nUser: Hi\n"}));
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let rendered = format!("{:?}", config("@cf/qwen/qwen3-30b-a3b-fp8"));
        assert!(!rendered.contains("token-abc"));
    }

    #[tokio::test]
    async fn test_streaming_callback_is_never_invoked() {
        let transport =
            CannedTransport::replying(json!({"success": true, "result": {"response": "Hello"}}));
        let generator =
            WorkersAiGenerator::new(config(LLAMA_3_3_70B_INSTRUCT_FP8_FAST), transport.clone());

        let calls = Mutex::new(0usize);
        let callback = |_: &ModelResponseChunk| -> AdapterResult<()> {
            *calls.lock().unwrap() += 1;
            Ok(())
        };

        let response = generator
            .generate(&ModelRequest::new(vec![Message::user("Hi")]), Some(&callback))
            .await
            .unwrap();

        assert_eq!(response.text(), "Hello");
        assert_eq!(*calls.lock().unwrap(), 0);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].body["stream"], json!(false));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_decoded() {
        let transport = Arc::new(CannedTransport {
            reply: Err(TransportError::Status {
                status: 401,
                body: "unauthorized".to_string(),
            }),
            seen: Mutex::new(Vec::new()),
        });
        let generator = WorkersAiGenerator::new(config(LLAMA_3_3_70B_INSTRUCT_FP8_FAST), transport);

        let err = generator
            .generate(&ModelRequest::new(vec![Message::user("Hi")]), None)
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(err.to_string().contains("unauthorized"));
    }
}
