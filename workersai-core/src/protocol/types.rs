//! Canonical conversation types
//!
//! These structures are the provider-agnostic representation exchanged with
//! the host orchestration layer. The design prioritizes:
//! - A closed set of content parts matched exhaustively at every consumer
//! - Correlation identifiers (`ref`) linking tool requests to their results
//! - Plain serde representations so callers can persist or replay turns

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Role of a message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// System instructions that guide the model's behavior
    System,
    /// User input message
    User,
    /// Model (assistant) output
    Model,
    /// Tool results fed back to the model
    Tool,
    /// A role token this adapter does not recognize
    Unknown(String),
}

impl Role {
    /// Canonical token for this role
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Model => "model",
            Role::Tool => "tool",
            Role::Unknown(token) => token,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "model" => Role::Model,
            "tool" => Role::Tool,
            _ => Role::Unknown(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Unknown(token) => token,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Correlation identifier naming this call
    #[serde(rename = "ref")]
    pub reference: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments, already normalized to plain key/value pairs
    #[serde(default)]
    pub input: Map<String, Value>,
}

/// The caller-supplied result of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Must equal the `ref` of the request this answers
    #[serde(rename = "ref")]
    pub reference: String,

    /// Name of the tool that produced the output
    pub name: String,

    /// Arbitrary JSON output
    #[serde(default)]
    pub output: Value,
}

/// Individual content part of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Text content part
    Text { text: String },
    /// Tool invocation emitted by the model
    ToolRequest(ToolRequest),
    /// Tool result supplied by the caller
    ToolResponse(ToolResponse),
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create a tool request part
    pub fn tool_request(
        reference: impl Into<String>,
        name: impl Into<String>,
        input: Map<String, Value>,
    ) -> Self {
        Part::ToolRequest(ToolRequest {
            reference: reference.into(),
            name: name.into(),
            input,
        })
    }

    /// Create a tool response part
    pub fn tool_response(
        reference: impl Into<String>,
        name: impl Into<String>,
        output: Value,
    ) -> Self {
        Part::ToolResponse(ToolResponse {
            reference: reference.into(),
            name: name.into(),
            output,
        })
    }

    /// Text carried by this part, if it is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::ToolRequest(_) | Part::ToolResponse(_) => None,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Ordered content parts
    #[serde(default)]
    pub content: Vec<Part>,
}

impl Message {
    /// Create a message from a role and parts
    pub fn new(role: Role, content: Vec<Part>) -> Self {
        Self { role, content }
    }

    /// Create a system message with a single text part
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![Part::text(text)])
    }

    /// Create a user message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create a model message with a single text part
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Create a tool message from response parts
    pub fn tool(content: Vec<Part>) -> Self {
        Self::new(Role::Tool, content)
    }

    /// Concatenation of all text parts, in order
    pub fn text(&self) -> String {
        self.content.iter().filter_map(Part::as_text).collect()
    }

    /// Tool requests carried by this message, in order
    pub fn tool_requests(&self) -> impl Iterator<Item = &ToolRequest> {
        self.content.iter().filter_map(|part| match part {
            Part::ToolRequest(request) => Some(request),
            _ => None,
        })
    }
}

/// Tool definition offered to the model for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Human readable description
    #[serde(default)]
    pub description: String,

    /// JSON schema describing the tool input
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub input_schema: Option<Value>,
}

impl ToolDefinition {
    /// Create a tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Attach an input schema
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// Optional sampling parameters for a turn
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Seed for deterministic generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
}

/// One canonical generation request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Conversation history, oldest first
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Tools available for this turn
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tools: Vec<ToolDefinition>,

    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub config: Option<GenerationConfig>,
}

impl ModelRequest {
    /// Create a request from a message history
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Offer tools for this turn
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set sampling parameters
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Why generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    /// Generation completed (also used when tool calls are pending)
    Stop,
}

/// Token accounting for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Canonical result of one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Generated message, always with `Role::Model`
    pub message: Message,

    pub finish_reason: FinishReason,

    /// Always present; zeros when the provider reported nothing
    pub usage: Usage,

    /// The request that produced this response
    pub request: ModelRequest,
}

impl ModelResponse {
    /// Concatenated text of the generated message
    pub fn text(&self) -> String {
        self.message.text()
    }

    /// Tool requests of the generated message, in provider order
    pub fn tool_requests(&self) -> Vec<&ToolRequest> {
        self.message.tool_requests().collect()
    }
}

/// Incremental piece of a response delivered to a streaming callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponseChunk {
    /// Position of this chunk in the response
    pub index: usize,

    /// Parts carried by this chunk
    pub content: Vec<Part>,
}
