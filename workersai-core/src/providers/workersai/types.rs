//! Workers AI API types
//!
//! These types match the Workers AI `ai/run` format and are used for
//! serialization/deserialization when communicating with the provider.

use crate::protocol::GenerationConfig;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Workers AI run request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkersAiRequest {
    /// Structured chat history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<WireMessage>>,

    /// Flattened prompt, for models without chat support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Function schemas; omitted entirely when no tools are offered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireTool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Sampling parameters, inlined into the body
    #[serde(flatten)]
    pub config: GenerationConfig,
}

/// Encoded conversation in the shape the target model accepts
#[derive(Debug, Clone, PartialEq)]
pub enum WireConversation {
    /// Structured chat messages
    Messages(Vec<WireMessage>),
    /// Single text block with role labels
    Prompt(String),
}

/// Workers AI message format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireMessage {
    /// Assistant turn that requested tools; `content` is always present
    AssistantToolCalls {
        role: String,
        content: String,
        tool_calls: Vec<ToolCall>,
    },
    /// Result of one tool call
    ToolResult {
        role: String,
        content: String,
        tool_call_id: String,
    },
    /// Plain turn
    Chat { role: String, content: String },
}

impl WireMessage {
    /// Plain chat turn
    pub fn chat(role: impl Into<String>, content: impl Into<String>) -> Self {
        WireMessage::Chat {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Assistant turn carrying tool calls and an explicit empty content
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        WireMessage::AssistantToolCalls {
            role: "assistant".to_string(),
            content: String::new(),
            tool_calls,
        }
    }

    /// Tool result threaded back to its call
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        WireMessage::ToolResult {
            role: "tool".to_string(),
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    pub fn role(&self) -> &str {
        match self {
            WireMessage::AssistantToolCalls { role, .. }
            | WireMessage::ToolResult { role, .. }
            | WireMessage::Chat { role, .. } => role,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            WireMessage::AssistantToolCalls { content, .. }
            | WireMessage::ToolResult { content, .. }
            | WireMessage::Chat { content, .. } => content,
        }
    }
}

/// Workers AI tool call, as sent back in conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,

    #[serde(rename = "type")]
    pub call_type: String,

    pub function: FunctionCall,
}

/// Function name and JSON-encoded arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Workers AI tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: WireFunction,
}

/// Workers AI function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterSchema>,
}

/// The subset of JSON schema the provider accepts for function parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub properties: BTreeMap<String, ParameterSchema>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSchema>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

/// Workers AI response envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkersAiResponse {
    pub success: bool,

    #[serde(default)]
    pub result: Option<WorkersAiResult>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<WorkersAiError>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Value>,
}

/// Error entry of a response envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkersAiError {
    #[serde(default)]
    pub code: Option<ErrorCode>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Error codes are numeric in practice, but some gateways send strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(code) => write!(f, "{}", code),
            ErrorCode::Text(code) => f.write_str(code),
        }
    }
}

/// Payload of a successful response
///
/// Newer models answer in the chat-completion shape (`choices`); older ones
/// use the legacy `{response, tool_calls, usage}` object, and some return a
/// bare string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum WorkersAiResult {
    ChatCompletion(ChatCompletionResult),
    Legacy(LegacyResult),
    Text(String),
}

impl TryFrom<Value> for WorkersAiResult {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Value::String(text) = value {
            return Ok(WorkersAiResult::Text(text));
        }

        if value.get("choices").is_some() {
            serde_json::from_value(value).map(WorkersAiResult::ChatCompletion)
        } else {
            serde_json::from_value(value).map(WorkersAiResult::Legacy)
        }
    }
}

/// Chat-completion shaped result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletionResult {
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: usize,

    pub message: ChoiceMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ResultToolCall>,
}

/// Legacy result object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyResult {
    /// Usually a string; JSON-mode models may return structured data
    #[serde(default)]
    pub response: Option<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ResultToolCall>,

    #[serde(default)]
    pub usage: Option<WireUsage>,
}

/// A tool call as returned by the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResultToolCall {
    /// `{id, type, function: {name, arguments}}`
    Function {
        #[serde(default)]
        id: Option<String>,
        function: ResultFunction,
    },
    /// `{name, arguments}` as emitted by legacy models, usually without an id
    Flat {
        #[serde(default)]
        id: Option<String>,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultFunction {
    pub name: String,

    /// JSON-encoded string, or an already decoded object
    #[serde(default)]
    pub arguments: Value,
}

impl ResultToolCall {
    pub fn id(&self) -> Option<&str> {
        match self {
            ResultToolCall::Function { id, .. } | ResultToolCall::Flat { id, .. } => id.as_deref(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResultToolCall::Function { function, .. } => &function.name,
            ResultToolCall::Flat { name, .. } => name,
        }
    }

    pub fn arguments(&self) -> &Value {
        match self {
            ResultToolCall::Function { function, .. } => &function.arguments,
            ResultToolCall::Flat { arguments, .. } => arguments,
        }
    }
}

/// Token usage as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct WireUsage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_tokens: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_tokens: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: u32,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
