//! Conversion of Workers AI replies into canonical responses

use super::arguments::normalize_tool_calls;
use super::types::{ResultToolCall, WireUsage, WorkersAiError, WorkersAiResponse, WorkersAiResult};
use crate::protocol::{FinishReason, Message, ModelRequest, ModelResponse, Part, Role, Usage};
use crate::providers::error::{AdapterError, AdapterResult};
use serde_json::Value;

/// Parse a raw reply body into the response envelope
///
/// A body that is not a valid envelope is a decode failure, distinct from a
/// well-formed `success: false` reply.
pub fn parse_response(body: &[u8]) -> AdapterResult<WorkersAiResponse> {
    serde_json::from_slice(body).map_err(|e| AdapterError::decode("response body", e))
}

/// Convert one reply into exactly one canonical response
///
/// Tool calls take precedence over text. The finish reason is always
/// [`FinishReason::Stop`], including when tool calls are pending.
pub fn decode_response(
    response: WorkersAiResponse,
    request: &ModelRequest,
) -> AdapterResult<ModelResponse> {
    if !response.success {
        return Err(provider_error(&response.errors));
    }

    let (text, tool_calls, usage) = split_result(response.result);

    let content = if tool_calls.is_empty() {
        vec![Part::text(text)]
    } else {
        normalize_tool_calls(&tool_calls)?
    };

    Ok(ModelResponse {
        message: Message::new(Role::Model, content),
        finish_reason: FinishReason::Stop,
        usage: to_usage(usage),
        request: request.clone(),
    })
}

fn split_result(
    result: Option<WorkersAiResult>,
) -> (String, Vec<ResultToolCall>, Option<WireUsage>) {
    match result {
        None => (String::new(), Vec::new(), None),
        Some(WorkersAiResult::Text(text)) => (text, Vec::new(), None),
        Some(WorkersAiResult::Legacy(legacy)) => (
            legacy.response.map(render_text).unwrap_or_default(),
            legacy.tool_calls,
            legacy.usage,
        ),
        Some(WorkersAiResult::ChatCompletion(completion)) => {
            let (text, tool_calls) = completion
                .choices
                .into_iter()
                .next()
                .map(|choice| {
                    (
                        choice.message.content.unwrap_or_default(),
                        choice.message.tool_calls,
                    )
                })
                .unwrap_or_default();
            (text, tool_calls, completion.usage)
        }
    }
}

/// JSON-mode models may answer with structured data instead of a string
fn render_text(response: Value) -> String {
    match response {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn provider_error(errors: &[WorkersAiError]) -> AdapterError {
    match errors.first() {
        Some(error) => AdapterError::Provider {
            code: error
                .code
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string()),
            message: error.message.clone(),
        },
        None => AdapterError::Provider {
            code: "unknown".to_string(),
            message: "request failed without error details".to_string(),
        },
    }
}

fn to_usage(usage: Option<WireUsage>) -> Usage {
    let usage = usage.unwrap_or_default();
    let total_tokens = if usage.total_tokens == 0 {
        usage.prompt_tokens.saturating_add(usage.completion_tokens)
    } else {
        usage.total_tokens
    };

    Usage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        total_tokens,
    }
}
