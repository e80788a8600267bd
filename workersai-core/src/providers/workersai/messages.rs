//! Conversion of canonical history into Workers AI messages
//!
//! Tool correlation is rebuilt here: every tool request of a model turn
//! becomes a tool call whose `id` is the request's `ref`, and every tool
//! response of the following tool turn becomes a tool message whose
//! `tool_call_id` is the response's `ref`. Order of parts is preserved on both
//! sides.

use super::models::supports_structured_chat;
use super::roles::{prompt_label, to_wire_role};
use super::types::{FunctionCall, ToolCall, WireConversation, WireMessage};
use crate::protocol::{Message, Part, Role};
use crate::providers::error::{AdapterError, AdapterResult};
use tracing::debug;

/// Encode the history in the shape the target model accepts
pub fn encode_conversation(messages: &[Message], model: &str) -> AdapterResult<WireConversation> {
    if supports_structured_chat(model) {
        encode_messages(messages).map(WireConversation::Messages)
    } else {
        debug!("Model '{}' has no chat support, flattening history", model);
        Ok(WireConversation::Prompt(flatten_prompt(messages)))
    }
}

/// Encode the history as structured chat messages
pub fn encode_messages(messages: &[Message]) -> AdapterResult<Vec<WireMessage>> {
    let mut wire = Vec::with_capacity(messages.len());

    for message in messages {
        match &message.role {
            Role::Model => encode_model_message(message, &mut wire)?,
            Role::Tool => encode_tool_message(message, &mut wire)?,
            Role::System | Role::User | Role::Unknown(_) => {
                let text = message.text();
                if !text.is_empty() {
                    wire.push(WireMessage::chat(to_wire_role(&message.role), text));
                }
            }
        }
    }

    Ok(wire)
}

/// Model turns carry either tool calls or text, never both
///
/// When a turn has tool requests, its text is dropped and the assistant
/// message gets an explicit empty `content`.
fn encode_model_message(message: &Message, wire: &mut Vec<WireMessage>) -> AdapterResult<()> {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in &message.content {
        match part {
            Part::Text { text: chunk } => text.push_str(chunk),
            Part::ToolRequest(request) => {
                let arguments = serde_json::to_string(&request.input).map_err(|e| {
                    AdapterError::encode(format!("input of tool '{}'", request.name), e)
                })?;
                tool_calls.push(ToolCall {
                    id: request.reference.clone(),
                    call_type: "function".to_string(),
                    function: FunctionCall {
                        name: request.name.clone(),
                        arguments,
                    },
                });
            }
            Part::ToolResponse(response) => {
                debug!(
                    "Ignoring tool response '{}' inside a model turn",
                    response.reference
                );
            }
        }
    }

    if !tool_calls.is_empty() {
        if !text.is_empty() {
            debug!(
                "Dropping {} bytes of text from a model turn with {} tool call(s)",
                text.len(),
                tool_calls.len()
            );
        }
        wire.push(WireMessage::assistant_tool_calls(tool_calls));
    } else if !text.is_empty() {
        wire.push(WireMessage::chat("assistant", text));
    }

    Ok(())
}

fn encode_tool_message(message: &Message, wire: &mut Vec<WireMessage>) -> AdapterResult<()> {
    for part in &message.content {
        match part {
            Part::ToolResponse(response) => {
                let content = serde_json::to_string(&response.output).map_err(|e| {
                    AdapterError::encode(format!("output of tool '{}'", response.name), e)
                })?;
                wire.push(WireMessage::tool_result(response.reference.clone(), content));
            }
            Part::Text { .. } | Part::ToolRequest(_) => {}
        }
    }

    Ok(())
}

/// Render the history as `"<Label>: <text>\n"` lines
///
/// Tool turns are skipped; prompt-only models never see tool results.
pub fn flatten_prompt(messages: &[Message]) -> String {
    let mut prompt = String::new();

    for message in messages {
        if message.role == Role::Tool {
            continue;
        }
        let text = message.text();
        if text.is_empty() {
            continue;
        }
        prompt.push_str(prompt_label(&message.role));
        prompt.push_str(": ");
        prompt.push_str(&text);
        prompt.push('\n');
    }

    prompt
}
