//! Tool-call argument normalization
//!
//! Models served by Workers AI disagree on how tool arguments are encoded.
//! Most emit the simple shape:
//!
//! ```json
//! {"location": "Eindhoven, NL", "unit": "celsius"}
//! ```
//!
//! Others wrap every value with its JSON-schema type:
//!
//! ```json
//! {"Over": {"type": "number", "value": 3.5}, "Value": {"type": "integer", "value": 2}}
//! ```
//!
//! Both collapse to the simple shape here, key by key, so a single call may
//! mix the two.

use super::types::ResultToolCall;
use crate::protocol::Part;
use crate::providers::error::{AdapterError, AdapterResult};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unwrap verbose `{"type": .., "value": v}` entries to `v`, keep everything else
pub fn normalize_arguments(raw: Map<String, Value>) -> Map<String, Value> {
    raw.into_iter()
        .map(|(key, value)| match value {
            Value::Object(mut wrapper) if wrapper.contains_key("value") => {
                let inner = wrapper.remove("value").unwrap_or(Value::Null);
                (key, inner)
            }
            other => (key, other),
        })
        .collect()
}

/// Decode and normalize the arguments of one tool call
///
/// `arguments` is normally a JSON-encoded string; legacy replies may carry
/// the object directly. `null` means no arguments. Anything that does not
/// decode to an object is rejected.
pub fn parse_arguments(
    function_name: &str,
    arguments: &Value,
) -> AdapterResult<Map<String, Value>> {
    let context = || format!("arguments for tool '{}'", function_name);

    let decoded = match arguments {
        Value::String(encoded) => {
            serde_json::from_str::<Value>(encoded).map_err(|e| AdapterError::decode(context(), e))?
        }
        other => other.clone(),
    };

    match decoded {
        Value::Object(raw) => Ok(normalize_arguments(raw)),
        Value::Null => Ok(Map::new()),
        other => Err(AdapterError::decode(
            context(),
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
    }
}

/// Convert provider tool calls into canonical tool request parts, in order
///
/// One malformed call fails the whole list.
pub fn normalize_tool_calls(calls: &[ResultToolCall]) -> AdapterResult<Vec<Part>> {
    calls
        .iter()
        .map(|call| {
            let input = parse_arguments(call.name(), call.arguments())?;
            let reference = match call.id() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    let generated = format!("call_{}", Uuid::new_v4().simple());
                    tracing::debug!(
                        "Tool call '{}' has no id, assigned {}",
                        call.name(),
                        generated
                    );
                    generated
                }
            };
            Ok(Part::tool_request(reference, call.name(), input))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
