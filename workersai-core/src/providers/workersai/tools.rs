//! Conversion of canonical tool definitions into Workers AI function schemas

use super::types::{ParameterSchema, WireFunction, WireTool};
use crate::protocol::ToolDefinition;
use crate::providers::error::{AdapterError, AdapterResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keywords the provider's schema representation has no equivalent for
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$ref",
    "$defs",
    "definitions",
    "oneOf",
    "anyOf",
    "allOf",
    "not",
    "if",
    "then",
    "else",
    "patternProperties",
];

/// Keywords carried over into [`ParameterSchema`]; everything else is dropped
const KNOWN_KEYWORDS: &[&str] = &["type", "description", "properties", "required", "items", "enum"];

/// Encode tool definitions, or `None` when there are none
///
/// An empty `tools` array makes some models refuse the request, so the field
/// is omitted instead.
pub fn encode_tools(definitions: &[ToolDefinition]) -> AdapterResult<Option<Vec<WireTool>>> {
    if definitions.is_empty() {
        return Ok(None);
    }

    definitions
        .iter()
        .map(encode_tool)
        .collect::<AdapterResult<Vec<_>>>()
        .map(Some)
}

fn encode_tool(definition: &ToolDefinition) -> AdapterResult<WireTool> {
    let parameters = definition
        .input_schema
        .as_ref()
        .map(|schema| convert_root_schema(&definition.name, schema))
        .transpose()?;

    Ok(WireTool {
        tool_type: "function".to_string(),
        function: WireFunction {
            name: definition.name.clone(),
            description: definition.description.clone(),
            parameters,
        },
    })
}

/// Function parameters must describe an object
fn convert_root_schema(tool: &str, schema: &Value) -> AdapterResult<ParameterSchema> {
    let mut converted = convert_schema(tool, schema, "#")?;

    match converted.schema_type.as_deref() {
        None => converted.schema_type = Some("object".to_string()),
        Some("object") => {}
        Some(other) => {
            return Err(AdapterError::schema(
                tool,
                format!("parameters must be of type 'object', got '{}'", other),
            ))
        }
    }

    Ok(converted)
}

fn convert_schema(tool: &str, schema: &Value, path: &str) -> AdapterResult<ParameterSchema> {
    let object = schema
        .as_object()
        .ok_or_else(|| AdapterError::schema(tool, format!("schema at {} is not an object", path)))?;

    if let Some(keyword) = UNSUPPORTED_KEYWORDS.iter().find(|k| object.contains_key(**k)) {
        return Err(AdapterError::schema(
            tool,
            format!("unsupported keyword '{}' at {}", keyword, path),
        ));
    }

    let dropped: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !KNOWN_KEYWORDS.contains(key))
        .collect();
    if !dropped.is_empty() {
        tracing::trace!("Dropping schema keywords {:?} at {} for tool '{}'", dropped, path, tool);
    }

    Ok(ParameterSchema {
        schema_type: optional_string(tool, object, "type", path)?,
        description: optional_string(tool, object, "description", path)?,
        properties: convert_properties(tool, object, path)?,
        required: convert_required(tool, object, path)?,
        items: match object.get("items") {
            None | Some(Value::Null) => None,
            Some(items @ Value::Object(_)) => {
                Some(Box::new(convert_schema(tool, items, &format!("{}/items", path))?))
            }
            Some(_) => {
                return Err(AdapterError::schema(
                    tool,
                    format!("tuple 'items' at {} is not supported", path),
                ))
            }
        },
        enum_values: match object.get("enum") {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(values.clone()),
            Some(_) => {
                return Err(AdapterError::schema(
                    tool,
                    format!("'enum' at {} must be an array", path),
                ))
            }
        },
    })
}

fn optional_string(
    tool: &str,
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> AdapterResult<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Array(_)) if key == "type" => Err(AdapterError::schema(
            tool,
            format!("union types at {} are not supported", path),
        )),
        Some(_) => Err(AdapterError::schema(
            tool,
            format!("'{}' at {} must be a string", key, path),
        )),
    }
}

fn convert_properties(
    tool: &str,
    object: &Map<String, Value>,
    path: &str,
) -> AdapterResult<BTreeMap<String, ParameterSchema>> {
    match object.get("properties") {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(properties)) => properties
            .iter()
            .map(|(name, schema)| {
                let nested = format!("{}/properties/{}", path, name);
                convert_schema(tool, schema, &nested).map(|converted| (name.clone(), converted))
            })
            .collect(),
        Some(_) => Err(AdapterError::schema(
            tool,
            format!("'properties' at {} must be an object", path),
        )),
    }
}

fn convert_required(
    tool: &str,
    object: &Map<String, Value>,
    path: &str,
) -> AdapterResult<Vec<String>> {
    match object.get("required") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    AdapterError::schema(tool, format!("'required' at {} must list strings", path))
                })
            })
            .collect(),
        Some(_) => Err(AdapterError::schema(
            tool,
            format!("'required' at {} must be an array", path),
        )),
    }
}
