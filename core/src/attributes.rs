//! Flattening of JSON response bodies into attribute maps.
//!
//! # Design
//! Entities returned by the Gitea API differ in shape, so the client does not
//! deserialize into fixed structs. Instead every top-level field of a JSON
//! object becomes one `String -> String` entry:
//!
//! - strings are stored unquoted,
//! - numbers and booleans use their JSON notation (`42`, `true`),
//! - `null` is stored as the text `null`,
//! - nested arrays and objects are not flattened further; they are stored as
//!   their compact JSON text (`{"login":"alice"}`). Earlier clients stored an
//!   empty string for nested values; callers relying on that must check for
//!   JSON text instead.
//!
//! An attribute map is never empty. A document with no fields (or a `null`
//! document) is a parse error, not an empty map.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::GiteaError;

/// Flat, ordered `String -> String` view of one JSON object's top-level fields.
pub type AttributeMap = BTreeMap<String, String>;

/// Parse `body` as a single JSON object and flatten its fields.
pub fn parse_object(body: &str) -> Result<AttributeMap, GiteaError> {
    flatten(&parse_document(body)?)
}

/// Parse `body` as a collection of JSON objects.
///
/// An array root yields one map per element, in order; an empty array is a
/// valid, empty collection. Any other root degrades to a one-element
/// collection holding the root's attributes.
pub fn parse_collection(body: &str) -> Result<Vec<AttributeMap>, GiteaError> {
    match parse_document(body)? {
        Value::Array(items) => items.iter().map(flatten).collect(),
        other => Ok(vec![flatten(&other)?]),
    }
}

/// Parse `body` and flatten the top-level field called `name`.
///
/// Returns `Ok(None)` when the document has no such field. Only top-level
/// fields are looked up; `name` is never interpreted as a path.
pub fn parse_named_element(body: &str, name: &str) -> Result<Option<AttributeMap>, GiteaError> {
    let root = parse_document(body)?;
    root.get(name).map(flatten).transpose()
}

fn parse_document(body: &str) -> Result<Value, GiteaError> {
    if body.trim().is_empty() {
        return Err(GiteaError::Parse("response body is empty".to_string()));
    }
    let root: Value = serde_json::from_str(body)
        .map_err(|e| GiteaError::Parse(format!("invalid JSON document: {e}")))?;
    if root.is_null() {
        return Err(GiteaError::Parse("JSON document is null".to_string()));
    }
    Ok(root)
}

fn flatten(node: &Value) -> Result<AttributeMap, GiteaError> {
    let fields = match node {
        Value::Object(fields) => fields,
        Value::Null => return Err(GiteaError::Parse("JSON node is null".to_string())),
        other => {
            return Err(GiteaError::Parse(format!(
                "expected a JSON object, found {}",
                kind(other)
            )))
        }
    };
    if fields.is_empty() {
        return Err(GiteaError::Parse("JSON object has no attributes".to_string()));
    }
    Ok(fields
        .iter()
        .map(|(key, value)| (key.clone(), as_text(value)))
        .collect())
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
