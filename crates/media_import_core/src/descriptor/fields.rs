//! Field lookup helpers with an explicit missing-key policy.
//!
//! [`require`] treats a missing key as a validation failure, [`lookup`]
//! treats it as absent. The `as_*` converters check the JSON type of a
//! value that was found.

use serde_json::{Map, Value};

use crate::orchestrator::{ImportError, ImportResult};

/// Fetch a key that must be present.
pub fn require<'a>(fields: &'a Map<String, Value>, key: &str) -> ImportResult<&'a Value> {
    fields
        .get(key)
        .ok_or_else(|| ImportError::validation(format!("missing required field '{}'", key)))
}

/// Fetch a key that may be absent.
pub fn lookup<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key)
}

pub fn as_str<'a>(key: &str, value: &'a Value) -> ImportResult<&'a str> {
    value.as_str().ok_or_else(|| type_mismatch(key, "a string", value))
}

/// Integers only: floats, even whole ones, are rejected.
pub fn as_int(key: &str, value: &Value) -> ImportResult<i64> {
    value.as_i64().ok_or_else(|| type_mismatch(key, "an integer", value))
}

pub fn as_object<'a>(key: &str, value: &'a Value) -> ImportResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| type_mismatch(key, "an object", value))
}

pub fn as_array<'a>(key: &str, value: &'a Value) -> ImportResult<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| type_mismatch(key, "an array", value))
}

fn type_mismatch(key: &str, expected: &str, found: &Value) -> ImportError {
    ImportError::validation(format!(
        "field '{}' must be {}, found {}",
        key,
        expected,
        json_type_name(found)
    ))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a float",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
