use serde_json::Value;

use crate::record::{FieldValue, NOT_FOUND};

/// Walk `path` through nested objects. Missing keys, non-object
/// intermediates and JSON `null` all yield `None`.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, key| node.as_object()?.get(*key))
        .filter(|v| !v.is_null())
}

/// String at `path`, or [`NOT_FOUND`] for anything else.
pub fn text_at(value: &Value, path: &[&str]) -> String {
    match lookup(value, path) {
        Some(Value::String(s)) => s.clone(),
        _ => NOT_FOUND.to_string(),
    }
}

/// String or number at `path`.
pub fn scalar_at(value: &Value, path: &[&str]) -> FieldValue {
    match lookup(value, path) {
        Some(Value::String(s)) => FieldValue::Text(s.clone()),
        Some(Value::Number(n)) => FieldValue::Number(n.clone()),
        _ => FieldValue::NotFound,
    }
}
