//! Flattening of structured documents into dotted key-value pairs

use serde_json::Value;

use crate::error::{Error, Result};
use crate::media::Pair;

/// Flatten a document root into ordered pairs.
///
/// Nested objects join keys with `.`, arrays append `[index]`. Scalars are
/// rendered as their plain string form and `null` becomes an empty string.
pub(crate) fn flatten(media_type: &str, root: Value) -> Result<Vec<Pair>> {
    match root {
        Value::Object(map) => {
            let mut pairs = Vec::new();
            for (key, value) in map {
                flatten_into(&mut pairs, key, value);
            }
            Ok(pairs)
        }
        Value::Null => Ok(Vec::new()),
        other => Err(Error::parse(
            media_type,
            format!("document root must be an object, found {}", kind(&other)),
        )),
    }
}

fn flatten_into(pairs: &mut Vec<Pair>, prefix: String, value: Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(pairs, format!("{prefix}.{key}"), child);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.into_iter().enumerate() {
                flatten_into(pairs, format!("{prefix}[{idx}]"), child);
            }
        }
        Value::String(s) => pairs.push((prefix, s)),
        Value::Null => pairs.push((prefix, String::new())),
        other => pairs.push((prefix, other.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
