//! YAML media

use serde_json::{Map, Number, Value};
use serde_yaml::Mapping;

use super::structured::flatten;
use crate::error::{Error, Result};
use crate::media::{Media, Pair, decode};

pub const MEDIA_TYPE: &str = "application/yaml";

/// Media for YAML documents, flattened to dotted keys
#[derive(Debug, Default)]
pub struct YamlMedia;

impl YamlMedia {
    pub fn new() -> Self {
        Self
    }
}

impl Media for YamlMedia {
    fn media_type(&self) -> &str {
        MEDIA_TYPE
    }

    fn file_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(&self, input: &[u8]) -> Result<Vec<Pair>> {
        let source = decode(MEDIA_TYPE, input)?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(source).map_err(|e| Error::parse(MEDIA_TYPE, e.to_string()))?;
        flatten(MEDIA_TYPE, to_json(value))
    }

    fn format(&self, entries: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut mapping = Mapping::new();
        for (key, value) in entries {
            mapping.insert(
                serde_yaml::Value::String((*key).to_string()),
                serde_yaml::Value::String((*value).to_string()),
            );
        }
        serde_yaml::to_string(&mapping)
            .map(String::into_bytes)
            .map_err(|e| Error::format(MEDIA_TYPE, e.to_string()))
    }
}

fn to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (key_string(k), to_json(v)))
                .collect::<Map<_, _>>(),
        ),
        serde_yaml::Value::Tagged(tagged) => to_json(tagged.value),
    }
}

fn key_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
