//! TOML media

use serde_json::{Map, Number, Value};

use super::structured::flatten;
use crate::error::{Error, Result};
use crate::media::{Media, Pair, decode};

pub const MEDIA_TYPE: &str = "application/toml";

/// Media for TOML documents, flattened to dotted keys
#[derive(Debug, Default)]
pub struct TomlMedia;

impl TomlMedia {
    pub fn new() -> Self {
        Self
    }
}

impl Media for TomlMedia {
    fn media_type(&self) -> &str {
        MEDIA_TYPE
    }

    fn file_extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn parse(&self, input: &[u8]) -> Result<Vec<Pair>> {
        let source = decode(MEDIA_TYPE, input)?;
        let table: toml::Table =
            toml::from_str(source).map_err(|e| Error::parse(MEDIA_TYPE, e.to_string()))?;
        flatten(MEDIA_TYPE, to_json(toml::Value::Table(table)))
    }

    fn format(&self, entries: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut table = toml::Table::new();
        for (key, value) in entries {
            table.insert((*key).to_string(), toml::Value::String((*value).to_string()));
        }
        toml::to_string(&table)
            .map(String::into_bytes)
            .map_err(|e| Error::format(MEDIA_TYPE, e.to_string()))
    }
}

/// Convert a TOML value to JSON, keeping datetimes as their TOML text.
fn to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, to_json(v)))
                .collect::<Map<_, _>>(),
        ),
    }
}
