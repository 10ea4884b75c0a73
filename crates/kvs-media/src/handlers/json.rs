//! JSON media

use serde_json::{Map, Value};

use super::structured::flatten;
use crate::error::{Error, Result};
use crate::media::{Media, Pair, decode};

pub const MEDIA_TYPE: &str = "application/json";

/// Media for JSON documents, flattened to dotted keys
#[derive(Debug, Default)]
pub struct JsonMedia;

impl JsonMedia {
    pub fn new() -> Self {
        Self
    }
}

impl Media for JsonMedia {
    fn media_type(&self) -> &str {
        MEDIA_TYPE
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, input: &[u8]) -> Result<Vec<Pair>> {
        let source = decode(MEDIA_TYPE, input)?;
        if source.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: Value =
            serde_json::from_str(source).map_err(|e| Error::parse(MEDIA_TYPE, e.to_string()))?;
        flatten(MEDIA_TYPE, value)
    }

    fn format(&self, entries: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert((*key).to_string(), Value::String((*value).to_string()));
        }
        let mut out = serde_json::to_vec_pretty(&Value::Object(map))
            .map_err(|e| Error::format(MEDIA_TYPE, e.to_string()))?;
        out.push(b'\n');
        Ok(out)
    }
}
