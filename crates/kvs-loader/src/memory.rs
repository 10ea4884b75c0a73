//! In-memory loader

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::loader::ResourceLoader;
use crate::uri::ResourceUri;

/// Loads `memory:` resources from a map of named byte buffers.
///
/// Names are matched against the URI path with any leading `/` removed,
/// so `memory:defaults` and `memory:/defaults` are the same resource.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named resource, replacing any previous content.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        let name = name.into();
        let key = name.trim_start_matches('/').to_string();
        self.entries.insert(key, content.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceLoader for MemoryLoader {
    fn schemes(&self) -> &[&str] {
        &["memory"]
    }

    fn fetch(&self, uri: &ResourceUri) -> Result<Vec<u8>> {
        let name = uri.path().trim_start_matches('/');
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(uri.as_str()))
    }
}
