//! No-op `system:` loader

use crate::error::Result;
use crate::loader::ResourceLoader;
use crate::uri::ResourceUri;

/// Answers `system:` resources with empty content.
///
/// Process-level values are exposed through variables rather than parsed
/// content, so a `system:` resource only exists to carry directives and
/// flags without contributing entries of its own.
#[derive(Debug, Default)]
pub struct SystemLoader;

impl SystemLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceLoader for SystemLoader {
    fn schemes(&self) -> &[&str] {
        &["system"]
    }

    fn fetch(&self, uri: &ResourceUri) -> Result<Vec<u8>> {
        tracing::trace!(uri = %uri, "System resource yields no content");
        Ok(Vec::new())
    }
}
