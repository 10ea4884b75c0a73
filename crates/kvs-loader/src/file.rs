//! Filesystem loader

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::ResourceLoader;
use crate::uri::ResourceUri;

/// Loads `file:` resources (and scheme-less paths) from the filesystem.
///
/// Relative paths resolve against the current working directory.
#[derive(Debug, Default)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceLoader for FileLoader {
    fn schemes(&self) -> &[&str] {
        &["file"]
    }

    fn fetch(&self, uri: &ResourceUri) -> Result<Vec<u8>> {
        read_file(uri.as_str(), &uri.to_native())
    }
}

/// Read a file, mapping a missing file (or a directory) to `NotFound`.
pub(crate) fn read_file(uri: &str, path: &Path) -> Result<Vec<u8>> {
    if path.is_dir() {
        return Err(Error::not_found(uri));
    }
    match fs::read(path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read resource file");
            Ok(bytes)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::not_found(uri)),
        Err(e) => Err(Error::io(path, e)),
    }
}
