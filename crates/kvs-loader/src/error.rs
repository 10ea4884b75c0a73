//! Error types for kvs-loader

use std::path::PathBuf;

/// Result type for kvs-loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching a resource
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resource does not exist. Callers may treat this as recoverable.
    #[error("Resource not found: {uri}")]
    NotFound { uri: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No loader registered for scheme '{scheme}' (uri: {uri})")]
    UnsupportedScheme { scheme: String, uri: String },

    #[error("Invalid resource uri '{uri}': {message}")]
    InvalidUri { uri: String, message: String },
}

impl Error {
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound { uri: uri.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error signals a missing resource rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
