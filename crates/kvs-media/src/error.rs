//! Error types for kvs-media

/// Result type for kvs-media operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or rendering media
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {media_type} content: {message}")]
    Parse { media_type: String, message: String },

    #[error("Failed to format {media_type} content: {message}")]
    Format { media_type: String, message: String },

    #[error("Content is not valid UTF-8 for {media_type}: {source}")]
    Encoding {
        media_type: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl Error {
    pub fn parse(media_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            media_type: media_type.into(),
            message: message.into(),
        }
    }

    pub fn format(media_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            media_type: media_type.into(),
            message: message.into(),
        }
    }
}
