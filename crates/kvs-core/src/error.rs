//! Error types for kvs-core

/// Result type for kvs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration
///
/// Resource-level errors carry the full provenance chain of the resource
/// (`resource X <-- specified with key K in uri Y <-- ...`) so the offending
/// source can be located from the message alone.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required resource could not be found
    #[error("Resource not found: {resource}")]
    ResourceNotFound { resource: String },

    /// A resource was found but could not be read or parsed
    #[error("Failed to load {resource}: {message}")]
    Load { resource: String, message: String },

    /// An explicit media type names no registered media
    #[error("Unknown media type '{media_type}' for {resource}")]
    UnknownMediaType { media_type: String, resource: String },

    /// No loader is registered for the resource's scheme
    #[error("No loader for scheme '{scheme}' needed by {resource}")]
    UnsupportedScheme { scheme: String, resource: String },

    /// A `_load_`, `_flags_`, `_param_` or `_mediatype_` key is malformed
    #[error("Invalid directive '{key}' in {resource}: {message}")]
    InvalidDirective {
        key: String,
        resource: String,
        message: String,
    },

    /// A flag token is not recognized
    #[error("Unknown flag '{token}'")]
    UnknownFlag { token: String },

    /// A value could not be interpolated
    #[error(
        "Failed to interpolate key '{key}' (raw value '{raw}'): {message}{}",
        located(.location)
    )]
    Interpolation {
        key: String,
        raw: String,
        message: String,
        location: Option<String>,
    },

    /// A placeholder names a variable that cannot be resolved and has no default
    #[error(
        "Missing variable '{name}' interpolating key '{key}' (raw value '{raw}'){}",
        located(.location)
    )]
    MissingVariable {
        key: String,
        raw: String,
        name: String,
        location: Option<String>,
    },

    /// Substitution refers back to a variable that is already being expanded
    #[error(
        "Recursive substitution of variable '{name}' interpolating key '{key}' (raw value '{raw}'){}",
        located(.location)
    )]
    Recursion {
        key: String,
        raw: String,
        name: String,
        location: Option<String>,
    },

    /// Media error while formatting a result
    #[error(transparent)]
    Media(#[from] kvs_media::Error),
}

fn located(location: &Option<String>) -> String {
    location
        .as_ref()
        .map(|l| format!(" at {l}"))
        .unwrap_or_default()
}

impl Error {
    /// Check if this is one of the interpolation failures
    /// (generic, missing variable or recursion).
    pub fn is_interpolation(&self) -> bool {
        matches!(
            self,
            Self::Interpolation { .. } | Self::MissingVariable { .. } | Self::Recursion { .. }
        )
    }

    /// Check if this error reports a missing required resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Attach the provenance of the entry being interpolated and, for
    /// sensitive entries, hide the raw value.
    pub(crate) fn locate(mut self, at: String, sensitive: bool) -> Self {
        if let Self::Interpolation { raw, location, .. }
        | Self::MissingVariable { raw, location, .. }
        | Self::Recursion { raw, location, .. } = &mut self
        {
            *location = Some(at);
            if sensitive {
                *raw = crate::key_values::REDACTED.to_string();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_display_names_variable() {
        let err = Error::MissingVariable {
            key: "blah".into(),
            raw: "${MISSING}".into(),
            name: "MISSING".into(),
            location: None,
        };
        let display = err.to_string();
        assert!(display.contains("'MISSING'"), "got: {display}");
        assert!(display.contains("'blah'"), "got: {display}");
        assert!(err.is_interpolation());
    }

    #[test]
    fn locate_appends_location_and_redacts() {
        let err = Error::Recursion {
            key: "a".into(),
            raw: "${b}".into(),
            name: "b".into(),
            location: None,
        }
        .locate("memory:app index 1".into(), true);
        let display = err.to_string();
        assert!(display.ends_with(" at memory:app index 1"), "got: {display}");
        assert!(display.contains("REDACTED"), "got: {display}");
        assert!(!display.contains("${b}"), "got: {display}");
    }

    #[test]
    fn locate_ignores_non_interpolation_errors() {
        let err = Error::ResourceNotFound {
            resource: "resource memory:x".into(),
        }
        .locate("elsewhere".into(), false);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Resource not found: resource memory:x");
    }
}
