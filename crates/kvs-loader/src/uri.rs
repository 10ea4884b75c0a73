//! Resource URI handling

use std::path::PathBuf;

/// Scheme assumed for URIs written as plain paths.
pub const DEFAULT_SCHEME: &str = "file";

/// A resource URI split into scheme and path.
///
/// The path portion is normalized to forward slashes. URIs without a
/// recognizable scheme (including Windows drive paths such as `C:\app`)
/// are treated as `file:` paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    raw: String,
    scheme: Option<String>,
    path: String,
}

impl ResourceUri {
    /// Parse a URI string.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (scheme, rest) = match raw.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) => (Some(scheme.to_ascii_lowercase()), rest),
            _ => (None, raw.as_str()),
        };

        // `file:///etc/app` has an empty authority
        let rest = match rest.strip_prefix("//") {
            Some(stripped) if stripped.starts_with('/') => stripped,
            _ => rest,
        };

        let path = rest.replace('\\', "/");
        Self { raw, scheme, path }
    }

    /// The URI exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The lowercased scheme, or [`DEFAULT_SCHEME`] when none was written.
    pub fn scheme(&self) -> &str {
        self.scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    /// Whether the URI carried an explicit scheme.
    pub fn has_scheme(&self) -> bool {
        self.scheme.is_some()
    }

    /// The scheme-specific part, normalized to forward slashes.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Convert the path to a platform-native `PathBuf` for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

impl std::fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for ResourceUri {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ResourceUri {
    fn from(s: String) -> Self {
        Self::parse(s)
    }
}

/// RFC 3986 scheme syntax, requiring at least two characters so that
/// drive letters are not mistaken for schemes.
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    candidate.len() > 1
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("classpath:/app.properties", "classpath", "/app.properties")]
    #[case("file:///etc/app.toml", "file", "/etc/app.toml")]
    #[case("file:relative/app.env", "file", "relative/app.env")]
    #[case("/etc/app.json", "file", "/etc/app.json")]
    #[case("C:\\config\\app.properties", "file", "C:/config/app.properties")]
    #[case("MEMORY:defaults", "memory", "defaults")]
    #[case("system:", "system", "")]
    #[case("profile.classpath:/app-__PROFILE__.properties", "profile.classpath", "/app-__PROFILE__.properties")]
    fn test_parse(#[case] raw: &str, #[case] scheme: &str, #[case] path: &str) {
        let uri = ResourceUri::parse(raw);
        assert_eq!(uri.scheme(), scheme);
        assert_eq!(uri.path(), path);
        assert_eq!(uri.as_str(), raw);
    }

    #[test]
    fn test_has_scheme() {
        assert!(ResourceUri::parse("file:/x").has_scheme());
        assert!(!ResourceUri::parse("/x").has_scheme());
    }
}
