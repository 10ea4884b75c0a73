//! The media contract and shared helpers

use crate::error::{Error, Result};

/// A raw `(key, value)` pair as produced by a media parser.
pub type Pair = (String, String);

/// Trait for media (format) implementations.
///
/// A media is stateless: `parse` must return pairs in document order and
/// keep duplicates, `format` must render every entry it is given, in order.
pub trait Media: Send + Sync {
    /// Canonical media type, e.g. `text/x-java-properties`
    fn media_type(&self) -> &str;

    /// File extensions (without the dot) that select this media
    fn file_extensions(&self) -> &[&str];

    /// Parse a byte stream into ordered raw pairs
    fn parse(&self, input: &[u8]) -> Result<Vec<Pair>>;

    /// Render ordered pairs back into a byte stream
    fn format(&self, entries: &[(&str, &str)]) -> Result<Vec<u8>>;

    /// Check if this media answers to the given media type or extension alias.
    fn matches(&self, name: &str) -> bool {
        self.media_type().eq_ignore_ascii_case(name)
            || self
                .file_extensions()
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(name))
    }
}

/// Decode input bytes as UTF-8, skipping a leading byte order mark.
pub(crate) fn decode<'a>(media_type: &str, input: &'a [u8]) -> Result<&'a str> {
    let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
    std::str::from_utf8(input).map_err(|source| Error::Encoding {
        media_type: media_type.to_string(),
        source,
    })
}

/// Get the file extension of the last path segment of a URI or path.
///
/// Query strings and fragments are ignored. Hidden files such as `.env`
/// report their name after the dot as the extension.
pub fn extension_of(uri: &str) -> Option<&str> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let name = path.rsplit(['/', '\\', ':']).next()?;
    let idx = name.rfind('.')?;
    let ext = &name[idx + 1..];
    if ext.is_empty() { None } else { Some(ext) }
}
