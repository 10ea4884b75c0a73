//! Registry that selects media by media type or file extension

use std::sync::Arc;

use crate::handlers::{DotenvMedia, JsonMedia, PropertiesMedia, TomlMedia, YamlMedia};
use crate::media::{Media, extension_of};

/// Registry of the media available to a resolution.
///
/// Built explicitly at startup; later registrations take precedence over
/// earlier ones for the same media type or extension. The properties media
/// is always present and is the fallback when nothing else matches.
pub struct MediaRegistry {
    media: Vec<Arc<dyn Media>>,
    fallback: Arc<dyn Media>,
}

impl MediaRegistry {
    /// Create a registry holding only the default properties media.
    pub fn new() -> Self {
        let fallback: Arc<dyn Media> = Arc::new(PropertiesMedia::new());
        Self {
            media: vec![Arc::clone(&fallback)],
            fallback,
        }
    }

    /// Create a registry with all built-in media.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DotenvMedia::new()));
        registry.register(Arc::new(JsonMedia::new()));
        registry.register(Arc::new(TomlMedia::new()));
        registry.register(Arc::new(YamlMedia::new()));
        registry
    }

    /// Register a media implementation.
    pub fn register(&mut self, media: Arc<dyn Media>) {
        tracing::debug!(media_type = media.media_type(), "Registering media");
        self.media.push(media);
    }

    /// Find media by its exact media type (case-insensitive).
    pub fn by_media_type(&self, media_type: &str) -> Option<&dyn Media> {
        self.media
            .iter()
            .rev()
            .find(|m| m.media_type().eq_ignore_ascii_case(media_type))
            .map(|m| &**m)
    }

    /// Find media by file extension (without the dot, case-insensitive).
    pub fn by_extension(&self, ext: &str) -> Option<&dyn Media> {
        self.media
            .iter()
            .rev()
            .find(|m| m.file_extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|m| &**m)
    }

    /// Find media by a user-supplied name: media type first, then extension alias.
    pub fn by_name(&self, name: &str) -> Option<&dyn Media> {
        self.by_media_type(name).or_else(|| self.by_extension(name))
    }

    /// Sniff media from the extension of a URI or path.
    pub fn for_uri(&self, uri: &str) -> Option<&dyn Media> {
        extension_of(uri).and_then(|ext| self.by_extension(ext))
    }

    /// The default media used when nothing else applies.
    pub fn fallback(&self) -> &dyn Media {
        self.fallback.as_ref()
    }

    /// Iterate over registered media, most recently registered last.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Media> {
        self.media.iter().map(|m| &**m)
    }
}

impl Default for MediaRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for MediaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.media.iter().map(|m| m.media_type()))
            .finish()
    }
}
