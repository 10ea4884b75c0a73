//! Resource descriptors

use indexmap::IndexMap;

use crate::flags::{Flag, Flags};
use crate::key_value::NodeId;

/// Scheme used for the source URI of literal (caller-provided) entries
pub const PROVIDED_SCHEME: &str = "provided";

/// Parameter consulted for the media type when no explicit one is set
pub const MEDIA_TYPE_PARAMETER: &str = "mediaType";

/// Describes one configuration source. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    uri: String,
    name: Option<String>,
    flags: Flags,
    parameters: IndexMap<String, String>,
    media_type: Option<String>,
    reference: Option<NodeId>,
}

impl Resource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            flags: Flags::EMPTY,
            parameters: IndexMap::new(),
            media_type: None,
            reference: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub(crate) fn with_reference(mut self, reference: NodeId) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }

    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// The explicit media type, falling back to the `mediaType` parameter.
    pub fn media_type(&self) -> Option<&str> {
        self.media_type
            .as_deref()
            .or_else(|| self.parameter(MEDIA_TYPE_PARAMETER))
    }

    /// The directive entry that introduced this resource, `None` for roots.
    pub fn reference(&self) -> Option<NodeId> {
        self.reference
    }
}

/// One initial input to a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// A resource to fetch and parse
    Resource(Resource),
    /// Entries supplied directly by the caller, processed like a parsed
    /// resource with URI `provided:<name>`
    Literal {
        name: String,
        pairs: Vec<(String, String)>,
        flags: Flags,
    },
}

impl Seed {
    pub fn literal<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Seed::Literal {
            name: name.into(),
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            flags: Flags::EMPTY,
        }
    }

    /// Add flags to this seed.
    pub fn with_flags(self, extra: Flags) -> Self {
        match self {
            Seed::Resource(resource) => Seed::Resource(resource.with_flags(extra)),
            Seed::Literal { name, pairs, flags } => Seed::Literal {
                name,
                pairs,
                flags: flags.union(extra),
            },
        }
    }
}

impl From<Resource> for Seed {
    fn from(resource: Resource) -> Self {
        Seed::Resource(resource)
    }
}

impl From<&str> for Seed {
    fn from(uri: &str) -> Self {
        Seed::Resource(Resource::new(uri))
    }
}

impl From<String> for Seed {
    fn from(uri: String) -> Self {
        Seed::Resource(Resource::new(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let resource = Resource::new("classpath:/app.properties")
            .with_name("app")
            .with_flag(Flag::NoRequire)
            .with_flags(Flag::Sensitive.into())
            .with_parameter("k", "v");
        assert_eq!(resource.uri(), "classpath:/app.properties");
        assert_eq!(resource.name(), Some("app"));
        assert!(resource.has_flag(Flag::NoRequire));
        assert!(resource.has_flag(Flag::Sensitive));
        assert_eq!(resource.parameter("k"), Some("v"));
        assert_eq!(resource.reference(), None);
    }

    #[test]
    fn media_type_prefers_explicit_over_parameter() {
        let by_param = Resource::new("memory:x").with_parameter("mediaType", "json");
        assert_eq!(by_param.media_type(), Some("json"));
        let explicit = by_param.with_media_type("toml");
        assert_eq!(explicit.media_type(), Some("toml"));
    }

    #[test]
    fn seed_with_flags_applies_to_both_variants() {
        let seed = Seed::literal("defaults", [("a", "1")]).with_flags(Flag::NoAdd.into());
        assert!(matches!(seed, Seed::Literal { flags, .. } if flags.contains(Flag::NoAdd)));

        let seed = Seed::from("memory:x").with_flags(Flag::NoRequire.into());
        assert!(matches!(seed, Seed::Resource(r) if r.has_flag(Flag::NoRequire)));
    }
}
