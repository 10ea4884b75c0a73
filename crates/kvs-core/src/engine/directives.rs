//! Directive keys embedded in resource content
//!
//! - `_load_<name>=<uri>` introduces a child resource
//! - `_flags_<name>=<flag>,<flag>` sets the child's flags
//! - `_param_<name>_<key>=<value>` sets a child parameter
//! - `_mediatype_<name>=<media>` overrides the child's media
//!
//! A `_load_` value starting with `profile.` is a template expanded once per
//! active profile, with `__PROFILE__` replaced by the profile name.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::key_value::{KeyValue, NodeId};
use crate::resource::Resource;

pub const LOAD_PREFIX: &str = "_load_";
pub const FLAGS_PREFIX: &str = "_flags_";
pub const PARAM_PREFIX: &str = "_param_";
pub const MEDIATYPE_PREFIX: &str = "_mediatype_";
pub const PROFILE_PREFIX: &str = "profile.";
pub const PROFILE_PLACEHOLDER: &str = "__PROFILE__";

/// Parameter set on every profile child
pub const PROFILE_PARAMETER: &str = "profile";

const PREFIXES: [&str; 4] = [LOAD_PREFIX, FLAGS_PREFIX, PARAM_PREFIX, MEDIATYPE_PREFIX];

pub fn is_directive(key: &str) -> bool {
    PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Everything a resource declared about one named child
#[derive(Debug, Clone, Default)]
pub(super) struct ChildDecl {
    name: String,
    flags: Flags,
    parameters: IndexMap<String, String>,
    media_type: Option<String>,
}

impl ChildDecl {
    /// Build the child resource for `uri`, introduced by directive node `reference`.
    pub(super) fn build(&self, uri: impl Into<String>, reference: NodeId) -> Resource {
        let mut child = Resource::new(uri)
            .with_name(self.name.clone())
            .with_flags(self.flags)
            .with_reference(reference);
        for (key, value) in &self.parameters {
            child = child.with_parameter(key.clone(), value.clone());
        }
        if let Some(media_type) = &self.media_type {
            child = child.with_media_type(media_type.clone());
        }
        child
    }
}

/// The child declarations of one resource, keyed by name
#[derive(Debug, Default)]
pub(super) struct Directives {
    children: IndexMap<String, ChildDecl>,
}

impl Directives {
    pub(super) fn child(&self, name: &str) -> Option<&ChildDecl> {
        self.children.get(name)
    }

    pub(super) fn len(&self) -> usize {
        self.children.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Collect the directives among `entries`.
    ///
    /// `resource` describes the resource being scanned and is only used in
    /// error messages.
    pub(super) fn scan(entries: &[KeyValue], resource: &str) -> Result<Self> {
        let invalid = |key: &str, message: &str| Error::InvalidDirective {
            key: key.to_string(),
            resource: resource.to_string(),
            message: message.to_string(),
        };

        let mut directives = Directives::default();

        for kv in entries.iter().filter(|kv| is_directive(kv.key())) {
            if kv.raw().trim().is_empty() {
                return Err(invalid(kv.key(), "directive value is blank"));
            }
        }

        for kv in entries {
            let Some(name) = kv.key().strip_prefix(LOAD_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                return Err(invalid(kv.key(), "missing resource name"));
            }
            if directives.children.contains_key(name) {
                return Err(invalid(kv.key(), "resource name is loaded more than once"));
            }
            directives.children.insert(
                name.to_string(),
                ChildDecl {
                    name: name.to_string(),
                    ..ChildDecl::default()
                },
            );
        }

        for kv in entries {
            let key = kv.key();
            if let Some(name) = key.strip_prefix(FLAGS_PREFIX) {
                let flags = Flags::parse_list(kv.raw())?;
                let child = directives
                    .children
                    .get_mut(name)
                    .ok_or_else(|| invalid(key, "no matching _load_ directive"))?;
                child.flags = child.flags.union(flags);
            } else if let Some(name) = key.strip_prefix(MEDIATYPE_PREFIX) {
                let child = directives
                    .children
                    .get_mut(name)
                    .ok_or_else(|| invalid(key, "no matching _load_ directive"))?;
                child.media_type = Some(kv.raw().trim().to_string());
            } else if let Some(rest) = key.strip_prefix(PARAM_PREFIX) {
                let (name, param) = directives
                    .split_param(rest)
                    .ok_or_else(|| invalid(key, "no matching _load_ directive"))?;
                let Some(child) = directives.children.get_mut(&name) else {
                    return Err(invalid(key, "no matching _load_ directive"));
                };
                child.parameters.insert(param, kv.raw().to_string());
            }
        }

        Ok(directives)
    }

    /// Split `<name>_<key>` using the longest declared child name that matches.
    fn split_param(&self, rest: &str) -> Option<(String, String)> {
        self.children
            .keys()
            .filter_map(|name| {
                let param = rest.strip_prefix(name.as_str())?.strip_prefix('_')?;
                (!param.is_empty()).then(|| (name.clone(), param.to_string()))
            })
            .max_by_key(|(name, _)| name.len())
    }
}
