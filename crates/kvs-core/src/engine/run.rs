//! A single resolution run

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use kvs_loader::ResourceUri;
use kvs_media::Media;

use super::directives::{
    self, ChildDecl, Directives, LOAD_PREFIX, PROFILE_PARAMETER, PROFILE_PLACEHOLDER, PROFILE_PREFIX,
};
use super::{Engine, MediaPrecedence};
use crate::error::{Error, Result};
use crate::flags::Flag;
use crate::interpolate::Interpolator;
use crate::key_value::{KeyValue, NodeId, Provenance, Source};
use crate::key_values::KeyValues;
use crate::resource::{PROVIDED_SCHEME, Resource, Seed};

/// Mutable state of one [`Engine::load`] call. Never shared.
pub(super) struct Run<'e> {
    engine: &'e Engine,
    interpolator: Interpolator<'e>,
    provenance: Provenance,
    entries: Vec<KeyValue>,
    /// Last-wins view of `entries`, the variables visible to the next entry
    view: HashMap<String, String>,
    /// URIs of the resources currently being processed, outermost first
    ancestors: Vec<String>,
    /// URIs of the root resources seeded so far
    roots: HashSet<String>,
}

impl<'e> Run<'e> {
    pub(super) fn new(engine: &'e Engine) -> Self {
        let interpolator = Interpolator::new(engine.variables())
            .with_max_depth(engine.config().max_interpolation_depth);
        Self {
            engine,
            interpolator,
            provenance: Provenance::new(),
            entries: Vec::new(),
            view: HashMap::new(),
            ancestors: Vec::new(),
            roots: HashSet::new(),
        }
    }

    pub(super) fn seed(&mut self, seed: Seed) -> Result<()> {
        match seed {
            Seed::Resource(resource) => {
                self.claim_root(&resource)?;
                self.process(resource)
            }
            Seed::Literal { name, pairs, flags } => {
                let resource = Resource::new(format!("{PROVIDED_SCHEME}:{name}"))
                    .with_name(name)
                    .with_flags(flags);
                self.claim_root(&resource)?;
                self.accept(&resource, pairs)
            }
        }
    }

    fn claim_root(&mut self, resource: &Resource) -> Result<()> {
        if self.roots.insert(resource.uri().to_string()) {
            Ok(())
        } else {
            Err(Error::Load {
                resource: self.describe(resource),
                message: "resource is seeded more than once".to_string(),
            })
        }
    }

    pub(super) fn finish(self) -> KeyValues {
        KeyValues::from_parts(self.entries, self.provenance)
    }

    fn describe(&self, resource: &Resource) -> String {
        self.provenance.describe_resource(resource.uri(), resource.reference())
    }

    /// Fetch, parse and accept one resource.
    fn process(&mut self, resource: Resource) -> Result<()> {
        if self.ancestors.iter().any(|uri| uri == resource.uri()) {
            return Err(Error::Load {
                resource: self.describe(&resource),
                message: "resource loads itself through its own children".to_string(),
            });
        }

        let Some(bytes) = self.fetch(&resource)? else {
            return Ok(());
        };
        let media = self.select_media(&resource)?;
        let pairs = media.parse(&bytes).map_err(|err| Error::Load {
            resource: self.describe(&resource),
            message: if resource.has_flag(Flag::Sensitive) {
                format!("content is not valid {}", media.media_type())
            } else {
                err.to_string()
            },
        })?;
        tracing::debug!(
            uri = %resource.uri(),
            media = media.media_type(),
            entries = pairs.len(),
            "Parsed resource"
        );

        self.ancestors.push(resource.uri().to_string());
        let accepted = self.accept(&resource, pairs);
        self.ancestors.pop();
        accepted
    }

    /// Fetch the content of `resource`; `None` when an optional resource is missing.
    fn fetch(&self, resource: &Resource) -> Result<Option<Vec<u8>>> {
        let uri = ResourceUri::parse(resource.uri());
        match self.engine.loaders().fetch(&uri) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.is_not_found() => {
                if resource.has_flag(Flag::NoRequire) {
                    tracing::info!(uri = %resource.uri(), "Skipping optional resource that was not found");
                    Ok(None)
                } else {
                    Err(Error::ResourceNotFound {
                        resource: self.describe(resource),
                    })
                }
            }
            Err(kvs_loader::Error::UnsupportedScheme { scheme, .. }) => Err(Error::UnsupportedScheme {
                scheme,
                resource: self.describe(resource),
            }),
            Err(err) => Err(Error::Load {
                resource: self.describe(resource),
                message: err.to_string(),
            }),
        }
    }

    /// Explicit media type, else URI extension, else the fallback. When both
    /// are present and disagree the configured precedence decides.
    fn select_media(&self, resource: &Resource) -> Result<&'e dyn Media> {
        let registry = self.engine.media();
        let explicit = resource
            .media_type()
            .map(|name| {
                registry.by_name(name).ok_or_else(|| Error::UnknownMediaType {
                    media_type: name.to_string(),
                    resource: self.describe(resource),
                })
            })
            .transpose()?;
        let sniffed = registry.for_uri(resource.uri());

        Ok(match (explicit, sniffed) {
            (Some(explicit), Some(sniffed)) if explicit.media_type() != sniffed.media_type() => {
                let precedence = self.engine.config().media_precedence;
                tracing::warn!(
                    uri = %resource.uri(),
                    declared = explicit.media_type(),
                    extension = sniffed.media_type(),
                    ?precedence,
                    "Declared media type conflicts with the resource extension"
                );
                match precedence {
                    MediaPrecedence::Explicit => explicit,
                    MediaPrecedence::Extension => sniffed,
                }
            }
            (Some(explicit), _) => explicit,
            (None, Some(sniffed)) => sniffed,
            (None, None) => registry.fallback(),
        })
    }

    /// Number the parsed pairs, resolve directives and accumulate entries.
    fn accept(&mut self, resource: &Resource, pairs: Vec<(String, String)>) -> Result<()> {
        if pairs.is_empty() && resource.has_flag(Flag::NoEmpty) {
            return Err(Error::Load {
                resource: self.describe(resource),
                message: "resource has no entries".to_string(),
            });
        }

        let entries: Vec<KeyValue> = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (key, value))| {
                let source = Source {
                    uri: resource.uri().to_string(),
                    reference: resource.reference(),
                    index: idx + 1,
                };
                KeyValue::new(key, value, source, resource.flags())
            })
            .collect();

        let declared = if resource.has_flag(Flag::NoLoadChildren) {
            Directives::default()
        } else {
            Directives::scan(&entries, &self.describe(resource))?
        };
        if !declared.is_empty() {
            tracing::debug!(uri = %resource.uri(), children = declared.len(), "Found load directives");
        }

        let add = !resource.has_flag(Flag::NoAdd);
        for kv in entries {
            if let Some(name) = kv.key().strip_prefix(LOAD_PREFIX) {
                if let Some(child) = declared.child(name) {
                    self.load_child(resource, &kv, child)?;
                }
            } else if directives::is_directive(kv.key()) {
                continue;
            } else if add {
                self.append(kv)?;
            }
        }
        Ok(())
    }

    /// Resolve the child declared by directive `kv` of `parent`.
    fn load_child(&mut self, parent: &Resource, kv: &KeyValue, child: &ChildDecl) -> Result<()> {
        let target = if parent.has_flag(Flag::NoInterpolate) {
            kv.raw().to_string()
        } else {
            self.interpolate(kv)?
        };
        let node = self.provenance.push(kv.with_expanded(target.as_str()));

        match target.strip_prefix(PROFILE_PREFIX) {
            Some(template) => self.load_profiles(parent, kv, template, child, node),
            None => self.process(child.build(target.as_str(), node)),
        }
    }

    /// Expand a `profile.` template once per active profile.
    fn load_profiles(
        &mut self,
        parent: &Resource,
        kv: &KeyValue,
        template: &str,
        child: &ChildDecl,
        node: NodeId,
    ) -> Result<()> {
        if !template.contains(PROFILE_PLACEHOLDER) {
            return Err(Error::InvalidDirective {
                key: kv.key().to_string(),
                resource: self.describe(parent),
                message: format!("profile template has no {PROFILE_PLACEHOLDER} placeholder"),
            });
        }

        let variable = &self.engine.config().profile_variable;
        let active = self
            .interpolator
            .interpolate(kv.key(), &format!("${{{variable}:-}}"), &self.view)
            .map_err(|err| err.locate(self.provenance.describe_source(kv.source()), false))?;

        let profiles: IndexSet<&str> = active
            .split(',')
            .map(str::trim)
            .filter(|profile| !profile.is_empty())
            .collect();
        if profiles.is_empty() {
            tracing::debug!(key = kv.key(), "No active profiles");
        }

        for profile in profiles {
            let uri = template.replace(PROFILE_PLACEHOLDER, profile);
            tracing::debug!(profile, uri = %uri, key = kv.key(), "Loading profile resource");
            let resource = child
                .build(uri, node)
                .with_flag(Flag::NoRequire)
                .with_parameter(PROFILE_PARAMETER, profile);
            self.process(resource)?;
        }
        Ok(())
    }

    /// Interpolate `kv` against everything accumulated before it.
    fn interpolate(&self, kv: &KeyValue) -> Result<String> {
        self.interpolator
            .interpolate(kv.key(), kv.raw(), &self.view)
            .map_err(|err| err.locate(self.provenance.describe_source(kv.source()), kv.is_sensitive()))
    }

    fn append(&mut self, kv: KeyValue) -> Result<()> {
        let kv = if kv.flags().contains(Flag::NoInterpolate) {
            kv
        } else {
            let expanded = self.interpolate(&kv)?;
            kv.with_expanded(expanded)
        };
        self.view.insert(kv.key().to_string(), kv.expanded().to_string());
        self.entries.push(kv);
        Ok(())
    }
}
