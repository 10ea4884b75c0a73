//! Resolution engine
//!
//! The [`Engine`] turns an ordered list of [`Seed`]s into one [`KeyValues`]:
//! every resource is fetched through the [`LoaderRegistry`], parsed through
//! the [`MediaRegistry`], scanned for directives that introduce further
//! resources, and its entries are accumulated and interpolated in order.
//! Children are resolved depth-first at the position of the directive that
//! declared them.

pub mod directives;
mod run;

use std::fmt;

use kvs_loader::{LoaderRegistry, ResourceLoader};
use kvs_media::MediaRegistry;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interpolate::DEFAULT_MAX_DEPTH;
use crate::key_values::KeyValues;
use crate::resource::Seed;
use crate::variables::{ChainedVariables, EnvVariables, MapVariables, RandomVariables, SettingsVariables, Variables};

use self::run::Run;

/// Variable holding the comma-separated list of active profiles
pub const DEFAULT_PROFILE_VARIABLE: &str = "profiles";

/// Which media wins when a resource declares a media type that differs from
/// the one its URI extension suggests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPrecedence {
    /// The declared media type wins
    #[default]
    Explicit,
    /// A recognized extension wins
    Extension,
}

/// Tunables of a resolution run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the variable listing active profiles
    pub profile_variable: String,

    pub media_precedence: MediaPrecedence,

    /// Bound on nested placeholder substitution
    pub max_interpolation_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile_variable: DEFAULT_PROFILE_VARIABLE.to_string(),
            media_precedence: MediaPrecedence::default(),
            max_interpolation_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Resolves layered configuration. Immutable once built and shareable
/// across threads; each call to [`load`](Self::load) is an independent run.
pub struct Engine {
    media: MediaRegistry,
    loaders: LoaderRegistry,
    variables: Box<dyn Variables>,
    config: EngineConfig,
}

impl Engine {
    /// An engine with the built-in media, loaders and system variables.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Resolve `seeds`, in order, into a single result.
    ///
    /// Fails on the first missing required resource, unreadable content,
    /// malformed directive or interpolation error; there is no partial result.
    pub fn load<I>(&self, seeds: I) -> Result<KeyValues>
    where
        I: IntoIterator,
        I::Item: Into<Seed>,
    {
        let mut run = Run::new(self);
        for seed in seeds {
            run.seed(seed.into())?;
        }
        let key_values = run.finish();
        tracing::debug!(
            entries = key_values.len(),
            resources = key_values.provenance().len(),
            "Resolution complete"
        );
        Ok(key_values)
    }

    pub fn media(&self) -> &MediaRegistry {
        &self.media
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    /// The external variable layers consulted during interpolation
    pub fn variables(&self) -> &dyn Variables {
        self.variables.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("media", &self.media)
            .field("loaders", &self.loaders.schemes())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Engine`]
///
/// Variable layers added with [`variables`](Self::variables) are consulted
/// first, in the order added, followed by the environment, the process-wide
/// settings and `random.*` values unless
/// [`without_system_variables`](Self::without_system_variables) is used.
pub struct EngineBuilder {
    media: MediaRegistry,
    loaders: LoaderRegistry,
    layers: ChainedVariables,
    system_variables: bool,
    profiles: Option<Vec<String>>,
    config: EngineConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            media: MediaRegistry::with_builtins(),
            loaders: LoaderRegistry::with_builtins(),
            layers: ChainedVariables::new(),
            system_variables: true,
            profiles: None,
            config: EngineConfig::default(),
        }
    }
}

impl EngineBuilder {
    /// Replace the media registry.
    pub fn media(mut self, media: MediaRegistry) -> Self {
        self.media = media;
        self
    }

    /// Replace the loader registry.
    pub fn loaders(mut self, loaders: LoaderRegistry) -> Self {
        self.loaders = loaders;
        self
    }

    /// Register one more loader, replacing any loader for the same schemes.
    pub fn loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loaders = self.loaders.with(loader);
        self
    }

    /// Add a variable layer.
    pub fn variables(mut self, layer: impl Variables + 'static) -> Self {
        self.layers.push(layer);
        self
    }

    /// Set the active profiles, overriding any other source of the
    /// profile variable.
    pub fn profiles<S: Into<String>>(mut self, profiles: impl IntoIterator<Item = S>) -> Self {
        self.profiles = Some(profiles.into_iter().map(Into::into).collect());
        self
    }

    /// Consult only the layers added explicitly.
    pub fn without_system_variables(mut self) -> Self {
        self.system_variables = false;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Engine {
        let mut variables = ChainedVariables::new();
        if let Some(profiles) = self.profiles {
            variables.push(
                MapVariables::new().with(self.config.profile_variable.clone(), profiles.join(",")),
            );
        }
        variables.push(self.layers);
        if self.system_variables {
            variables.push(EnvVariables);
            variables.push(SettingsVariables);
            variables.push(RandomVariables::new());
        }

        Engine {
            media: self.media,
            loaders: self.loaders,
            variables: Box::new(variables),
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.profile_variable, "profiles");
        assert_eq!(config.media_precedence, MediaPrecedence::Explicit);
        assert_eq!(config.max_interpolation_depth, 32);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"media_precedence": "extension"}"#).unwrap();
        assert_eq!(config.media_precedence, MediaPrecedence::Extension);
        assert_eq!(config.profile_variable, "profiles");
    }

    #[test]
    fn explicit_layers_precede_system_layers() {
        let engine = Engine::builder()
            .variables(MapVariables::new().with("PATH", "overridden"))
            .build();
        assert_eq!(engine.variables().get_value("PATH").as_deref(), Some("overridden"));
        assert!(engine.variables().get_value("random.uuid").is_some());
    }

    #[test]
    fn profiles_use_configured_variable() {
        let engine = Engine::builder()
            .config(EngineConfig {
                profile_variable: "active".to_string(),
                ..EngineConfig::default()
            })
            .profiles(["dev", "local"])
            .without_system_variables()
            .build();
        assert_eq!(engine.variables().get_value("active").as_deref(), Some("dev,local"));
        assert_eq!(engine.variables().get_value("random.uuid"), None);
    }
}
