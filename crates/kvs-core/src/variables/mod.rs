//! Variable sources for interpolation
//!
//! A [`Variables`] implementation maps a name to a string. Sources compose
//! through [`ChainedVariables`]: the first layer that knows a name wins.

mod random;

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::key_values::KeyValues;
use crate::settings;

pub use random::{RANDOM_PREFIX, RandomVariables};

/// A pure name-to-value lookup
pub trait Variables: Send + Sync {
    fn get_value(&self, name: &str) -> Option<String>;
}

impl Variables for HashMap<String, String> {
    fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Variables for IndexMap<String, String> {
    fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Variables for KeyValues {
    fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

/// Process environment variables
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvVariables;

impl Variables for EnvVariables {
    fn get_value(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// The process-wide [`settings`](crate::settings) map
#[derive(Debug, Default, Clone, Copy)]
pub struct SettingsVariables;

impl Variables for SettingsVariables {
    fn get_value(&self, name: &str) -> Option<String> {
        settings::get(name)
    }
}

/// A caller-supplied literal map
#[derive(Debug, Default, Clone)]
pub struct MapVariables(IndexMap<String, String>);

impl MapVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Variables for MapVariables {
    fn get_value(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Variables backed by a closure
pub struct FnVariables<F>(F);

/// Wrap a closure as a variable source.
pub fn from_fn<F>(f: F) -> FnVariables<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    FnVariables(f)
}

impl<F> Variables for FnVariables<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn get_value(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

/// Ordered fallback over several variable sources
#[derive(Default)]
pub struct ChainedVariables {
    layers: Vec<Box<dyn Variables>>,
}

impl ChainedVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment, process-wide settings and generated `random.*` values,
    /// in that order.
    pub fn system() -> Self {
        Self::new()
            .then(EnvVariables)
            .then(SettingsVariables)
            .then(RandomVariables::new())
    }

    /// Append a layer consulted after all existing layers.
    pub fn then(mut self, layer: impl Variables + 'static) -> Self {
        self.push(layer);
        self
    }

    pub fn push(&mut self, layer: impl Variables + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Variables for ChainedVariables {
    fn get_value(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get_value(name))
    }
}

impl std::fmt::Debug for ChainedVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedVariables")
            .field("layers", &self.layers.len())
            .finish()
    }
}
