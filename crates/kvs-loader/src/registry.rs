//! Registry that dispatches resource URIs to loaders by scheme

use std::collections::HashMap;
use std::sync::Arc;

use crate::classpath::ClasspathLoader;
use crate::error::{Error, Result};
use crate::file::FileLoader;
use crate::loader::ResourceLoader;
use crate::memory::MemoryLoader;
use crate::system::SystemLoader;
use crate::uri::ResourceUri;

/// Registry of resource loaders keyed by URI scheme.
///
/// Registering a loader for a scheme that is already taken replaces the
/// previous loader.
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn ResourceLoader>>,
}

impl LoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `file:`, `system:`, `memory:` (empty) and
    /// `classpath:` (no roots) loaders.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FileLoader::new()));
        registry.register(Arc::new(SystemLoader::new()));
        registry.register(Arc::new(MemoryLoader::new()));
        registry.register(Arc::new(ClasspathLoader::default()));
        registry
    }

    /// Register a loader for every scheme it declares.
    pub fn register(&mut self, loader: Arc<dyn ResourceLoader>) {
        for scheme in loader.schemes() {
            tracing::debug!(scheme = *scheme, "Registering resource loader");
            self.loaders
                .insert(scheme.to_ascii_lowercase(), Arc::clone(&loader));
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.register(Arc::new(loader));
        self
    }

    /// Get the loader for a scheme.
    pub fn get(&self, scheme: &str) -> Option<&dyn ResourceLoader> {
        self.loaders
            .get(&scheme.to_ascii_lowercase())
            .map(|l| &**l)
    }

    /// Check whether a scheme has a loader.
    pub fn supports(&self, scheme: &str) -> bool {
        self.get(scheme).is_some()
    }

    /// Fetch a resource through the loader registered for its scheme.
    pub fn fetch(&self, uri: &ResourceUri) -> Result<Vec<u8>> {
        let loader = self
            .get(uri.scheme())
            .ok_or_else(|| Error::UnsupportedScheme {
                scheme: uri.scheme().to_string(),
                uri: uri.as_str().to_string(),
            })?;
        loader.fetch(uri)
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_schemes() {
        let registry = LoaderRegistry::with_builtins();
        assert_eq!(registry.schemes(), vec!["classpath", "file", "memory", "system"]);
    }

    #[test]
    fn test_fetch_dispatches_by_scheme() {
        let registry =
            LoaderRegistry::with_builtins().with(MemoryLoader::new().with("a", "x=1"));
        let bytes = registry.fetch(&ResourceUri::parse("memory:a")).unwrap();
        assert_eq!(bytes, b"x=1");
    }

    #[test]
    fn test_unknown_scheme() {
        let registry = LoaderRegistry::with_builtins();
        let err = registry.fetch(&ResourceUri::parse("https://example.com/app")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme { ref scheme, .. } if scheme == "https"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_system_is_empty() {
        let registry = LoaderRegistry::with_builtins();
        assert!(registry.fetch(&ResourceUri::parse("system:")).unwrap().is_empty());
    }
}
