//! Stable and reloadable configuration holders
//!
//! A [`Snapshot`] is the immutable result of one resolution. A
//! [`ReloadableConfig`] keeps the engine and seeds around so the whole
//! resolution can be repeated, and atomically swaps in the new snapshot.
//! Readers holding an older snapshot keep seeing it unchanged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use crate::engine::Engine;
use crate::error::Result;
use crate::key_values::KeyValues;
use crate::resource::Seed;

/// An immutable, shareable resolution result
#[derive(Debug, Clone)]
pub struct Snapshot {
    key_values: Arc<KeyValues>,
    generation: u64,
}

impl Snapshot {
    pub fn new(key_values: KeyValues) -> Self {
        Self {
            key_values: Arc::new(key_values),
            generation: 0,
        }
    }

    pub fn key_values(&self) -> &KeyValues {
        &self.key_values
    }

    /// How many successful reloads preceded this snapshot
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values.get(key)
    }
}

/// Configuration that can be resolved again on demand
pub struct ReloadableConfig {
    engine: Arc<Engine>,
    seeds: Vec<Seed>,
    current: ArcSwap<Snapshot>,
    generation: AtomicU64,
}

impl ReloadableConfig {
    /// Resolve `seeds` for the first time.
    pub fn load<I>(engine: Arc<Engine>, seeds: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Seed>,
    {
        let seeds: Vec<Seed> = seeds.into_iter().map(Into::into).collect();
        let key_values = engine.load(seeds.iter().cloned())?;
        Ok(Self {
            engine,
            seeds,
            current: ArcSwap::from_pointee(Snapshot::new(key_values)),
            generation: AtomicU64::new(0),
        })
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Look up a key in the current snapshot.
    pub fn get(&self, key: &str) -> Option<String> {
        self.current.load().get(key).map(str::to_string)
    }

    /// Discard the current result and resolve everything again.
    ///
    /// On failure the current snapshot stays in place and the error is returned.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        let key_values = match self.engine.load(self.seeds.iter().cloned()) {
            Ok(key_values) => key_values,
            Err(err) => {
                tracing::warn!(error = %err, "Reload failed, keeping previous configuration");
                return Err(err);
            }
        };
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(Snapshot {
            key_values: Arc::new(key_values),
            generation,
        });
        self.current.store(Arc::clone(&snapshot));
        tracing::info!(generation, entries = snapshot.key_values().len(), "Configuration reloaded");
        Ok(snapshot)
    }
}

impl std::fmt::Debug for ReloadableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadableConfig")
            .field("seeds", &self.seeds.len())
            .field("generation", &self.current.load().generation())
            .finish_non_exhaustive()
    }
}
