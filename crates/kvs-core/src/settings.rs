//! Process-wide settings
//!
//! A global string map that bootstrap code can publish resolved
//! configuration into and that [`SettingsVariables`](crate::SettingsVariables)
//! reads from. Every update swaps in a new immutable map, so readers always
//! observe a complete snapshot.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::key_values::KeyValues;

static SETTINGS: LazyLock<ArcSwap<HashMap<String, String>>> =
    LazyLock::new(|| ArcSwap::from_pointee(HashMap::new()));

/// Look up a single setting.
pub fn get(name: &str) -> Option<String> {
    SETTINGS.load().get(name).cloned()
}

/// The current settings map.
pub fn snapshot() -> Arc<HashMap<String, String>> {
    SETTINGS.load_full()
}

/// Set one setting.
pub fn set(name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    let value = value.into();
    SETTINGS.rcu(|current| {
        let mut next = HashMap::clone(current);
        next.insert(name.clone(), value.clone());
        next
    });
}

/// Remove one setting, returning whether it was present.
pub fn remove(name: &str) -> bool {
    let previous = SETTINGS.rcu(|current| {
        let mut next = HashMap::clone(current);
        next.remove(name);
        next
    });
    previous.contains_key(name)
}

/// Replace all settings at once.
pub fn replace(settings: HashMap<String, String>) {
    SETTINGS.store(Arc::new(settings));
}

/// Copy the last-wins view of a resolved result into the settings,
/// overwriting existing names and keeping the others.
pub fn publish(key_values: &KeyValues) {
    let resolved = key_values.to_map();
    tracing::debug!(entries = resolved.len(), "Publishing resolved configuration to settings");
    SETTINGS.rcu(|current| {
        let mut next = HashMap::clone(current);
        next.extend(resolved.iter().map(|(k, v)| (k.clone(), v.clone())));
        next
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests share the global map, so every test uses its own key prefix.

    #[test]
    fn set_get_remove() {
        set("settings_test.a", "1");
        assert_eq!(get("settings_test.a").as_deref(), Some("1"));
        assert!(remove("settings_test.a"));
        assert!(!remove("settings_test.a"));
        assert_eq!(get("settings_test.a"), None);
    }

    #[test]
    fn snapshot_is_not_affected_by_later_updates() {
        set("settings_snapshot.a", "before");
        let snap = snapshot();
        set("settings_snapshot.a", "after");
        assert_eq!(snap.get("settings_snapshot.a").map(String::as_str), Some("before"));
        assert_eq!(get("settings_snapshot.a").as_deref(), Some("after"));
    }

    #[test]
    fn publish_copies_last_wins_values() {
        let kvs = KeyValues::from_pairs(
            "memory:p",
            [("settings_publish.k", "1"), ("settings_publish.k", "2")],
        );
        publish(&kvs);
        assert_eq!(get("settings_publish.k").as_deref(), Some("2"));
    }
}
