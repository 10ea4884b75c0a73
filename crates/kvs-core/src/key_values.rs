//! The ordered result of a resolution

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use kvs_media::Media;
use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::error::Result;
use crate::flags::Flags;
use crate::key_value::{KeyValue, Provenance, Source};

/// Marker rendered in place of the value of a sensitive entry
pub const REDACTED: &str = "REDACTED";

/// Ordered, duplicate-preserving collection of resolved entries.
///
/// Iteration yields every entry in the order it was accumulated, including
/// entries that share a key. Point lookups ([`get`](Self::get),
/// [`to_map`](Self::to_map)) collapse duplicates to the last entry.
#[derive(Clone, Default)]
pub struct KeyValues {
    entries: Vec<KeyValue>,
    lookup: HashMap<String, usize>,
    provenance: Arc<Provenance>,
}

impl KeyValues {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(entries: Vec<KeyValue>, provenance: Provenance) -> Self {
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(idx, kv)| (kv.key().to_string(), idx))
            .collect();
        Self {
            entries,
            lookup,
            provenance: Arc::new(provenance),
        }
    }

    /// Build uninterpolated entries from literal pairs attributed to `uri`.
    pub fn from_pairs<K, V>(uri: &str, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (key, value))| {
                let source = Source {
                    uri: uri.to_string(),
                    reference: None,
                    index: idx + 1,
                };
                KeyValue::new(key, value, source, Flags::EMPTY)
            })
            .collect();
        Self::from_parts(entries, Provenance::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate every entry in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyValue> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[KeyValue] {
        &self.entries
    }

    /// The last entry defined for `key`.
    pub fn get_entry(&self, key: &str) -> Option<&KeyValue> {
        self.lookup.get(key).map(|&idx| &self.entries[idx])
    }

    /// The expanded value of the last entry defined for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_entry(key).map(KeyValue::expanded)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    /// Collapse to a last-wins map of expanded values, ordered by first appearance.
    ///
    /// Values of sensitive entries are returned as-is; this is the internal view.
    pub fn to_map(&self) -> IndexMap<String, String> {
        let mut map = IndexMap::with_capacity(self.lookup.len());
        for kv in &self.entries {
            map.insert(kv.key().to_string(), kv.expanded().to_string());
        }
        map
    }

    /// Keep only the entries matching `predicate`, preserving order and provenance.
    pub fn filter(&self, predicate: impl Fn(&KeyValue) -> bool) -> Self {
        let entries: Vec<KeyValue> = self.entries.iter().filter(|&kv| predicate(kv)).cloned().collect();
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(idx, kv)| (kv.key().to_string(), idx))
            .collect();
        Self {
            entries,
            lookup,
            provenance: Arc::clone(&self.provenance),
        }
    }

    /// The arena of directive entries the sources of this result point into.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Render every entry through `media`, redacting sensitive values.
    pub fn format(&self, media: &dyn Media) -> Result<Vec<u8>> {
        let pairs: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|kv| (kv.key(), kv.display_value()))
            .collect();
        Ok(media.format(&pairs)?)
    }

    /// Verbose rendering of a single entry with its full source chain.
    pub fn describe(&self, kv: &KeyValue) -> String {
        self.provenance.describe(kv)
    }

    /// Verbose rendering of the whole collection, one entry per line.
    pub fn verbose(&self) -> String {
        let mut out = String::from("KeyValues[\n");
        for kv in &self.entries {
            out.push_str(&self.describe(kv));
            out.push('\n');
        }
        out.push(']');
        out
    }
}

impl fmt::Display for KeyValues {
    /// `KeyValues[` newline, one `key=value` line per entry, `]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "KeyValues[")?;
        for kv in &self.entries {
            writeln!(f, "{kv}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for KeyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for KeyValues {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a KeyValues {
    type Item = &'a KeyValue;
    type IntoIter = std::slice::Iter<'a, KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for KeyValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("KeyValues", 2)?;
        state.serialize_field("entries", &self.entries)?;
        state.serialize_field("provenance", self.provenance.as_ref())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flag;
    use kvs_media::{JsonMedia, PropertiesMedia};
    use pretty_assertions::assert_eq;

    fn sample() -> KeyValues {
        KeyValues::from_pairs("memory:a", [("k", "1"), ("other", "x"), ("k", "2")])
    }

    #[test]
    fn lookup_is_last_wins_iteration_keeps_all() {
        let kvs = sample();
        assert_eq!(kvs.len(), 3);
        assert_eq!(kvs.get("k"), Some("2"));
        let values: Vec<&str> = kvs.iter().filter(|kv| kv.key() == "k").map(|kv| kv.raw()).collect();
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(kvs.get_entry("k").unwrap().source().index, 3);
    }

    #[test]
    fn to_map_orders_by_first_appearance() {
        let map = sample().to_map();
        let pairs: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("k", "2"), ("other", "x")]);
    }

    #[test]
    fn display_lists_every_entry() {
        assert_eq!(sample().to_string(), "KeyValues[\nk=1\nother=x\nk=2\n]");
        assert_eq!(KeyValues::empty().to_string(), "KeyValues[\n]");
    }

    #[test]
    fn format_redacts_sensitive_entries() {
        let source = Source {
            uri: "memory:s".to_string(),
            reference: None,
            index: 1,
        };
        let secret = KeyValue::new("secret", "topsecret", source.clone(), Flag::Sensitive.into());
        let plain = KeyValue::new("user", "admin", Source { index: 2, ..source }, Flags::EMPTY);
        let kvs = KeyValues::from_parts(vec![secret, plain], Provenance::new());

        let out = String::from_utf8(kvs.format(&PropertiesMedia::new()).unwrap()).unwrap();
        assert_eq!(out, "secret=REDACTED\nuser=admin\n");
        assert_eq!(kvs.to_map()["secret"], "topsecret");
        assert!(!kvs.to_string().contains("topsecret"));
    }

    #[test]
    fn format_through_json() {
        let out = sample().format(&JsonMedia::new()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["k"], "2");
    }

    #[test]
    fn filter_rebuilds_lookup() {
        let filtered = sample().filter(|kv| kv.raw() != "2");
        assert_eq!(filtered.get("k"), Some("1"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn verbose_wraps_entries() {
        let kvs = KeyValues::from_pairs("memory:a", [("a", "1")]);
        assert_eq!(
            kvs.verbose(),
            "KeyValues[\nKeyValue[key=a, raw=1, expanded=1, source=Source[uri=memory:a, reference=null, index=1], flags=[]]\n]"
        );
    }
}
