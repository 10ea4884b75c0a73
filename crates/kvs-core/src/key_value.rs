//! Resolved entries and their provenance
//!
//! Every [`KeyValue`] records the [`Source`] it was parsed from. A source
//! points at the directive entry (`_load_<name>=<uri>`) that introduced its
//! resource through a [`NodeId`] into the [`Provenance`] arena. Nodes only
//! ever refer to nodes created before them, so chains are acyclic by
//! construction and serialize trivially.

use std::fmt::Write as _;

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::flags::{Flag, Flags};
use crate::key_values::REDACTED;

/// Index of a node in a [`Provenance`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Where an entry came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// URI of the originating resource
    pub uri: String,
    /// The directive entry that introduced the resource, `None` for roots
    pub reference: Option<NodeId>,
    /// 1-based position of the entry in its resource's parse output
    pub index: usize,
}

/// A single resolved configuration entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    key: String,
    raw: String,
    expanded: String,
    source: Source,
    flags: Flags,
}

impl KeyValue {
    /// Create an entry whose expanded value equals its raw value.
    pub fn new(key: impl Into<String>, raw: impl Into<String>, source: Source, flags: Flags) -> Self {
        let raw = raw.into();
        Self {
            key: key.into(),
            expanded: raw.clone(),
            raw,
            source,
            flags,
        }
    }

    /// Create a new entry identical to this one but with a different expanded value.
    pub fn with_expanded(&self, expanded: impl Into<String>) -> Self {
        Self {
            expanded: expanded.into(),
            ..self.clone()
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value exactly as parsed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The value after interpolation
    pub fn expanded(&self) -> &str {
        &self.expanded
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_sensitive(&self) -> bool {
        self.flags.contains(Flag::Sensitive)
    }

    /// The expanded value, or the redaction marker for sensitive entries
    pub fn display_value(&self) -> &str {
        if self.is_sensitive() {
            REDACTED
        } else {
            &self.expanded
        }
    }

    fn display_raw(&self) -> &str {
        if self.is_sensitive() { REDACTED } else { &self.raw }
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.display_value())
    }
}

impl Serialize for KeyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("KeyValue", 5)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("raw", self.display_raw())?;
        state.serialize_field("expanded", self.display_value())?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("flags", &self.flags)?;
        state.end()
    }
}

/// Append-only arena of directive entries that introduced resources
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    nodes: Vec<KeyValue>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Its source may only reference nodes already in the arena.
    pub(crate) fn push(&mut self, node: KeyValue) -> NodeId {
        debug_assert!(
            node.source.reference.is_none_or(|r| r.0 < self.nodes.len()),
            "provenance nodes may only reference earlier nodes"
        );
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&KeyValue> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk the chain of introducing entries, nearest first.
    pub fn chain(&self, start: Option<NodeId>) -> impl Iterator<Item = &KeyValue> + '_ {
        std::iter::successors(start.and_then(|id| self.get(id)), |node| {
            node.source.reference.and_then(|id| self.get(id))
        })
    }

    /// Describe a resource and how it was introduced:
    /// `resource X <-- specified with key K in uri Y <-- ...`
    pub fn describe_resource(&self, uri: &str, reference: Option<NodeId>) -> String {
        let mut out = format!("resource {uri}");
        self.append_chain(&mut out, reference);
        out
    }

    /// Describe the location of an entry: its uri, index and introducing chain.
    pub fn describe_source(&self, source: &Source) -> String {
        let mut out = format!("uri {} index {}", source.uri, source.index);
        self.append_chain(&mut out, source.reference);
        out
    }

    fn append_chain(&self, out: &mut String, reference: Option<NodeId>) {
        for node in self.chain(reference) {
            let _ = write!(
                out,
                " <-- specified with key {} in uri {}",
                node.key, node.source.uri
            );
        }
    }

    /// Render the verbose form of an entry, expanding references recursively:
    /// `KeyValue[key=.., raw=.., expanded=.., source=Source[uri=.., reference=KeyValue[..], index=..], flags=[..]]`
    pub fn describe(&self, kv: &KeyValue) -> String {
        let reference = kv
            .source
            .reference
            .and_then(|id| self.get(id))
            .map(|node| self.describe(node))
            .unwrap_or_else(|| "null".to_string());
        format!(
            "KeyValue[key={}, raw={}, expanded={}, source=Source[uri={}, reference={}, index={}], flags={}]",
            kv.key,
            kv.display_raw(),
            kv.display_value(),
            kv.source.uri,
            reference,
            kv.source.index,
            kv.flags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(uri: &str, reference: Option<NodeId>, index: usize) -> Source {
        Source {
            uri: uri.to_string(),
            reference,
            index,
        }
    }

    fn two_level_arena() -> (Provenance, NodeId) {
        let mut arena = Provenance::new();
        let root_directive = KeyValue::new(
            "_load_db",
            "memory:db.properties",
            source("memory:root.properties", None, 2),
            Flags::EMPTY,
        );
        let root_id = arena.push(root_directive);
        let child_directive = KeyValue::new(
            "_load_secrets",
            "memory:secrets.properties",
            source("memory:db.properties", Some(root_id), 1),
            Flags::EMPTY,
        );
        let child_id = arena.push(child_directive);
        (arena, child_id)
    }

    #[test]
    fn with_expanded_creates_new_instance() {
        let kv = KeyValue::new("a", "${b}", source("memory:x", None, 1), Flags::EMPTY);
        let expanded = kv.with_expanded("1");
        assert_eq!(kv.expanded(), "${b}");
        assert_eq!(expanded.raw(), "${b}");
        assert_eq!(expanded.expanded(), "1");
    }

    #[test]
    fn chain_walks_nearest_first() {
        let (arena, child_id) = two_level_arena();
        let keys: Vec<&str> = arena.chain(Some(child_id)).map(|kv| kv.key()).collect();
        assert_eq!(keys, vec!["_load_secrets", "_load_db"]);
        assert_eq!(arena.chain(None).count(), 0);
    }

    #[test]
    fn describe_resource_lists_chain() {
        let (arena, child_id) = two_level_arena();
        assert_eq!(
            arena.describe_resource("memory:secrets.properties", Some(child_id)),
            "resource memory:secrets.properties \
             <-- specified with key _load_secrets in uri memory:db.properties \
             <-- specified with key _load_db in uri memory:root.properties"
        );
    }

    #[test]
    fn describe_renders_nested_sources() {
        let (arena, child_id) = two_level_arena();
        let kv = KeyValue::new(
            "password",
            "hunter2",
            source("memory:secrets.properties", Some(child_id), 1),
            Flag::Sensitive.into(),
        );
        assert_eq!(
            arena.describe(&kv),
            "KeyValue[key=password, raw=REDACTED, expanded=REDACTED, \
             source=Source[uri=memory:secrets.properties, \
             reference=KeyValue[key=_load_secrets, raw=memory:secrets.properties, expanded=memory:secrets.properties, \
             source=Source[uri=memory:db.properties, \
             reference=KeyValue[key=_load_db, raw=memory:db.properties, expanded=memory:db.properties, \
             source=Source[uri=memory:root.properties, reference=null, index=2], flags=[]], \
             index=1], flags=[]], \
             index=1], flags=[SENSITIVE]]"
        );
    }

    #[test]
    fn serialize_redacts_sensitive_values() {
        let kv = KeyValue::new(
            "secret",
            "topsecret",
            source("memory:s", None, 1),
            Flag::Sensitive.into(),
        );
        let json = serde_json::to_value(&kv).unwrap();
        assert_eq!(json["raw"], "REDACTED");
        assert_eq!(json["expanded"], "REDACTED");
        assert_eq!(json["source"]["index"], 1);
        assert_eq!(json["flags"][0], "SENSITIVE");
    }
}
