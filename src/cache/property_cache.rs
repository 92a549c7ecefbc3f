//! Per-node property value cache.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::graph::AttributeStore;
use crate::types::{NodeId, PropertyValue, TrvResult};

use super::stats::CacheStats;
use super::{shard_count, shard_index, DEFAULT_SHARDS};

/// How a node's cached properties are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Exactly one property, stored inline.
    Single,
    /// Two or more properties, stored in a map.
    Map,
}

/// The cached properties of one node. Entries only ever grow.
#[derive(Debug, Clone)]
enum PropertyEntry {
    Single(String, PropertyValue),
    Map(HashMap<String, PropertyValue>),
}

impl PropertyEntry {
    fn get(&self, name: &str) -> Option<&PropertyValue> {
        match self {
            Self::Single(n, v) if n.as_str() == name => Some(v),
            Self::Single(..) => None,
            Self::Map(map) => map.get(name),
        }
    }

    fn insert(&mut self, name: &str, value: PropertyValue) {
        match self {
            Self::Single(n, v) if n.as_str() == name => *v = value,
            Self::Single(..) => {
                let mut map = HashMap::with_capacity(2);
                if let Self::Single(n, v) = std::mem::replace(self, Self::Map(HashMap::new())) {
                    map.insert(n, v);
                }
                map.insert(name.to_string(), value);
                *self = Self::Map(map);
            }
            Self::Map(map) => {
                map.insert(name.to_string(), value);
            }
        }
    }

    fn kind(&self) -> EntryKind {
        match self {
            Self::Single(..) => EntryKind::Single,
            Self::Map(_) => EntryKind::Map,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Single(..) => 1,
            Self::Map(map) => map.len(),
        }
    }
}

type Shard = RwLock<HashMap<NodeId, PropertyEntry>>;

/// Sharded map from node id to the properties looked up so far.
///
/// Absent properties are never recorded: every lookup of a property the node
/// does not carry goes back to the store and fails there.
pub struct PropertyCache {
    shards: Box<[Shard]>,
    stats: CacheStats,
}

impl PropertyCache {
    /// Create an empty cache with the default shard count.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Create an empty cache; `shards` is rounded up to a power of two.
    pub fn with_shards(shards: usize) -> Self {
        Self {
            shards: (0..shard_count(shards))
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
            stats: CacheStats::new(),
        }
    }

    fn shard(&self, node: NodeId) -> &Shard {
        &self.shards[shard_index(node, self.shards.len())]
    }

    /// The value of property `name` on `node`, from the cache when present.
    pub fn property(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        name: &str,
    ) -> TrvResult<PropertyValue> {
        let shard = self.shard(node);

        if let Some(value) = shard.read().get(&node).and_then(|e| e.get(name)) {
            self.stats.record_hit();
            return Ok(value.clone());
        }

        let mut entries = shard.write();
        if let Some(value) = entries.get(&node).and_then(|e| e.get(name)) {
            self.stats.record_hit();
            return Ok(value.clone());
        }

        self.stats.record_miss();
        let value = store.property(node, name)?;
        match entries.get_mut(&node) {
            Some(entry) => entry.insert(name, value.clone()),
            None => {
                entries.insert(
                    node,
                    PropertyEntry::Single(name.to_string(), value.clone()),
                );
            }
        }
        Ok(value)
    }

    /// The cached value of `name` on `node`, without populating.
    pub fn cached(&self, node: NodeId, name: &str) -> Option<PropertyValue> {
        self.shard(node)
            .read()
            .get(&node)
            .and_then(|e| e.get(name))
            .cloned()
    }

    /// Number of properties cached for `node`.
    pub fn cached_count(&self, node: NodeId) -> usize {
        self.shard(node)
            .read()
            .get(&node)
            .map(PropertyEntry::len)
            .unwrap_or(0)
    }

    /// Representation of `node`'s entry, `None` when nothing is cached.
    pub fn entry_kind(&self, node: NodeId) -> Option<EntryKind> {
        self.shard(node).read().get(&node).map(PropertyEntry::kind)
    }

    /// Number of nodes with at least one cached property.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    /// Whether no node has a cached property.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.read().is_empty())
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.write().clear();
        }
        self.stats.reset();
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for PropertyCache {
    fn default() -> Self {
        Self::new()
    }
}
