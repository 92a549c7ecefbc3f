//! Per-node label bitmask cache.
//!
//! The first lookup for a node enumerates all of its labels once and records
//! which [`LabelKind`]s it carries as one bit each. Later lookups for any kind
//! decode the bit without touching the store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::graph::AttributeStore;
use crate::types::{LabelBitmask, LabelKind, NodeId, TrvResult};

use super::stats::CacheStats;
use super::{shard_count, shard_index, DEFAULT_SHARDS};

type Shard = RwLock<HashMap<NodeId, LabelBitmask>>;

/// Sharded map from node id to label bitmask.
///
/// A missing entry means "not yet computed"; a present zero mask means the
/// node carries none of the known kinds.
pub struct LabelCache {
    shards: Box<[Shard]>,
    stats: CacheStats,
}

impl LabelCache {
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

    /// Whether `node` carries `kind`, populating the node's mask on first use.
    pub fn has_label(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        kind: LabelKind,
    ) -> TrvResult<bool> {
        Ok(self.mask(store, node)?.contains(kind))
    }

    /// The node's full mask, populating it on first use.
    pub fn mask(&self, store: &dyn AttributeStore, node: NodeId) -> TrvResult<LabelBitmask> {
        let shard = self.shard(node);

        if let Some(mask) = shard.read().get(&node).copied() {
            self.stats.record_hit();
            return Ok(mask);
        }

        let mut entries = shard.write();
        // Another thread may have populated the node between the two locks.
        if let Some(mask) = entries.get(&node).copied() {
            self.stats.record_hit();
            return Ok(mask);
        }

        self.stats.record_miss();
        let mask = LabelBitmask::from_labels(store.labels(node)?);
        entries.insert(node, mask);
        Ok(mask)
    }

    /// The cached mask for `node`, without populating.
    pub fn cached(&self, node: NodeId) -> Option<LabelBitmask> {
        self.shard(node).read().get(&node).copied()
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    /// Whether no node is cached.
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

impl Default for LabelCache {
    fn default() -> Self {
        Self::new()
    }
}
