//! Process-wide attribute caches shared by every facade.
//!
//! - [`LabelCache`] - one bitmask byte per node over the known label kinds
//! - [`PropertyCache`] - the property values looked up so far, per node
//!
//! Both are sharded by node id; each shard sits behind its own reader/writer
//! lock, so populating one node never blocks reads of nodes in other shards.

pub mod label_cache;
pub mod property_cache;
pub mod stats;

use std::sync::Arc;

use log::debug;

pub use label_cache::LabelCache;
pub use property_cache::{EntryKind, PropertyCache};
pub use stats::{CacheReport, CacheStats, StatsSnapshot};

use crate::facade::{AttributeFacade, CacheConfig};

/// Default number of lock shards per cache.
pub const DEFAULT_SHARDS: usize = 64;

pub(crate) fn shard_count(requested: usize) -> usize {
    requested.max(1).next_power_of_two()
}

/// Dense ids spread evenly over the shards with a plain mask.
pub(crate) fn shard_index(node: u64, shards: usize) -> usize {
    (node as usize) & (shards - 1)
}

/// The label and property caches, created once and shared by reference.
pub struct AttributeCaches {
    labels: Arc<LabelCache>,
    properties: Arc<PropertyCache>,
}

impl AttributeCaches {
    /// Create empty caches with the default shard count.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Create empty caches with `shards` lock shards each.
    pub fn with_shards(shards: usize) -> Self {
        Self {
            labels: Arc::new(LabelCache::with_shards(shards)),
            properties: Arc::new(PropertyCache::with_shards(shards)),
        }
    }

    /// The shared label cache.
    pub fn labels(&self) -> &Arc<LabelCache> {
        &self.labels
    }

    /// The shared property cache.
    pub fn properties(&self) -> &Arc<PropertyCache> {
        &self.properties
    }

    /// A facade over these caches with the given switches.
    pub fn facade(&self, config: CacheConfig) -> AttributeFacade {
        AttributeFacade::new(self, config)
    }

    /// Empty both caches, whichever facades currently use them.
    pub fn clear(&self) {
        debug!(
            "Clearing attribute caches ({} label entries, {} property entries)",
            self.labels.len(),
            self.properties.len()
        );
        self.labels.clear();
        self.properties.clear();
    }

    /// Current counters of both caches.
    pub fn report(&self) -> CacheReport {
        CacheReport {
            labels: self.labels.stats().snapshot(self.labels.len()),
            properties: self.properties.stats().snapshot(self.properties.len()),
        }
    }
}

impl Default for AttributeCaches {
    fn default() -> Self {
        Self::new()
    }
}
