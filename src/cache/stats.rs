//! Hit/miss accounting for the attribute caches.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lock-free hit and miss counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that went to the store.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups answered from the cache, `None` before any lookup.
    pub fn hit_ratio(&self) -> Option<f64> {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            None
        } else {
            Some(hits as f64 / total as f64)
        }
    }

    /// Zero both counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters, with the cache's entry count.
    pub fn snapshot(&self, entries: usize) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            entries,
            hit_ratio: self.hit_ratio(),
        }
    }
}

/// Serializable copy of one cache's counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub hit_ratio: Option<f64>,
}

/// Counters of both attribute caches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheReport {
    pub labels: StatsSnapshot,
    pub properties: StatsSnapshot,
}

impl std::fmt::Display for CacheReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Hit ratio (labels) = {}",
            format_ratio(self.labels.hit_ratio)
        )?;
        write!(
            f,
            "Hit ratio (properties) = {}",
            format_ratio(self.properties.hit_ratio)
        )
    }
}

fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.6}", r),
        None => "NaN".to_string(),
    }
}
