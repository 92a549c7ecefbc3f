//! Cached and pass-through variants of the label and property lookups.

use std::sync::Arc;

use crate::cache::{LabelCache, PropertyCache};
use crate::graph::AttributeStore;
use crate::types::{LabelKind, NodeId, PropertyValue, TrvResult};

/// Label lookups, straight to the store or through the shared bitmask cache.
#[derive(Clone)]
pub enum LabelOperations {
    Direct,
    Cached(Arc<LabelCache>),
}

impl LabelOperations {
    /// Whether `node` carries `kind`.
    pub fn has_label(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        kind: LabelKind,
    ) -> TrvResult<bool> {
        match self {
            Self::Direct => store.has_label(node, kind.name()),
            Self::Cached(cache) => cache.has_label(store, node, kind),
        }
    }

    /// Whether lookups are memoized.
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

impl std::fmt::Display for LabelOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "DIRECT"),
            Self::Cached(_) => write!(f, "CACHE"),
        }
    }
}

/// Property lookups, straight to the store or through the shared value cache.
#[derive(Clone)]
pub enum PropertyOperations {
    Direct,
    Cached(Arc<PropertyCache>),
}

impl PropertyOperations {
    /// The value of property `name` on `node`.
    pub fn property(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        name: &str,
    ) -> TrvResult<PropertyValue> {
        match self {
            Self::Direct => store.property(node, name),
            Self::Cached(cache) => cache.property(store, node, name),
        }
    }

    /// Whether lookups are memoized.
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

impl std::fmt::Display for PropertyOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "DIRECT"),
            Self::Cached(_) => write!(f, "CACHE"),
        }
    }
}
