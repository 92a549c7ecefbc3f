//! The attribute facade used by traversal strategies.

use crate::cache::AttributeCaches;
use crate::graph::AttributeStore;
use crate::types::{LabelKind, NodeId, PropertyValue, TrvResult};

use super::{CacheConfig, LabelOperations, PropertyOperations};

/// Label and property lookups with independently switchable memoization.
///
/// Facades are cheap to clone; the caches they point at are shared, so
/// clearing an [`AttributeCaches`] affects every facade built from it.
#[derive(Clone)]
pub struct AttributeFacade {
    labels: LabelOperations,
    properties: PropertyOperations,
}

impl AttributeFacade {
    /// A facade over `caches`, memoizing what `config` selects.
    pub fn new(caches: &AttributeCaches, config: CacheConfig) -> Self {
        let labels = if config.labels {
            LabelOperations::Cached(caches.labels().clone())
        } else {
            LabelOperations::Direct
        };
        let properties = if config.properties {
            PropertyOperations::Cached(caches.properties().clone())
        } else {
            PropertyOperations::Direct
        };
        Self { labels, properties }
    }

    /// A facade that never memoizes.
    pub fn passthrough() -> Self {
        Self {
            labels: LabelOperations::Direct,
            properties: PropertyOperations::Direct,
        }
    }

    /// The switches this facade was built with.
    pub fn config(&self) -> CacheConfig {
        CacheConfig {
            labels: self.labels.is_cached(),
            properties: self.properties.is_cached(),
        }
    }

    /// Whether `node` carries the known label `kind`.
    pub fn has_label(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        kind: LabelKind,
    ) -> TrvResult<bool> {
        self.labels.has_label(store, node, kind)
    }

    /// Whether `node` carries an arbitrary label. Names outside [`LabelKind`]
    /// always go to the store.
    pub fn has_named_label(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        label: &str,
    ) -> TrvResult<bool> {
        match LabelKind::from_name(label) {
            Some(kind) => self.has_label(store, node, kind),
            None => store.has_label(node, label),
        }
    }

    /// The value of property `name` on `node`.
    pub fn property(
        &self,
        store: &dyn AttributeStore,
        node: NodeId,
        name: &str,
    ) -> TrvResult<PropertyValue> {
        self.properties.property(store, node, name)
    }
}

impl Default for AttributeFacade {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl std::fmt::Display for AttributeFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AttributeFacade(labels={}, properties={})",
            self.labels, self.properties
        )
    }
}
