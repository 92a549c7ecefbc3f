//! tree-traversal: cacheable graph attributes and counting tree traversal.
//!
//! Walks a typed tree (`(:A)-[:HAS_B]->(:B)-[:HAS_A]->(:A)`) breadth-first or
//! depth-first and counts the `B` nodes whose `value` property is true. Label
//! and property lookups go through an [`AttributeFacade`] that can memoize
//! either kind in process-wide [`AttributeCaches`].

pub mod cache;
pub mod cli;
pub mod engine;
pub mod facade;
pub mod ffi;
pub mod format;
pub mod graph;
pub mod index;
pub mod types;

// Re-export commonly used types at the crate root
pub use cache::{AttributeCaches, CacheReport, LabelCache, PropertyCache};
pub use engine::{CountOutcome, TrueBCounter, NO_ROOT};
pub use facade::{AttributeFacade, CacheConfig};
pub use format::{TreeReader, TreeWriter};
pub use graph::{
    populate, traverse, AttributeStore, TraversalOrder, TraversalStats, TreeGraph, TreeShape,
};
pub use index::LabelIndex;
pub use types::{
    now_micros, Edge, FileHeader, LabelBitmask, LabelKind, NodeId, PropertyValue, RelationType,
    TrvError, TrvResult, VALUE_PROPERTY,
};
