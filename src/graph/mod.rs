//! In-memory graph store, tree generation and traversal.

pub mod builder;
pub mod store;
pub mod traversal;
pub mod tree_graph;

pub use builder::{expected_node_count, populate, PopulateReport, TreeShape};
pub use store::AttributeStore;
pub use traversal::{
    traverse, Evaluator, Expander, TraversalOrder, TraversalStats, TrueValueEvaluator,
    TypedExpander,
};
pub use tree_graph::{NodeRecord, TreeGraph};
