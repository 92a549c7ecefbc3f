//! Counting of true-valued `B` nodes below the tree root.

use log::{info, warn};
use serde::Serialize;

use crate::facade::AttributeFacade;
use crate::graph::{
    traverse, AttributeStore, TraversalOrder, TraversalStats, TrueValueEvaluator, TypedExpander,
};
use crate::types::{now_micros, NodeId, TrvResult};

/// Count returned when the store has no root node.
pub const NO_ROOT: i64 = -1;

/// Result of a counting traversal that found a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountOutcome {
    /// The root the traversal started from.
    pub root: NodeId,
    /// Order the frontier was consumed in.
    pub order: TraversalOrder,
    /// Counters of the traversal.
    pub stats: TraversalStats,
    /// Wall-clock duration in microseconds.
    pub elapsed_micros: u64,
}

impl CountOutcome {
    /// Number of included nodes.
    pub fn count(&self) -> i64 {
        self.stats.included as i64
    }
}

/// Counts `B` nodes with `value == true` reachable from the root, through
/// `HAS_B`/`HAS_A` edges, with lookups going through `attrs`.
pub struct TrueBCounter<'a> {
    store: &'a dyn AttributeStore,
    attrs: AttributeFacade,
}

impl<'a> TrueBCounter<'a> {
    /// Create a counter over `store`.
    pub fn new(store: &'a dyn AttributeStore, attrs: AttributeFacade) -> Self {
        Self { store, attrs }
    }

    /// The facade lookups go through.
    pub fn attrs(&self) -> &AttributeFacade {
        &self.attrs
    }

    /// The count, or [`NO_ROOT`] when no node carries the root label.
    pub fn count(&self, depth_first: bool) -> TrvResult<i64> {
        Ok(self
            .run(TraversalOrder::from_depth_first(depth_first))?
            .map(|outcome| outcome.count())
            .unwrap_or(NO_ROOT))
    }

    /// Traverse from the first root in `order`; `None` when there is no root.
    pub fn run(&self, order: TraversalOrder) -> TrvResult<Option<CountOutcome>> {
        let Some(root) = self.store.find_root_nodes().first().copied() else {
            warn!("No root node found");
            return Ok(None);
        };

        info!("Traversing the whole tree from node {} ({}, {})", root, order, self.attrs);
        let started = now_micros();
        let stats = traverse(
            self.store,
            &self.attrs,
            root,
            order,
            &TypedExpander,
            &TrueValueEvaluator,
        )?;
        let elapsed_micros = now_micros().saturating_sub(started);
        info!(
            "Counted {} of {} visited nodes in {} us",
            stats.included, stats.visited, elapsed_micros
        );

        Ok(Some(CountOutcome {
            root,
            order,
            stats,
            elapsed_micros,
        }))
    }
}
