//! Order-agnostic tree traversal (BFS or DFS) with pluggable strategies.

use std::collections::VecDeque;

use serde::Serialize;

use crate::facade::AttributeFacade;
use crate::types::{LabelKind, NodeId, RelationType, TrvResult, VALUE_PROPERTY};

use super::AttributeStore;

/// Order in which the frontier is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraversalOrder {
    /// Level by level: pop from the front, children appended to the back.
    BreadthFirst,
    /// Branch by branch: pop from the back, children appended to the back.
    DepthFirst,
}

impl TraversalOrder {
    /// Map a `depth_first` flag to an order.
    pub fn from_depth_first(depth_first: bool) -> Self {
        if depth_first {
            Self::DepthFirst
        } else {
            Self::BreadthFirst
        }
    }

    /// Return a human-readable name for this order.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "breadth_first",
            Self::DepthFirst => "depth_first",
        }
    }
}

impl std::fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decides which nodes follow a visited node.
pub trait Expander {
    /// Successors of `node`, in the order they should be visited.
    fn expand<'s>(
        &self,
        store: &'s dyn AttributeStore,
        attrs: &AttributeFacade,
        node: NodeId,
    ) -> TrvResult<&'s [NodeId]>;
}

/// Decides whether a visited node is counted.
pub trait Evaluator {
    fn includes(
        &self,
        store: &dyn AttributeStore,
        attrs: &AttributeFacade,
        node: NodeId,
    ) -> TrvResult<bool>;
}

/// Follows `HAS_B` out of `A` nodes and `HAS_A` out of `B` nodes; any other
/// node is terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedExpander;

impl Expander for TypedExpander {
    fn expand<'s>(
        &self,
        store: &'s dyn AttributeStore,
        attrs: &AttributeFacade,
        node: NodeId,
    ) -> TrvResult<&'s [NodeId]> {
        if attrs.has_label(store, node, LabelKind::A)? {
            store.outgoing(node, RelationType::HasB)
        } else if attrs.has_label(store, node, LabelKind::B)? {
            store.outgoing(node, RelationType::HasA)
        } else {
            Ok(&[])
        }
    }
}

/// Includes `B` nodes whose boolean `value` property is true.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueValueEvaluator;

impl Evaluator for TrueValueEvaluator {
    fn includes(
        &self,
        store: &dyn AttributeStore,
        attrs: &AttributeFacade,
        node: NodeId,
    ) -> TrvResult<bool> {
        if !attrs.has_label(store, node, LabelKind::B)? {
            return Ok(false);
        }
        attrs
            .property(store, node, VALUE_PROPERTY)?
            .expect_bool(node, VALUE_PROPERTY)
    }
}

/// Outcome of one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TraversalStats {
    /// Nodes accepted by the evaluator.
    pub included: u64,
    /// Nodes popped from the frontier.
    pub visited: u64,
    /// Largest frontier size observed.
    pub max_frontier: usize,
}

/// Walk everything reachable from `root` and count the included nodes.
///
/// There is no visited set: a node reachable through several paths is
/// visited once per path, and a cycle never terminates.
pub fn traverse(
    store: &dyn AttributeStore,
    attrs: &AttributeFacade,
    root: NodeId,
    order: TraversalOrder,
    expander: &dyn Expander,
    evaluator: &dyn Evaluator,
) -> TrvResult<TraversalStats> {
    let mut stats = TraversalStats::default();
    let mut frontier: VecDeque<NodeId> = VecDeque::new();
    frontier.push_back(root);

    loop {
        stats.max_frontier = stats.max_frontier.max(frontier.len());
        let node = match order {
            TraversalOrder::BreadthFirst => frontier.pop_front(),
            TraversalOrder::DepthFirst => frontier.pop_back(),
        };
        let Some(node) = node else {
            break;
        };
        stats.visited += 1;

        if evaluator.includes(store, attrs, node)? {
            stats.included += 1;
        }

        let children = expander.expand(store, attrs, node)?;
        match order {
            TraversalOrder::BreadthFirst => frontier.extend(children.iter().copied()),
            // Reversed so the first child is popped first.
            TraversalOrder::DepthFirst => frontier.extend(children.iter().rev().copied()),
        }
    }

    Ok(stats)
}
