//! Phase 3 tests: Traversal, counting + tree generation.

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tree_traversal::cache::AttributeCaches;
use tree_traversal::engine::{TrueBCounter, NO_ROOT};
use tree_traversal::facade::{AttributeFacade, CacheConfig};
use tree_traversal::graph::{
    expected_node_count, populate, traverse, AttributeStore, Evaluator, TraversalOrder,
    TreeGraph, TreeShape, TrueValueEvaluator, TypedExpander,
};
use tree_traversal::types::{Edge, LabelKind, NodeId, RelationType, TrvError, TrvResult};

/// Records the order in which nodes are visited; includes nothing.
#[derive(Default)]
struct RecordingEvaluator {
    visits: RefCell<Vec<NodeId>>,
}

impl Evaluator for RecordingEvaluator {
    fn includes(
        &self,
        _store: &dyn AttributeStore,
        _attrs: &AttributeFacade,
        node: NodeId,
    ) -> TrvResult<bool> {
        self.visits.borrow_mut().push(node);
        Ok(false)
    }
}

fn all_configs() -> [CacheConfig; 4] {
    [
        CacheConfig::NONE,
        CacheConfig::parse(Some("label")),
        CacheConfig::parse(Some("property")),
        CacheConfig::ALL,
    ]
}

/// Depth 1, fanout 2, built by hand:
///
/// ```text
/// root(0) -> B1(1) -> A11(3), A12(4)
///         -> B2(2) -> A21(5), A22(6)
/// ```
///
/// B1 is true, B2 is false; every A node is true.
fn make_fixed_tree() -> TreeGraph {
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "A"]).unwrap();
    graph.set_property(root, "value", true).unwrap();
    let b1 = graph.add_child(root, RelationType::HasB, &["B"]).unwrap();
    let b2 = graph.add_child(root, RelationType::HasB, &["B"]).unwrap();
    graph.set_property(b1, "value", true).unwrap();
    graph.set_property(b2, "value", false).unwrap();
    for b in [b1, b2] {
        for _ in 0..2 {
            let a = graph.add_child(b, RelationType::HasA, &["A"]).unwrap();
            graph.set_property(a, "value", true).unwrap();
        }
    }
    graph
}

fn visit_order(graph: &TreeGraph, order: TraversalOrder) -> Vec<NodeId> {
    let evaluator = RecordingEvaluator::default();
    traverse(
        graph,
        &AttributeFacade::passthrough(),
        0,
        order,
        &TypedExpander,
        &evaluator,
    )
    .unwrap();
    evaluator.visits.into_inner()
}

// ==================== Traversal Order Tests ====================

#[test]
fn test_bfs_visit_order() {
    let graph = make_fixed_tree();
    assert_eq!(
        visit_order(&graph, TraversalOrder::BreadthFirst),
        vec![0, 1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn test_dfs_visit_order() {
    let graph = make_fixed_tree();
    assert_eq!(
        visit_order(&graph, TraversalOrder::DepthFirst),
        vec![0, 1, 3, 4, 2, 5, 6]
    );
}

#[test]
fn test_traversal_stats() {
    let graph = make_fixed_tree();
    let attrs = AttributeFacade::passthrough();

    let bfs = traverse(
        &graph,
        &attrs,
        0,
        TraversalOrder::BreadthFirst,
        &TypedExpander,
        &TrueValueEvaluator,
    )
    .unwrap();
    assert_eq!(bfs.included, 1);
    assert_eq!(bfs.visited, 7);
    assert_eq!(bfs.max_frontier, 4);

    let dfs = traverse(
        &graph,
        &attrs,
        0,
        TraversalOrder::DepthFirst,
        &TypedExpander,
        &TrueValueEvaluator,
    )
    .unwrap();
    assert_eq!(dfs.included, 1);
    assert_eq!(dfs.visited, 7);
    assert_eq!(dfs.max_frontier, 3);
}

#[test]
fn test_traversal_order_names() {
    assert_eq!(
        TraversalOrder::from_depth_first(true),
        TraversalOrder::DepthFirst
    );
    assert_eq!(
        TraversalOrder::from_depth_first(false),
        TraversalOrder::BreadthFirst
    );
    assert_eq!(TraversalOrder::DepthFirst.to_string(), "depth_first");
    assert_eq!(TraversalOrder::BreadthFirst.name(), "breadth_first");
}

// ==================== Counting Tests ====================

#[test]
fn test_count_fixed_tree_every_config() {
    let graph = make_fixed_tree();
    for config in all_configs() {
        let caches = AttributeCaches::new();
        let counter = TrueBCounter::new(&graph, caches.facade(config));
        assert_eq!(counter.count(false).unwrap(), 1, "bfs with {}", config);
        assert_eq!(counter.count(true).unwrap(), 1, "dfs with {}", config);
    }
}

#[test]
fn test_count_all_b_false() {
    let mut graph = make_fixed_tree();
    graph.set_property(1, "value", false).unwrap();
    let counter = TrueBCounter::new(&graph, AttributeFacade::passthrough());
    assert_eq!(counter.count(false).unwrap(), 0);
}

#[test]
fn test_count_no_root() {
    let empty = TreeGraph::new();
    let counter = TrueBCounter::new(&empty, AttributeFacade::passthrough());
    assert_eq!(counter.count(false).unwrap(), NO_ROOT);
    assert_eq!(counter.count(true).unwrap(), -1);
    assert!(counter.run(TraversalOrder::BreadthFirst).unwrap().is_none());

    // A and B nodes without a Root label are not a tree.
    let mut rootless = TreeGraph::new();
    let a = rootless.add_node(&["A"]).unwrap();
    let b = rootless.add_child(a, RelationType::HasB, &["B"]).unwrap();
    rootless.set_property(b, "value", true).unwrap();
    let counter = TrueBCounter::new(&rootless, AttributeFacade::passthrough());
    assert_eq!(counter.count(false).unwrap(), NO_ROOT);
}

#[test]
fn test_count_root_only() {
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "A"]).unwrap();
    graph.set_property(root, "value", true).unwrap();

    let counter = TrueBCounter::new(&graph, AttributeFacade::passthrough());
    let outcome = counter.run(TraversalOrder::DepthFirst).unwrap().unwrap();
    assert_eq!(outcome.count(), 0);
    assert_eq!(outcome.root, root);
    assert_eq!(outcome.stats.visited, 1);
}

#[test]
fn test_root_that_is_b() {
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "B"]).unwrap();
    graph.set_property(root, "value", true).unwrap();
    let a = graph.add_child(root, RelationType::HasA, &["A"]).unwrap();
    let b = graph.add_child(a, RelationType::HasB, &["B"]).unwrap();
    graph.set_property(b, "value", true).unwrap();

    let counter = TrueBCounter::new(&graph, AttributeFacade::passthrough());
    assert_eq!(counter.count(false).unwrap(), 2);
}

#[test]
fn test_shared_child_counted_per_path() {
    // root -> B1 -> A <- B2, A -> B3 (true). A is reached once per parent.
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "A"]).unwrap();
    let b1 = graph.add_child(root, RelationType::HasB, &["B"]).unwrap();
    let b2 = graph.add_child(root, RelationType::HasB, &["B"]).unwrap();
    graph.set_property(b1, "value", false).unwrap();
    graph.set_property(b2, "value", false).unwrap();
    let a = graph.add_child(b1, RelationType::HasA, &["A"]).unwrap();
    graph.add_edge(Edge::new(b2, a, RelationType::HasA)).unwrap();
    let b3 = graph.add_child(a, RelationType::HasB, &["B"]).unwrap();
    graph.set_property(b3, "value", true).unwrap();

    for config in all_configs() {
        let caches = AttributeCaches::new();
        let counter = TrueBCounter::new(&graph, caches.facade(config));
        assert_eq!(counter.count(false).unwrap(), 2, "bfs with {}", config);
        assert_eq!(counter.count(true).unwrap(), 2, "dfs with {}", config);
    }

    let counter = TrueBCounter::new(&graph, AttributeFacade::passthrough());
    for order in [TraversalOrder::BreadthFirst, TraversalOrder::DepthFirst] {
        let outcome = counter.run(order).unwrap().unwrap();
        assert_eq!(outcome.stats.visited, 7, "{:?}", order);
    }
}

#[test]
fn test_untyped_node_is_terminal() {
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "A"]).unwrap();
    let c = graph.add_child(root, RelationType::HasB, &["C"]).unwrap();
    graph.set_property(c, "value", true).unwrap();
    // Only reachable through the untyped node.
    let hidden = graph.add_child(c, RelationType::HasA, &["B"]).unwrap();
    graph.set_property(hidden, "value", true).unwrap();

    let counter = TrueBCounter::new(&graph, AttributeFacade::passthrough());
    let outcome = counter.run(TraversalOrder::BreadthFirst).unwrap().unwrap();
    assert_eq!(outcome.count(), 0);
    assert_eq!(outcome.stats.visited, 2);
}

#[test]
fn test_wrong_relation_not_followed() {
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "A"]).unwrap();
    // A nodes only follow HAS_B.
    let b = graph.add_child(root, RelationType::HasA, &["B"]).unwrap();
    graph.set_property(b, "value", true).unwrap();

    let counter = TrueBCounter::new(&graph, AttributeFacade::passthrough());
    assert_eq!(counter.count(false).unwrap(), 0);
}

#[test]
fn test_non_bool_value_is_error() {
    let mut graph = make_fixed_tree();
    graph.set_property(2, "value", 1i64).unwrap();

    for config in all_configs() {
        let caches = AttributeCaches::new();
        let counter = TrueBCounter::new(&graph, caches.facade(config));
        assert!(matches!(
            counter.count(false),
            Err(TrvError::PropertyType { node: 2, .. })
        ));
    }
}

#[test]
fn test_missing_value_is_error() {
    let mut graph = TreeGraph::new();
    let root = graph.add_node(&["Root", "A"]).unwrap();
    graph.add_child(root, RelationType::HasB, &["B"]).unwrap();

    let caches = AttributeCaches::new();
    let counter = TrueBCounter::new(&graph, caches.facade(CacheConfig::ALL));
    assert!(matches!(
        counter.count(true),
        Err(TrvError::PropertyNotFound { node: 1, .. })
    ));
}

#[test]
fn test_cached_count_reuses_entries() {
    let graph = make_fixed_tree();
    let caches = AttributeCaches::new();
    let counter = TrueBCounter::new(&graph, caches.facade(CacheConfig::ALL));

    assert_eq!(counter.count(false).unwrap(), 1);
    let labels_after_first = caches.labels().stats().misses();
    assert_eq!(labels_after_first, 7);

    assert_eq!(counter.count(true).unwrap(), 1);
    assert_eq!(caches.labels().stats().misses(), labels_after_first);
    assert_eq!(caches.properties().len(), 2);
    assert!(caches.labels().stats().hits() > 0);
}

// ==================== Populate Tests ====================

#[test]
fn test_expected_node_count() {
    assert_eq!(expected_node_count(TreeShape::default()), Some(1_398_101));
    assert_eq!(expected_node_count(TreeShape::new(1, 2)), Some(7));
    assert_eq!(expected_node_count(TreeShape::new(2, 3)), Some(121));
    assert_eq!(expected_node_count(TreeShape::new(40, 1000)), None);
}

#[test]
fn test_tree_shape_defaults() {
    assert_eq!(TreeShape::new(0, 0), TreeShape::default());
    assert_eq!(TreeShape::new(0, 2), TreeShape::new(5, 2));
    assert_eq!(TreeShape::default().depth, 5);
    assert_eq!(TreeShape::default().fanout, 4);
}

#[test]
fn test_populate_shape() {
    let mut graph = TreeGraph::new();
    let mut rng = StdRng::seed_from_u64(7);
    let report = populate(&mut graph, TreeShape::new(2, 3), &mut rng).unwrap();

    assert_eq!(report.total_nodes, 121);
    assert_eq!(graph.node_count(), 121);
    assert_eq!(graph.edge_count(), 120);
    assert_eq!(graph.find_root_nodes(), vec![report.root]);
    assert_eq!(graph.label_index().count(LabelKind::B.name()), 3 + 27);
    assert_eq!(graph.label_index().count(LabelKind::A.name()), 1 + 9 + 81);
    assert!(graph.has_label(report.root, "A").unwrap());

    for node in graph.nodes() {
        assert!(node.property("value").and_then(|v| v.as_bool()).is_some());
    }
    for &b in graph.label_index().get("B") {
        assert_eq!(graph.outgoing(b, RelationType::HasA).unwrap().len(), 3);
        assert!(graph.outgoing(b, RelationType::HasB).unwrap().is_empty());
    }
}

#[test]
fn test_populate_count_matches_report() {
    let mut graph = TreeGraph::new();
    let mut rng = StdRng::seed_from_u64(1234);
    let report = populate(&mut graph, TreeShape::new(3, 3), &mut rng).unwrap();
    let expected = report.true_b_nodes as i64;
    assert!(expected > 0);

    for config in all_configs() {
        let caches = AttributeCaches::new();
        let counter = TrueBCounter::new(&graph, caches.facade(config));
        assert_eq!(counter.count(false).unwrap(), expected, "bfs with {}", config);
        assert_eq!(counter.count(true).unwrap(), expected, "dfs with {}", config);
    }
}

#[test]
fn test_populate_is_deterministic_per_seed() {
    let mut first = TreeGraph::new();
    let mut second = TreeGraph::new();
    let a = populate(&mut first, TreeShape::new(2, 2), &mut StdRng::seed_from_u64(5)).unwrap();
    let b = populate(&mut second, TreeShape::new(2, 2), &mut StdRng::seed_from_u64(5)).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.nodes(), second.nodes());
}

#[test]
fn test_populate_refuses_existing_tree() {
    let mut graph = TreeGraph::new();
    let mut rng = StdRng::seed_from_u64(3);
    populate(&mut graph, TreeShape::new(1, 2), &mut rng).unwrap();

    assert!(matches!(
        populate(&mut graph, TreeShape::new(1, 2), &mut rng),
        Err(TrvError::TreeExists { roots: 1 })
    ));
    assert_eq!(graph.node_count(), 7);
}

#[test]
fn test_populate_rejects_oversized_shape() {
    let mut graph = TreeGraph::new();
    let mut rng = StdRng::seed_from_u64(3);
    assert!(matches!(
        populate(&mut graph, TreeShape::new(40, 1000), &mut rng),
        Err(TrvError::InvalidTreeShape {
            depth: 40,
            fanout: 1000
        })
    ));
    assert_eq!(graph.node_count(), 0);
}
