//! Generation of the synthetic `(:A)-[:HAS_B]->(:B)-[:HAS_A]->(:A)` tree.

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use crate::types::{LabelKind, NodeId, RelationType, TrvError, TrvResult, VALUE_PROPERTY};

use super::{AttributeStore, TreeGraph};

/// Default number of A→B→A levels.
pub const DEFAULT_DEPTH: u32 = 5;

/// Default number of children per parent.
pub const DEFAULT_FANOUT: u32 = 4;

/// Progress is logged every this many created nodes.
pub const CHUNK_SIZE: u64 = 10_000;

/// Depth and fanout of a generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeShape {
    /// Number of levels; each level adds a layer of B nodes and a layer of A nodes.
    pub depth: u32,
    /// Children per parent, for both layers.
    pub fanout: u32,
}

impl TreeShape {
    /// Create a shape; a zero depth or fanout falls back to the default.
    pub fn new(depth: u32, fanout: u32) -> Self {
        Self {
            depth: if depth > 0 { depth } else { DEFAULT_DEPTH },
            fanout: if fanout > 0 { fanout } else { DEFAULT_FANOUT },
        }
    }
}

impl Default for TreeShape {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH, DEFAULT_FANOUT)
    }
}

/// Total node count of a tree of this shape, `None` on overflow.
///
/// The root plus, for each level `i` in `1..=depth`, `fanout^(2i-1)` B nodes
/// and `fanout^(2i)` A nodes. The default shape gives 1 398 101 nodes.
pub fn expected_node_count(shape: TreeShape) -> Option<u64> {
    let fanout = shape.fanout as u64;
    let mut total: u64 = 1;
    let mut layer: u64 = 1;
    for _ in 0..shape.depth {
        layer = layer.checked_mul(fanout)?;
        total = total.checked_add(layer)?;
        layer = layer.checked_mul(fanout)?;
        total = total.checked_add(layer)?;
    }
    Some(total)
}

/// What [`populate`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulateReport {
    /// Shape that was generated.
    pub shape: TreeShape,
    /// The root node.
    pub root: NodeId,
    /// Nodes in the graph after generation.
    pub total_nodes: u64,
    /// B nodes whose `value` is true, i.e. the count a traversal should find.
    pub true_b_nodes: u64,
}

/// Generate a tree of `shape` into `graph`.
///
/// Refuses with [`TrvError::TreeExists`] when the graph already has a root.
/// Every node gets a random boolean `value` property.
pub fn populate(
    graph: &mut TreeGraph,
    shape: TreeShape,
    rng: &mut impl Rng,
) -> TrvResult<PopulateReport> {
    let roots = graph.find_root_nodes();
    if !roots.is_empty() {
        return Err(TrvError::TreeExists { roots: roots.len() });
    }
    let expected = expected_node_count(shape)
        .filter(|&n| usize::try_from(n).is_ok())
        .ok_or(TrvError::InvalidTreeShape {
            depth: shape.depth,
            fanout: shape.fanout,
        })?;
    info!(
        "Populating tree depth={} fanout={} ({} nodes)",
        shape.depth, shape.fanout, expected
    );

    let mut generator = Generator {
        graph,
        rng,
        created: 0,
        true_b_nodes: 0,
    };

    let root = generator.create(None, &[LabelKind::Root.name(), LabelKind::A.name()])?;
    let mut leaves = vec![root];
    for level in 1..=shape.depth {
        info!("Creating level {}", level);
        leaves = generator.create_level(&leaves, shape.fanout)?;
    }

    debug!("Populated {} nodes", generator.created);
    Ok(PopulateReport {
        shape,
        root,
        total_nodes: generator.graph.node_count() as u64,
        true_b_nodes: generator.true_b_nodes,
    })
}

struct Generator<'g, R> {
    graph: &'g mut TreeGraph,
    rng: &'g mut R,
    created: u64,
    true_b_nodes: u64,
}

impl<R: Rng> Generator<'_, R> {
    /// For each A leaf, `fanout` B children, each with `fanout` A children.
    /// Returns the new A leaves.
    fn create_level(&mut self, leaves: &[NodeId], fanout: u32) -> TrvResult<Vec<NodeId>> {
        let mut next = Vec::with_capacity(leaves.len() * (fanout as usize).pow(2));
        for &leaf in leaves {
            for _ in 0..fanout {
                let b = self.create(Some((leaf, RelationType::HasB)), &[LabelKind::B.name()])?;
                for _ in 0..fanout {
                    next.push(self.create(Some((b, RelationType::HasA)), &[LabelKind::A.name()])?);
                }
            }
        }
        Ok(next)
    }

    fn create(
        &mut self,
        parent: Option<(NodeId, RelationType)>,
        labels: &[&str],
    ) -> TrvResult<NodeId> {
        let id = match parent {
            Some((parent, relation)) => self.graph.add_child(parent, relation, labels)?,
            None => self.graph.add_node(labels)?,
        };
        let value = self.rng.gen_bool(0.5);
        self.graph.set_property(id, VALUE_PROPERTY, value)?;

        if value && labels.contains(&LabelKind::B.name()) {
            self.true_b_nodes += 1;
        }
        self.created += 1;
        if self.created % CHUNK_SIZE == 0 {
            info!("Created {} nodes", self.created);
        }
        Ok(id)
    }
}
