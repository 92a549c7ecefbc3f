//! Core graph structure: labelled nodes with properties, typed edges, adjacency.

use std::collections::HashMap;

use serde::Serialize;

use crate::index::LabelIndex;
use crate::types::{
    Edge, NodeId, PropertyValue, RelationType, TrvError, TrvResult, MAX_LABELS_PER_NODE,
    MAX_PROPERTIES_PER_NODE,
};

use super::AttributeStore;

/// A node: its labels and its properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    /// Dense identifier, equal to the node's position in the graph.
    pub id: NodeId,
    /// Label names, in insertion order, without duplicates.
    pub labels: Vec<String>,
    /// Properties, in insertion order.
    pub properties: Vec<(String, PropertyValue)>,
}

impl NodeRecord {
    /// Create a node with the given labels and no properties.
    pub fn new(id: NodeId, labels: &[&str]) -> Self {
        let mut record = Self {
            id,
            labels: Vec::with_capacity(labels.len()),
            properties: Vec::new(),
        };
        for label in labels {
            if !record.has_label(label) {
                record.labels.push(label.to_string());
            }
        }
        record
    }

    /// Whether the node carries `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The value of property `name`, if set.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Set or replace property `name`.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((name.to_string(), value)),
        }
    }
}

/// The in-memory graph store holding the tree.
pub struct TreeGraph {
    /// All nodes, indexed by ID.
    nodes: Vec<NodeRecord>,
    /// All edges, in insertion order.
    edges: Vec<Edge>,
    /// Adjacency index: (source_id, relation) -> target ids in insertion order.
    adjacency: HashMap<(NodeId, RelationType), Vec<NodeId>>,
    /// Label index.
    label_index: LabelIndex,
}

impl TreeGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: HashMap::new(),
            label_index: LabelIndex::new(),
        }
    }

    /// Create an empty graph with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(nodes.saturating_sub(1)),
            adjacency: HashMap::with_capacity(nodes),
            label_index: LabelIndex::new(),
        }
    }

    /// Create from pre-existing data (used by the reader).
    ///
    /// Node ids must be dense: the node at position `i` has id `i`.
    pub fn from_parts(nodes: Vec<NodeRecord>, edges: Vec<Edge>) -> TrvResult<Self> {
        for (i, node) in nodes.iter().enumerate() {
            if node.id != i as u64 {
                return Err(TrvError::Corrupt(i as u64));
            }
        }

        let mut graph = Self {
            nodes,
            edges: Vec::with_capacity(edges.len()),
            adjacency: HashMap::new(),
            label_index: LabelIndex::new(),
        };
        graph.label_index.rebuild(&graph.nodes);

        for edge in edges {
            graph.add_edge(edge)?;
        }

        Ok(graph)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id as usize)
    }

    fn node(&self, id: NodeId) -> TrvResult<&NodeRecord> {
        self.get_node(id).ok_or(TrvError::NodeNotFound(id))
    }

    /// Get all nodes (immutable slice).
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Get all edges (immutable slice).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the label index.
    pub fn label_index(&self) -> &LabelIndex {
        &self.label_index
    }

    /// Add a node with the given labels, returns the assigned ID.
    ///
    /// Fails with [`TrvError::LimitExceeded`] when the distinct labels do not
    /// fit the snapshot format.
    pub fn add_node(&mut self, labels: &[&str]) -> TrvResult<NodeId> {
        let id = self.nodes.len() as NodeId;
        let record = NodeRecord::new(id, labels);
        if record.labels.len() > MAX_LABELS_PER_NODE {
            return Err(TrvError::LimitExceeded {
                node: id,
                what: "labels",
                limit: MAX_LABELS_PER_NODE,
            });
        }
        for label in &record.labels {
            self.label_index.add(id, label);
        }
        self.nodes.push(record);
        Ok(id)
    }

    /// Set or replace a property on an existing node.
    pub fn set_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> TrvResult<()> {
        let node = self
            .nodes
            .get_mut(id as usize)
            .ok_or(TrvError::NodeNotFound(id))?;
        if node.property(name).is_none() && node.properties.len() >= MAX_PROPERTIES_PER_NODE {
            return Err(TrvError::LimitExceeded {
                node: id,
                what: "properties",
                limit: MAX_PROPERTIES_PER_NODE,
            });
        }
        node.set_property(name, value.into());
        Ok(())
    }

    /// Add an edge between two existing nodes.
    pub fn add_edge(&mut self, edge: Edge) -> TrvResult<()> {
        if edge.source_id == edge.target_id {
            return Err(TrvError::SelfEdge(edge.source_id));
        }
        if self.get_node(edge.source_id).is_none() {
            return Err(TrvError::NodeNotFound(edge.source_id));
        }
        if self.get_node(edge.target_id).is_none() {
            return Err(TrvError::InvalidEdgeTarget(edge.target_id));
        }

        self.adjacency
            .entry((edge.source_id, edge.relation))
            .or_default()
            .push(edge.target_id);
        self.edges.push(edge);
        Ok(())
    }

    /// Add a node and connect it below `parent` in one step.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        relation: RelationType,
        labels: &[&str],
    ) -> TrvResult<NodeId> {
        if self.get_node(parent).is_none() {
            return Err(TrvError::NodeNotFound(parent));
        }
        let child = self.add_node(labels)?;
        self.add_edge(Edge::new(parent, child, relation))?;
        Ok(child)
    }
}

impl Default for TreeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeStore for TreeGraph {
    fn nodes_with_label(&self, label: &str) -> Vec<NodeId> {
        self.label_index.get(label).to_vec()
    }

    fn labels(&self, node: NodeId) -> TrvResult<Vec<&str>> {
        Ok(self.node(node)?.labels.iter().map(String::as_str).collect())
    }

    fn has_label(&self, node: NodeId, label: &str) -> TrvResult<bool> {
        Ok(self.node(node)?.has_label(label))
    }

    fn property(&self, node: NodeId, name: &str) -> TrvResult<PropertyValue> {
        self.node(node)?
            .property(name)
            .cloned()
            .ok_or_else(|| TrvError::PropertyNotFound {
                node,
                name: name.to_string(),
            })
    }

    fn outgoing(&self, node: NodeId, relation: RelationType) -> TrvResult<&[NodeId]> {
        self.node(node)?;
        Ok(self
            .adjacency
            .get(&(node, relation))
            .map(|v| v.as_slice())
            .unwrap_or(&[]))
    }
}
