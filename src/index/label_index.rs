//! Index by label. Maps each label name to sorted node IDs.

use std::collections::HashMap;

use crate::graph::tree_graph::NodeRecord;
use crate::types::NodeId;

/// Maps each label name to a sorted list of node IDs carrying it.
pub struct LabelIndex {
    index: HashMap<String, Vec<NodeId>>,
}

impl LabelIndex {
    /// Create a new, empty label index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get all node IDs carrying a label.
    pub fn get(&self, label: &str) -> &[NodeId] {
        self.index
            .get(label)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Count nodes carrying a label.
    pub fn count(&self, label: &str) -> usize {
        self.index.get(label).map(|v| v.len()).unwrap_or(0)
    }

    /// All label names present in the index, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Rebuild the entire index from a slice of nodes.
    pub fn rebuild(&mut self, nodes: &[NodeRecord]) {
        self.index.clear();
        for node in nodes {
            for label in &node.labels {
                self.index.entry(label.clone()).or_default().push(node.id);
            }
        }
        for list in self.index.values_mut() {
            list.sort_unstable();
            list.dedup();
        }
    }

    /// Incrementally add one label of a node.
    pub fn add(&mut self, id: NodeId, label: &str) {
        if let Some(list) = self.index.get_mut(label) {
            // Ids are handed out in increasing order, so this is almost always a push.
            if let Err(pos) = list.binary_search(&id) {
                list.insert(pos, id);
            }
            return;
        }
        self.index.insert(label.to_string(), vec![id]);
    }

    /// Number of total entries across all labels.
    pub fn len(&self) -> usize {
        self.index.values().map(|v| v.len()).sum()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LabelIndex {
    fn default() -> Self {
        Self::new()
    }
}
