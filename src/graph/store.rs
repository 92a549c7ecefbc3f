//! Read-only access to a labelled, typed property graph.

use crate::types::{LabelKind, NodeId, PropertyValue, RelationType, TrvResult};

/// The backing store the facade and the traversal read from.
///
/// Implementations answer every call from their current state; memoization is
/// the facade's job, not the store's.
pub trait AttributeStore {
    /// All nodes carrying `label`, in id order.
    fn nodes_with_label(&self, label: &str) -> Vec<NodeId>;

    /// Nodes carrying the distinguished root label.
    fn find_root_nodes(&self) -> Vec<NodeId> {
        self.nodes_with_label(LabelKind::Root.name())
    }

    /// Every label name on `node`.
    fn labels(&self, node: NodeId) -> TrvResult<Vec<&str>>;

    /// Whether `node` carries `label`.
    fn has_label(&self, node: NodeId, label: &str) -> TrvResult<bool> {
        Ok(self.labels(node)?.contains(&label))
    }

    /// The value of property `name` on `node`; fails with
    /// [`TrvError::PropertyNotFound`](crate::types::TrvError::PropertyNotFound)
    /// when absent.
    fn property(&self, node: NodeId, name: &str) -> TrvResult<PropertyValue>;

    /// Targets of the outgoing `relation` edges of `node`, in insertion order.
    fn outgoing(&self, node: NodeId, relation: RelationType) -> TrvResult<&[NodeId]>;
}
