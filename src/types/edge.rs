//! Relation types and the core edge struct.

use serde::Serialize;

use super::NodeId;

/// The type of a directed relationship between two tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum RelationType {
    /// From a `B` node to one of its `A` children.
    HasA = 0,
    /// From an `A` node to one of its `B` children.
    HasB = 1,
}

impl RelationType {
    /// Convert a u8 value to a RelationType, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::HasA),
            1 => Some(Self::HasB),
            _ => None,
        }
    }

    /// Return the name of this relation as stored in the graph.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HasA => "HAS_A",
            Self::HasB => "HAS_B",
        }
    }

    /// Parse a relation type from its name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "HAS_A" | "HASA" => Some(Self::HasA),
            "HAS_B" | "HASB" => Some(Self::HasB),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A directed, typed relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source node ID (the parent).
    pub source_id: NodeId,
    /// Target node ID (the child).
    pub target_id: NodeId,
    /// Type of relationship.
    pub relation: RelationType,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source_id: NodeId, target_id: NodeId, relation: RelationType) -> Self {
        Self {
            source_id,
            target_id,
            relation,
        }
    }
}
