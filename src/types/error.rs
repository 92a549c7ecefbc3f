//! Error types for the tree-traversal library.

use thiserror::Error;

/// All errors that can occur in the tree-traversal library.
#[derive(Error, Debug)]
pub enum TrvError {
    /// Node not found by ID.
    #[error("Node ID {0} not found")]
    NodeNotFound(u64),

    /// Edge references an invalid node ID.
    #[error("Edge references invalid node ID: {0}")]
    InvalidEdgeTarget(u64),

    /// Self-edge not allowed.
    #[error("Self-edge not allowed on node {0}")]
    SelfEdge(u64),

    /// The node does not carry the requested property.
    #[error("Node {node} has no property '{name}'")]
    PropertyNotFound { node: u64, name: String },

    /// The property exists but holds a value of another type.
    #[error("Property '{name}' on node {node} is not a {expected}")]
    PropertyType {
        node: u64,
        name: String,
        expected: &'static str,
    },

    /// A node would carry more labels or properties than the format allows.
    #[error("Node {node} would exceed the limit of {limit} {what}")]
    LimitExceeded {
        node: u64,
        what: &'static str,
        limit: usize,
    },

    /// A tree is already present in the store.
    #[error("A tree already exists ({roots} root node(s))")]
    TreeExists { roots: usize },

    /// Depth or fanout would overflow the node id space.
    #[error("Tree shape depth={depth} fanout={fanout} is too large")]
    InvalidTreeShape { depth: u32, fanout: u32 },

    /// Invalid magic bytes in file header.
    #[error("Invalid magic bytes in file header")]
    InvalidMagic,

    /// Unsupported format version.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// File is empty or truncated.
    #[error("File is empty or truncated")]
    Truncated,

    /// Corrupt data at a given offset.
    #[error("Corrupt data at offset {0}")]
    Corrupt(u64),

    /// Compression error.
    #[error("Compression error: {0}")]
    Compression(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for tree-traversal operations.
pub type TrvResult<T> = Result<T, TrvError>;
