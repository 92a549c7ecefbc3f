//! All data types for the tree-traversal library.

pub mod edge;
pub mod error;
pub mod header;
pub mod label;
pub mod value;

pub use edge::{Edge, RelationType};
pub use error::{TrvError, TrvResult};
pub use header::{FileHeader, HEADER_SIZE};
pub use label::{LabelBitmask, LabelKind};
pub use value::PropertyValue;

/// Node identifier, dense and stable for the node's lifetime.
pub type NodeId = u64;

/// Magic bytes at the start of every .ttree file.
pub const TTREE_MAGIC: [u8; 4] = [0x54, 0x54, 0x52, 0x45]; // "TTRE"

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Name of the boolean property inspected by the counting predicate.
pub const VALUE_PROPERTY: &str = "value";

/// Maximum labels per node in the snapshot format.
pub const MAX_LABELS_PER_NODE: usize = 255;

/// Maximum properties per node in the snapshot format.
pub const MAX_PROPERTIES_PER_NODE: usize = 255;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}
