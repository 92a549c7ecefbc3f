//! Binary file I/O for .ttree snapshot files.

pub mod compression;
pub mod reader;
pub mod writer;

pub use reader::TreeReader;
pub use writer::TreeWriter;

/// Size of a single node record on disk: 16 bytes.
pub const NODE_RECORD_SIZE: u64 = 16;

/// Size of a single edge record on disk: 24 bytes.
pub const EDGE_RECORD_SIZE: u64 = 24;
