//! File header for .ttree snapshot files.

use std::io::{Read, Write};

use crate::types::error::{TrvError, TrvResult};
use crate::types::{FORMAT_VERSION, TTREE_MAGIC};

/// Header of a .ttree file. Fixed size: 64 bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileHeader {
    /// Magic bytes: [0x54, 0x54, 0x52, 0x45] ("TTRE").
    pub magic: [u8; 4],
    /// Format version (currently 1).
    pub version: u32,
    /// When the snapshot was written (Unix epoch microseconds).
    pub created_at: u64,
    /// Total number of nodes in the file.
    pub node_count: u64,
    /// Total number of edges in the file.
    pub edge_count: u64,
    /// Byte offset where the node table starts.
    pub node_table_offset: u64,
    /// Byte offset where the edge table starts.
    pub edge_table_offset: u64,
    /// Byte offset where the compressed attribute block starts.
    pub attribute_block_offset: u64,
    /// Size in bytes of the compressed attribute block.
    pub attribute_block_size: u64,
}

/// The fixed size of a FileHeader on disk: 64 bytes.
pub const HEADER_SIZE: u64 = 64;

impl FileHeader {
    /// Create a new header with default magic and version and empty sections.
    pub fn new(created_at: u64) -> Self {
        Self {
            magic: TTREE_MAGIC,
            version: FORMAT_VERSION,
            created_at,
            node_count: 0,
            edge_count: 0,
            node_table_offset: HEADER_SIZE,
            edge_table_offset: HEADER_SIZE,
            attribute_block_offset: HEADER_SIZE,
            attribute_block_size: 0,
        }
    }

    /// Write this header to the given writer. Writes exactly 64 bytes.
    ///
    /// Layout (all little-endian):
    /// - 0x00..0x04: magic (4 bytes)
    /// - 0x04..0x08: version (u32)
    /// - 0x08..0x10: created_at (u64)
    /// - 0x10..0x18: node_count (u64)
    /// - 0x18..0x20: edge_count (u64)
    /// - 0x20..0x28: node_table_offset (u64)
    /// - 0x28..0x30: edge_table_offset (u64)
    /// - 0x30..0x38: attribute_block_offset (u64)
    /// - 0x38..0x40: attribute_block_size (u64)
    pub fn write_to(&self, writer: &mut impl Write) -> TrvResult<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.created_at.to_le_bytes())?;
        writer.write_all(&self.node_count.to_le_bytes())?;
        writer.write_all(&self.edge_count.to_le_bytes())?;
        writer.write_all(&self.node_table_offset.to_le_bytes())?;
        writer.write_all(&self.edge_table_offset.to_le_bytes())?;
        writer.write_all(&self.attribute_block_offset.to_le_bytes())?;
        writer.write_all(&self.attribute_block_size.to_le_bytes())?;
        Ok(())
    }

    /// Read a header from the given reader. Reads exactly 64 bytes.
    pub fn read_from(reader: &mut impl Read) -> TrvResult<Self> {
        let mut buf = [0u8; 64];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                TrvError::Truncated
            } else {
                TrvError::Io(e)
            }
        })?;

        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if magic != TTREE_MAGIC {
            return Err(TrvError::InvalidMagic);
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != FORMAT_VERSION {
            return Err(TrvError::UnsupportedVersion(version));
        }

        Ok(Self {
            magic,
            version,
            created_at: read_u64(&buf, 8),
            node_count: read_u64(&buf, 16),
            edge_count: read_u64(&buf, 24),
            node_table_offset: read_u64(&buf, 32),
            edge_table_offset: read_u64(&buf, 40),
            attribute_block_offset: read_u64(&buf, 48),
            attribute_block_size: read_u64(&buf, 56),
        })
    }
}

fn read_u64(buf: &[u8; 64], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(bytes)
}
