//! Reads .ttree files into an in-memory graph.

use std::path::Path;

use log::debug;
use memmap2::Mmap;

use crate::graph::tree_graph::NodeRecord;
use crate::graph::TreeGraph;
use crate::types::error::{TrvError, TrvResult};
use crate::types::header::{FileHeader, HEADER_SIZE};
use crate::types::{Edge, PropertyValue, RelationType};

use super::compression::decompress_block;
use super::{EDGE_RECORD_SIZE, NODE_RECORD_SIZE};

/// Reader for .ttree binary files.
pub struct TreeReader;

impl TreeReader {
    /// Read a .ttree file into a TreeGraph, through a read-only memory map.
    pub fn read_from_file(path: &Path) -> TrvResult<TreeGraph> {
        let file = std::fs::File::open(path)?;
        if file.metadata()?.len() < HEADER_SIZE {
            return Err(TrvError::Truncated);
        }
        let mmap = unsafe { Mmap::map(&file)? };
        let graph = Self::read_from_bytes(&mmap)?;
        debug!(
            "Read {} nodes and {} edges from {}",
            graph.node_count(),
            graph.edge_count(),
            path.display()
        );
        Ok(graph)
    }

    /// Read a TreeGraph from an in-memory .ttree image.
    pub fn read_from_bytes(data: &[u8]) -> TrvResult<TreeGraph> {
        if data.len() < HEADER_SIZE as usize {
            return Err(TrvError::Truncated);
        }
        let header = FileHeader::read_from(&mut std::io::Cursor::new(&data[..64]))?;

        let node_count = header.node_count as usize;
        let edge_count = header.edge_count as usize;

        // Edge table
        let edge_table = section(
            data,
            header.edge_table_offset,
            header.edge_count.checked_mul(EDGE_RECORD_SIZE),
        )?;
        let mut edges: Vec<Edge> = Vec::with_capacity(edge_count);
        for (i, record) in edge_table
            .chunks_exact(EDGE_RECORD_SIZE as usize)
            .enumerate()
        {
            let relation = RelationType::from_u8(record[16]).ok_or_else(|| {
                TrvError::Corrupt(header.edge_table_offset + i as u64 * EDGE_RECORD_SIZE + 16)
            })?;
            edges.push(Edge::new(le_u64(&record[0..8]), le_u64(&record[8..16]), relation));
        }

        // Node table, checked against the edge table
        let node_table = section(
            data,
            header.node_table_offset,
            header.node_count.checked_mul(NODE_RECORD_SIZE),
        )?;
        let mut ids: Vec<u64> = Vec::with_capacity(node_count);
        for (i, record) in node_table
            .chunks_exact(NODE_RECORD_SIZE as usize)
            .enumerate()
        {
            let id = le_u64(&record[0..8]);
            let start = le_u32(&record[8..12]) as usize;
            let count = le_u32(&record[12..16]) as usize;
            let offset = header.node_table_offset + i as u64 * NODE_RECORD_SIZE;
            let outgoing = start
                .checked_add(count)
                .and_then(|end| edges.get(start..end))
                .ok_or(TrvError::Corrupt(offset + 8))?;
            if outgoing.iter().any(|e| e.source_id != id) {
                return Err(TrvError::Corrupt(offset));
            }
            ids.push(id);
        }

        // Attribute block
        let compressed = section(
            data,
            header.attribute_block_offset,
            Some(header.attribute_block_size),
        )?;
        let attributes = decompress_block(compressed)?;
        let mut cursor = BlockCursor::new(&attributes, header.attribute_block_offset);
        let mut nodes: Vec<NodeRecord> = Vec::with_capacity(node_count);
        for id in ids {
            nodes.push(cursor.node(id)?);
        }

        TreeGraph::from_parts(nodes, edges)
    }
}

/// The `len` bytes at `offset`, or `Truncated`.
fn section(data: &[u8], offset: u64, len: Option<u64>) -> TrvResult<&[u8]> {
    let start = usize::try_from(offset).map_err(|_| TrvError::Truncated)?;
    let len = len
        .and_then(|l| usize::try_from(l).ok())
        .ok_or(TrvError::Truncated)?;
    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or(TrvError::Truncated)
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// Sequential decoder over the decompressed attribute block.
struct BlockCursor<'a> {
    data: &'a [u8],
    pos: usize,
    /// File offset of the block, for error reporting.
    base: u64,
}

impl<'a> BlockCursor<'a> {
    fn new(data: &'a [u8], base: u64) -> Self {
        Self { data, pos: 0, base }
    }

    fn corrupt(&self) -> TrvError {
        TrvError::Corrupt(self.base + self.pos as u64)
    }

    fn take(&mut self, n: usize) -> TrvResult<&'a [u8]> {
        let bytes = self
            .pos
            .checked_add(n)
            .and_then(|end| self.data.get(self.pos..end))
            .ok_or(TrvError::Truncated)?;
        self.pos += n;
        Ok(bytes)
    }

    fn u8(&mut self) -> TrvResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn string(&mut self, len: usize) -> TrvResult<String> {
        let at = self.corrupt();
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| at)
    }

    fn node(&mut self, id: u64) -> TrvResult<NodeRecord> {
        let label_count = self.u8()? as usize;
        let mut labels = Vec::with_capacity(label_count);
        for _ in 0..label_count {
            let len = self.u8()? as usize;
            labels.push(self.string(len)?);
        }

        let property_count = self.u8()? as usize;
        let mut properties = Vec::with_capacity(property_count);
        for _ in 0..property_count {
            let len = self.u8()? as usize;
            let name = self.string(len)?;
            let value = match self.u8()? {
                0 => PropertyValue::Bool(self.u8()? != 0),
                1 => PropertyValue::Int(le_u64(self.take(8)?) as i64),
                2 => {
                    let len = le_u32(self.take(4)?) as usize;
                    PropertyValue::Str(self.string(len)?)
                }
                _ => {
                    self.pos -= 1;
                    return Err(self.corrupt());
                }
            };
            properties.push((name, value));
        }

        Ok(NodeRecord {
            id,
            labels,
            properties,
        })
    }
}
