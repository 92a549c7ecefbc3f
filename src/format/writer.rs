//! Writes .ttree files from an in-memory graph.

use std::io::Write;
use std::path::Path;

use log::debug;

use crate::graph::tree_graph::NodeRecord;
use crate::graph::TreeGraph;
use crate::types::error::{TrvError, TrvResult};
use crate::types::header::{FileHeader, HEADER_SIZE};
use crate::types::{now_micros, Edge, PropertyValue};

use super::compression::compress_block;
use super::{EDGE_RECORD_SIZE, NODE_RECORD_SIZE};

/// Writer for .ttree binary files.
#[derive(Debug, Default)]
pub struct TreeWriter;

impl TreeWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Write a complete TreeGraph to a .ttree file.
    pub fn write_to_file(&self, graph: &TreeGraph, path: &Path) -> TrvResult<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(graph, &mut writer)?;
        debug!(
            "Wrote {} nodes and {} edges to {}",
            graph.node_count(),
            graph.edge_count(),
            path.display()
        );
        Ok(())
    }

    /// Write a complete TreeGraph to any writer.
    pub fn write_to(&self, graph: &TreeGraph, writer: &mut impl Write) -> TrvResult<()> {
        let nodes = graph.nodes();
        // Stable sort keeps each node's children in insertion order.
        let mut edges: Vec<Edge> = graph.edges().to_vec();
        edges.sort_by_key(|e| e.source_id);

        // Step 1: encode and compress labels + properties
        let mut attributes: Vec<u8> = Vec::new();
        for node in nodes {
            encode_attributes(&mut attributes, node)?;
        }
        let compressed = compress_block(&attributes);

        // Step 2: edge ranges per node
        let mut ranges: Vec<(u32, u32)> = vec![(0, 0); nodes.len()];
        let mut i = 0usize;
        while i < edges.len() {
            let source = edges[i].source_id as usize;
            let start = i;
            while i < edges.len() && edges[i].source_id as usize == source {
                i += 1;
            }
            if let Some(range) = ranges.get_mut(source) {
                *range = (start as u32, (i - start) as u32);
            }
        }

        // Step 3: section offsets
        let node_count = nodes.len() as u64;
        let edge_count = edges.len() as u64;
        let node_table_offset = HEADER_SIZE;
        let edge_table_offset = node_table_offset + node_count * NODE_RECORD_SIZE;
        let attribute_block_offset = edge_table_offset + edge_count * EDGE_RECORD_SIZE;

        let header = FileHeader {
            node_count,
            edge_count,
            node_table_offset,
            edge_table_offset,
            attribute_block_offset,
            attribute_block_size: compressed.len() as u64,
            ..FileHeader::new(now_micros())
        };
        header.write_to(writer)?;

        for (node, &(start, count)) in nodes.iter().zip(&ranges) {
            writer.write_all(&node.id.to_le_bytes())?; // 8 bytes
            writer.write_all(&start.to_le_bytes())?; // 4 bytes
            writer.write_all(&count.to_le_bytes())?; // 4 bytes
        }

        for edge in &edges {
            writer.write_all(&edge.source_id.to_le_bytes())?; // 8 bytes
            writer.write_all(&edge.target_id.to_le_bytes())?; // 8 bytes
            writer.write_all(&[edge.relation as u8])?; // 1 byte
            writer.write_all(&[0u8; 7])?; // 7 bytes padding
        }

        writer.write_all(&compressed)?;
        writer.flush()?;
        Ok(())
    }
}

/// Append one node's labels and properties to the attribute block.
///
/// Layout: label count (u8), each label as len (u8) + UTF-8; property count
/// (u8), each property as name len (u8) + UTF-8, type tag (u8), payload.
fn encode_attributes(buf: &mut Vec<u8>, node: &NodeRecord) -> TrvResult<()> {
    buf.push(small_len(node.labels.len(), node.id)?);
    for label in &node.labels {
        push_short_str(buf, label, node.id)?;
    }

    buf.push(small_len(node.properties.len(), node.id)?);
    for (name, value) in &node.properties {
        push_short_str(buf, name, node.id)?;
        buf.push(value.tag());
        match value {
            PropertyValue::Bool(b) => buf.push(*b as u8),
            PropertyValue::Int(i) => buf.extend_from_slice(&i.to_le_bytes()),
            PropertyValue::Str(s) => {
                let len = u32::try_from(s.len()).map_err(|_| TrvError::Corrupt(node.id))?;
                buf.extend_from_slice(&len.to_le_bytes());
                buf.extend_from_slice(s.as_bytes());
            }
        }
    }
    Ok(())
}

fn small_len(len: usize, node: u64) -> TrvResult<u8> {
    u8::try_from(len).map_err(|_| TrvError::Corrupt(node))
}

fn push_short_str(buf: &mut Vec<u8>, s: &str, node: u64) -> TrvResult<()> {
    buf.push(small_len(s.len(), node)?);
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}
