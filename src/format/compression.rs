//! LZ4 compression of the attribute block.

use crate::types::error::{TrvError, TrvResult};

/// Upper bound of LZ4 output bytes per input byte.
const MAX_EXPANSION: usize = 255;

/// Compress a block with LZ4 (prepend size for decompression).
pub fn compress_block(block: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(block)
}

/// Decompress an LZ4-compressed block.
///
/// The prepended size is checked against what the payload could possibly
/// expand to before any buffer is allocated for it.
pub fn decompress_block(data: &[u8]) -> TrvResult<Vec<u8>> {
    if data.len() < 4 {
        return Err(TrvError::Compression(format!(
            "block of {} bytes has no size prefix",
            data.len()
        )));
    }
    let declared = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let payload = &data[4..];
    let bound = payload.len().saturating_mul(MAX_EXPANSION);
    if declared > bound {
        return Err(TrvError::Compression(format!(
            "declared size {} exceeds the {} bytes a {}-byte block can expand to",
            declared,
            bound,
            payload.len()
        )));
    }
    lz4_flex::decompress(payload, declared).map_err(|e| TrvError::Compression(e.to_string()))
}
