//! Chunk file layout: 4096 little-endian `u16` block ids, 4096 brightness
//! bytes, one detail-generated byte. No header.

use terrane_blocks::Block;

use crate::voxels::{CHUNK_VOLUME, Voxels};

const BLOCK_BYTES: usize = CHUNK_VOLUME * 2;
pub const CHUNK_FILE_LEN: usize = BLOCK_BYTES + CHUNK_VOLUME + 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("chunk file truncated: {len} of {CHUNK_FILE_LEN} bytes")]
    Truncated { len: usize },
}

pub fn encode(voxels: &Voxels, detail_generated: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHUNK_FILE_LEN);
    for b in voxels.blocks() {
        out.extend_from_slice(&b.id().to_le_bytes());
    }
    out.extend_from_slice(voxels.brightness_slice());
    out.push(u8::from(detail_generated));
    out
}

/// Overwrites `voxels` from `bytes` and returns the detail-generated flag.
/// Bytes past the fixed layout are ignored.
pub fn decode_into(voxels: &mut Voxels, bytes: &[u8]) -> Result<bool, DecodeError> {
    if bytes.len() < CHUNK_FILE_LEN {
        return Err(DecodeError::Truncated { len: bytes.len() });
    }
    let (block_bytes, rest) = bytes.split_at(BLOCK_BYTES);
    for (dst, pair) in voxels
        .blocks_mut()
        .iter_mut()
        .zip(block_bytes.chunks_exact(2))
    {
        *dst = Block(u16::from_le_bytes([pair[0], pair[1]]));
    }
    voxels
        .brightness_mut()
        .copy_from_slice(&rest[..CHUNK_VOLUME]);
    Ok(rest[CHUNK_VOLUME] != 0)
}
