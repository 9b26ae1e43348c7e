//! Chunk lifecycle: restore or generate on load, flush and release on unload.

use std::sync::Arc;

use terrane_chunk::{Chunk, DetailGenerator, VoxelPool, detail_for};
use terrane_io::{ChunkStore, StoreError};
use terrane_world::{ChunkCoord, HeightField, WorldGenParams};

use crate::gpu::{ChunkBuffers, ReleaseQueue};
use crate::height_cache::HeightCache;

/// Shared, read-only state of the generation lane.
pub struct GenCtx {
    pub params: WorldGenParams,
    pub field: Arc<dyn HeightField>,
    pub heights: HeightCache,
    pub detail: Box<dyn DetailGenerator>,
    pub store: Arc<dyn ChunkStore>,
    pub pool: VoxelPool,
}

impl GenCtx {
    pub fn new(
        params: WorldGenParams,
        field: Arc<dyn HeightField>,
        store: Arc<dyn ChunkStore>,
        height_columns: usize,
        pool_retain: usize,
    ) -> Self {
        let detail = detail_for(&params);
        Self {
            params,
            field,
            heights: HeightCache::new(height_columns),
            detail,
            store,
            pool: VoxelPool::new(pool_retain),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Restored,
    Generated,
}

#[derive(Debug)]
pub enum Loaded {
    Chunk(Chunk, LoadSource),
    /// Empty and unmodified; the buffer is already back in the pool.
    KnownEmpty,
}

/// Restores `coord` from the store, falling back to terrain and detail generation.
pub fn load_chunk(coord: ChunkCoord, ctx: &GenCtx) -> Loaded {
    let mut voxels = ctx.pool.acquire();
    if let Some(bytes) = ctx.store.load(coord) {
        match Chunk::restore(coord, voxels, &bytes) {
            Ok(chunk) => {
                log::debug!(target: "chunk", "restored {:?}", coord);
                return Loaded::Chunk(chunk, LoadSource::Restored);
            }
            Err((buf, e)) => {
                log::warn!(target: "chunk", "regenerating {:?}: {}", coord, e);
                voxels = buf;
            }
        }
    }
    let heights = ctx.heights.get_or_sample(ctx.field.as_ref(), coord);
    let chunk = Chunk::build(
        coord,
        voxels,
        &heights,
        &ctx.params,
        ctx.detail.as_ref(),
        false,
    );
    if chunk.is_empty() && !chunk.is_modified() {
        ctx.pool.release(chunk.into_voxels());
        return Loaded::KnownEmpty;
    }
    Loaded::Chunk(chunk, LoadSource::Generated)
}

/// A filled, empty chunk for a known-empty cell that is about to be edited.
pub fn materialize_empty(coord: ChunkCoord, ctx: &GenCtx) -> Chunk {
    let heights = ctx.heights.get_or_sample(ctx.field.as_ref(), coord);
    Chunk::build(
        coord,
        ctx.pool.acquire(),
        &heights,
        &ctx.params,
        ctx.detail.as_ref(),
        true,
    )
}

/// Flushes a dirty chunk, queues its GPU buffers for deletion and returns
/// the voxel buffer to the pool. The buffer is released even when the
/// write fails.
pub fn unload_chunk(
    chunk: Chunk,
    buffers: Option<ChunkBuffers>,
    ctx: &GenCtx,
    release: &ReleaseQueue,
) -> Result<(), StoreError> {
    let coord = chunk.coord();
    let saved = if chunk.should_save() {
        let res = ctx.store.save(coord, &chunk.encode());
        if res.is_ok() {
            log::debug!(target: "chunk", "saved {:?}", coord);
        }
        res
    } else {
        Ok(())
    };
    if let Some(b) = buffers {
        release.push(&b);
    }
    ctx.pool.release(chunk.into_voxels());
    saved
}
