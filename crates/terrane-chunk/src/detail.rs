use terrane_blocks::Block;
use terrane_world::{ChunkCoord, DetailMode, WorldGenParams};

use crate::voxels::{CHUNK_DIM, Voxels};

/// Sparse decoration pass run after terrain on non-empty chunks.
pub trait DetailGenerator: Send + Sync {
    /// Returns the number of features placed.
    fn decorate(&self, coord: ChunkCoord, voxels: &mut Voxels) -> usize;
}

/// Leaves terrain untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDetail;

impl DetailGenerator for NoDetail {
    fn decorate(&self, _coord: ChunkCoord, _voxels: &mut Voxels) -> usize {
        0
    }
}

/// Trees on grass, picked per voxel by a deterministic hash. Trees that would
/// leave the chunk are skipped so no neighbouring chunk is written.
#[derive(Clone, Copy, Debug)]
pub struct TreeDetail {
    pub seed: u32,
    pub probability: f32,
    pub trunk_min: i32,
    pub trunk_max: i32,
    pub leaf_radius: i32,
}

impl TreeDetail {
    pub fn new(seed: u32, probability: f32) -> Self {
        Self {
            seed,
            probability,
            trunk_min: 4,
            trunk_max: 6,
            leaf_radius: 2,
        }
    }

    fn fits(&self, x: i32, y: i32, z: i32, trunk: i32) -> bool {
        let r = self.leaf_radius;
        let dim = CHUNK_DIM as i32;
        x - r >= 0 && x + r < dim && z - r >= 0 && z + r < dim && y + trunk + 1 < dim
    }

    fn place(&self, voxels: &mut Voxels, x: i32, y: i32, z: i32, trunk: i32) {
        let top = y + trunk;
        for ly in (top - 1)..=(top + 1) {
            let r = if ly <= top { self.leaf_radius } else { 1 };
            for lx in (x - r)..=(x + r) {
                for lz in (z - r)..=(z + r) {
                    let (ux, uy, uz) = (lx as usize, ly as usize, lz as usize);
                    if voxels.block(ux, uy, uz).is_air() {
                        voxels.set_block(ux, uy, uz, Block::LEAF);
                    }
                }
            }
        }
        for ty in (y + 1)..=top {
            voxels.set_block(x as usize, ty as usize, z as usize, Block::WOOD);
        }
    }
}

impl DetailGenerator for TreeDetail {
    fn decorate(&self, coord: ChunkCoord, voxels: &mut Voxels) -> usize {
        let (bx, by, bz) = coord.base();
        let mut placed = 0;
        for x in 0..CHUNK_DIM {
            for z in 0..CHUNK_DIM {
                for y in 0..CHUNK_DIM {
                    if voxels.block(x, y, z) != Block::GRASS {
                        continue;
                    }
                    let (wx, wy, wz) = (bx + x as i32, by + y as i32, bz + z as i32);
                    if rand01(self.seed, wx, wz, wy as u32) >= self.probability {
                        continue;
                    }
                    let span = (self.trunk_max - self.trunk_min + 1).max(1) as u32;
                    let trunk = self.trunk_min
                        + (hash2(wx, wz, self.seed ^ 0x5bd1_e995) % span) as i32;
                    let (lx, ly, lz) = (x as i32, y as i32, z as i32);
                    if !self.fits(lx, ly, lz, trunk) {
                        continue;
                    }
                    // Only plant into open air above the grass.
                    if !voxels.block(x, y + 1, z).is_air() {
                        continue;
                    }
                    self.place(voxels, lx, ly, lz, trunk);
                    voxels.set_block(x, y, z, Block::DIRT);
                    placed += 1;
                }
            }
        }
        if placed > 0 {
            log::debug!(target: "chunk", "placed {} trees in {:?}", placed, coord);
        }
        placed
    }
}

/// Detail pass selected by the worldgen config.
pub fn detail_for(params: &WorldGenParams) -> Box<dyn DetailGenerator> {
    match params.detail {
        DetailMode::None => Box::new(NoDetail),
        DetailMode::Trees => Box::new(TreeDetail::new(params.seed, params.tree_probability)),
    }
}

#[inline]
fn hash2(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

#[inline]
fn rand01(seed: u32, ix: i32, iz: i32, salt: u32) -> f32 {
    let h = hash2(ix, iz, (seed ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}
