use terrane_blocks::{Block, Brightness};
use terrane_world::{ChunkCoord, HeightSamples, WorldGenParams};

use crate::voxels::{CHUNK_DIM, Voxels};

const DIM: i32 = CHUNK_DIM as i32;

#[inline]
fn clamp_local(v: i32) -> usize {
    v.clamp(0, DIM) as usize
}

/// Fills `voxels` with terrain for `coord` and returns whether the chunk is empty.
///
/// Empty chunks (above the ceiling, below zero, or above the column's high
/// bound) are only written when `init_if_empty` is set. Chunks below the
/// column's low bound are solid unlit rock.
pub fn generate_terrain(
    coord: ChunkCoord,
    voxels: &mut Voxels,
    heights: &HeightSamples,
    params: &WorldGenParams,
    init_if_empty: bool,
) -> bool {
    let cy = coord.cy;
    let br = &params.brightness;
    let sky = br.sky_clamped();

    if cy > params.max_chunk_y {
        if init_if_empty {
            voxels.fill(Block::AIR, sky);
        }
        return true;
    }
    if cy < 0 {
        if init_if_empty {
            voxels.fill(Block::AIR, br.min);
        }
        return true;
    }

    let (low, high) =
        heights.lattice_bounds(params.water_level, params.low_margin, params.high_margin);
    if cy > high {
        if init_if_empty {
            voxels.fill(Block::AIR, sky);
        }
        return true;
    }
    if cy < low {
        voxels.fill(Block::ROCK, 0);
        if cy == 0 {
            lay_bedrock(voxels);
        }
        return false;
    }

    voxels.fill(Block::AIR, 0);
    let base = cy * DIM;
    let wh = params.water_level - base;
    let sh = wh + params.shore_offset;
    let soil = params.topsoil_depth;
    let mut empty = true;

    for x in 0..CHUNK_DIM {
        for z in 0..CHUNK_DIM {
            let h = heights.get(x, z) - base;
            if h >= 0 || wh >= 0 {
                empty = false;
            }

            if h > sh && h > wh + 1 {
                if (0..DIM).contains(&h) {
                    voxels.set_block(x, h as usize, z, Block::GRASS);
                }
                for y in clamp_local(h - soil)..clamp_local(h) {
                    voxels.set_block(x, y, z, Block::DIRT);
                }
            } else {
                for y in clamp_local(h - soil)..clamp_local(h + 1) {
                    voxels.set_block(x, y, z, Block::SAND);
                }
                let minh = clamp_local(h + 1);
                let maxh = clamp_local(wh + 1);
                if maxh > minh {
                    let depth = params.water_level - (maxh as i32 - 1 + base);
                    let mut cur = water_surface_brightness(params, depth);
                    for y in (minh..maxh).rev() {
                        voxels.set(x, y, z, Block::WATER, cur);
                        cur = br.clamp(i32::from(cur) - 2);
                    }
                }
            }

            for y in 0..clamp_local(h - soil) {
                voxels.set_block(x, y, z, Block::ROCK);
            }
            for y in clamp_local((h + 1).max(wh + 1))..CHUNK_DIM {
                voxels.set(x, y, z, Block::AIR, sky);
            }
            if cy == 0 {
                voxels.set_block(x, 0, z, Block::BEDROCK);
            }
        }
    }
    log::trace!(target: "chunk", "terrain {:?} empty={}", coord, empty);
    empty
}

fn lay_bedrock(voxels: &mut Voxels) {
    for x in 0..CHUNK_DIM {
        for z in 0..CHUNK_DIM {
            voxels.set_block(x, 0, z, Block::BEDROCK);
        }
    }
}

/// Brightness at the top water voxel for a surface `depth` voxels below the water level.
#[inline]
pub fn water_surface_brightness(params: &WorldGenParams, depth: i32) -> Brightness {
    let br = &params.brightness;
    br.clamp(i32::from(br.max) - depth * 2)
}
