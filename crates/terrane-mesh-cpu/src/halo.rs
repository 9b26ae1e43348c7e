use terrane_blocks::{Block, Brightness, BrightnessRange};

use crate::constants::{HALO_VOLUME, HALO_X_STRIDE, HALO_Y_STRIDE};
use crate::neighbors::{Neighbor, NeighborRing};

/// Halo cell index for local coordinates in `[-1, 16]`.
#[inline]
pub fn halo_index(x: i32, y: i32, z: i32) -> usize {
    (x + 1) as usize * HALO_X_STRIDE + (y + 1) as usize * HALO_Y_STRIDE + (z + 1) as usize
}

#[inline]
fn split(l: i32) -> (i32, usize) {
    if l < 0 {
        (-1, 15)
    } else if l > 15 {
        (1, 0)
    } else {
        (0, l as usize)
    }
}

/// 18x18x18 copy of a chunk and the boundary voxels of its 26 neighbours.
/// Built per mesh build and read-only afterwards.
pub struct Halo {
    blocks: Box<[Block]>,
    brightness: Box<[Brightness]>,
}

impl Halo {
    /// Unloaded neighbours read as rock at sky brightness so no face is
    /// generated toward them. Known-empty neighbours read as air, lit by the
    /// sky unless they lie below layer zero.
    pub fn build(ring: &NeighborRing<'_>, light: &BrightnessRange) -> Self {
        let sky = light.sky_clamped();
        let cy = ring.coord().cy;
        let mut blocks = vec![Block::AIR; HALO_VOLUME].into_boxed_slice();
        let mut brightness = vec![0 as Brightness; HALO_VOLUME].into_boxed_slice();
        let mut i = 0;
        for hx in -1..=16 {
            let (dx, lx) = split(hx);
            for hy in -1..=16 {
                let (dy, ly) = split(hy);
                for hz in -1..=16 {
                    let (dz, lz) = split(hz);
                    let (b, br) = match ring.get(dx, dy, dz) {
                        Neighbor::Unloaded => (Block::ROCK, sky),
                        Neighbor::KnownEmpty if cy + dy < 0 => (Block::AIR, light.min),
                        Neighbor::KnownEmpty => (Block::AIR, sky),
                        Neighbor::Loaded(v) => (v.block(lx, ly, lz), v.brightness(lx, ly, lz)),
                    };
                    blocks[i] = b;
                    brightness[i] = br;
                    i += 1;
                }
            }
        }
        debug_assert_eq!(i, HALO_VOLUME);
        Self { blocks, brightness }
    }

    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> Block {
        self.blocks[halo_index(x, y, z)]
    }

    #[inline]
    pub fn brightness(&self, x: i32, y: i32, z: i32) -> Brightness {
        self.brightness[halo_index(x, y, z)]
    }

    #[inline]
    pub(crate) fn block_at(&self, p: (i32, i32, i32)) -> Block {
        self.block(p.0, p.1, p.2)
    }

    #[inline]
    pub(crate) fn light_at(&self, p: (i32, i32, i32)) -> u16 {
        u16::from(self.brightness(p.0, p.1, p.2))
    }
}
