use std::fmt;

use terrane_blocks::{Block, Brightness};

pub const CHUNK_DIM: usize = 16;
pub const CHUNK_VOLUME: usize = CHUNK_DIM * CHUNK_DIM * CHUNK_DIM;

/// Linear index of local voxel `(x, y, z)`: x outermost, z innermost.
#[inline]
pub const fn voxel_index(x: usize, y: usize, z: usize) -> usize {
    x * 256 + y * 16 + z
}

/// Block and brightness arrays for one 16x16x16 chunk.
#[derive(Clone, PartialEq, Eq)]
pub struct Voxels {
    blocks: [Block; CHUNK_VOLUME],
    brightness: [Brightness; CHUNK_VOLUME],
}

impl fmt::Debug for Voxels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solid = self.blocks.iter().filter(|b| !b.is_air()).count();
        f.debug_struct("Voxels").field("non_air", &solid).finish()
    }
}

impl Voxels {
    pub fn boxed(block: Block, brightness: Brightness) -> Box<Self> {
        Box::new(Self {
            blocks: [block; CHUNK_VOLUME],
            brightness: [brightness; CHUNK_VOLUME],
        })
    }

    pub fn fill(&mut self, block: Block, brightness: Brightness) {
        self.blocks.fill(block);
        self.brightness.fill(brightness);
    }

    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[voxel_index(x, y, z)]
    }

    #[inline]
    pub fn brightness(&self, x: usize, y: usize, z: usize) -> Brightness {
        self.brightness[voxel_index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: Block, brightness: Brightness) {
        let i = voxel_index(x, y, z);
        self.blocks[i] = block;
        self.brightness[i] = brightness;
    }

    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.blocks[voxel_index(x, y, z)] = block;
    }

    #[inline]
    pub fn set_brightness(&mut self, x: usize, y: usize, z: usize, brightness: Brightness) {
        self.brightness[voxel_index(x, y, z)] = brightness;
    }

    pub fn blocks(&self) -> &[Block; CHUNK_VOLUME] {
        &self.blocks
    }

    pub fn brightness_slice(&self) -> &[Brightness; CHUNK_VOLUME] {
        &self.brightness
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block; CHUNK_VOLUME] {
        &mut self.blocks
    }

    pub(crate) fn brightness_mut(&mut self) -> &mut [Brightness; CHUNK_VOLUME] {
        &mut self.brightness
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_a_bijection() {
        let mut seen = vec![false; CHUNK_VOLUME];
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    let i = voxel_index(x, y, z);
                    assert!(!seen[i]);
                    seen[i] = true;
                }
            }
        }
        assert!(seen.into_iter().all(|b| b));
        assert_eq!(voxel_index(1, 0, 0), 256);
        assert_eq!(voxel_index(0, 1, 0), 16);
        assert_eq!(voxel_index(0, 0, 1), 1);
    }

    #[test]
    fn set_reads_back() {
        let mut v = Voxels::boxed(Block::AIR, 15);
        v.set(3, 9, 14, Block::GLASS, 7);
        assert_eq!(v.block(3, 9, 14), Block::GLASS);
        assert_eq!(v.brightness(3, 9, 14), 7);
        assert_eq!(v.blocks()[voxel_index(3, 9, 14)], Block::GLASS);
        assert!(v.has_non_air());
        v.fill(Block::AIR, 2);
        assert!(!v.has_non_air());
    }
}
