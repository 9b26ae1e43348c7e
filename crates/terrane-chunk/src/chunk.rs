use terrane_blocks::{Block, Brightness};
use terrane_geom::{Aabb, Vec3};
use terrane_world::{CHUNK_SIZE, ChunkCoord, HeightSamples, WorldGenParams};

use crate::codec::{self, DecodeError};
use crate::detail::DetailGenerator;
use crate::terrain::generate_terrain;
use crate::voxels::{CHUNK_DIM, Voxels};

/// Bounding box of a chunk, with voxel centres on integer coordinates.
pub fn chunk_aabb(coord: ChunkCoord) -> Aabb {
    let (bx, by, bz) = coord.base();
    let min = Vec3::from_ints(bx, by, bz) - Vec3::splat(0.5);
    Aabb::new(min, min + Vec3::splat(CHUNK_SIZE as f32))
}

/// Offsets of every neighbouring chunk whose mesh can read local `(x, y, z)`:
/// the face neighbour for each border axis, plus the edge and corner
/// neighbours when the voxel sits on two or three borders.
pub fn edge_neighbors(x: usize, y: usize, z: usize) -> Vec<(i32, i32, i32)> {
    let last = CHUNK_DIM - 1;
    let steps = |v: usize| -> &'static [i32] {
        if v == 0 {
            &[0, -1]
        } else if v == last {
            &[0, 1]
        } else {
            &[0]
        }
    };
    let mut out = Vec::new();
    for &dx in steps(x) {
        for &dy in steps(y) {
            for &dz in steps(z) {
                if (dx, dy, dz) != (0, 0, 0) {
                    out.push((dx, dy, dz));
                }
            }
        }
    }
    out
}

/// A loaded chunk. Owning a `Chunk` means owning its voxel buffer; an
/// unloaded chunk has no value at all.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    bbox: Aabb,
    voxels: Box<Voxels>,
    empty: bool,
    modified: bool,
    detail_generated: bool,
    render_built: bool,
    needs_rebuild: bool,
}

impl Chunk {
    fn with_buffer(coord: ChunkCoord, voxels: Box<Voxels>) -> Self {
        Self {
            coord,
            bbox: chunk_aabb(coord),
            voxels,
            empty: true,
            modified: false,
            detail_generated: false,
            render_built: false,
            needs_rebuild: false,
        }
    }

    /// Terrain, then detail when the chunk is not empty.
    pub fn build(
        coord: ChunkCoord,
        mut voxels: Box<Voxels>,
        heights: &HeightSamples,
        params: &WorldGenParams,
        detail: &dyn DetailGenerator,
        init_if_empty: bool,
    ) -> Self {
        let empty = generate_terrain(coord, &mut voxels, heights, params, init_if_empty);
        let mut chunk = Self::with_buffer(coord, voxels);
        chunk.empty = empty;
        if !empty {
            detail.decorate(coord, &mut chunk.voxels);
            chunk.detail_generated = true;
            chunk.needs_rebuild = true;
        }
        chunk
    }

    /// Rebuilds a chunk from its file bytes. On failure the buffer is handed
    /// back so the caller can fall back to generation.
    pub fn restore(
        coord: ChunkCoord,
        mut voxels: Box<Voxels>,
        bytes: &[u8],
    ) -> Result<Self, (Box<Voxels>, DecodeError)> {
        match codec::decode_into(&mut voxels, bytes) {
            Ok(detail_generated) => {
                // Only non-empty chunks are ever written.
                let mut chunk = Self::with_buffer(coord, voxels);
                chunk.empty = false;
                chunk.detail_generated = detail_generated;
                chunk.needs_rebuild = true;
                Ok(chunk)
            }
            Err(e) => Err((voxels, e)),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(&self.voxels, self.detail_generated)
    }

    /// Releases the voxel buffer; the chunk ceases to exist.
    pub fn into_voxels(self) -> Box<Voxels> {
        self.voxels
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn bbox(&self) -> Aabb {
        self.bbox
    }

    #[inline]
    pub fn voxels(&self) -> &Voxels {
        &self.voxels
    }

    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> Block {
        self.voxels.block(x, y, z)
    }

    #[inline]
    pub fn brightness(&self, x: usize, y: usize, z: usize) -> Brightness {
        self.voxels.brightness(x, y, z)
    }

    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.voxels.set_block(x, y, z, block);
        if !block.is_air() {
            self.empty = false;
        }
        self.touch();
    }

    pub fn set_brightness(&mut self, x: usize, y: usize, z: usize, brightness: Brightness) {
        self.voxels.set_brightness(x, y, z, brightness);
        self.touch();
    }

    fn touch(&mut self) {
        self.modified = true;
        self.needs_rebuild = true;
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_detail_generated(&self) -> bool {
        self.detail_generated
    }

    pub fn is_render_built(&self) -> bool {
        self.render_built
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    pub fn request_rebuild(&mut self) {
        self.needs_rebuild = true;
    }

    pub fn mark_render_built(&mut self) {
        self.render_built = true;
        self.needs_rebuild = false;
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Only non-empty chunks with edits are worth writing.
    pub fn should_save(&self) -> bool {
        !self.empty && self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_neighbors_cover_faces_and_corners() {
        assert!(edge_neighbors(5, 5, 5).is_empty());
        assert_eq!(edge_neighbors(0, 7, 7), vec![(-1, 0, 0)]);
        assert_eq!(edge_neighbors(0, 7, 15), vec![(0, 0, 1), (-1, 0, 0), (-1, 0, 1)]);

        let mut corner = edge_neighbors(15, 0, 15);
        corner.sort_unstable();
        assert_eq!(
            corner,
            vec![
                (0, -1, 0),
                (0, -1, 1),
                (0, 0, 1),
                (1, -1, 0),
                (1, -1, 1),
                (1, 0, 0),
                (1, 0, 1),
            ]
        );
    }

    #[test]
    fn aabb_is_offset_by_half_voxel() {
        let b = chunk_aabb(ChunkCoord::new(1, -1, 0));
        assert_eq!(b.min, Vec3::new(15.5, -16.5, -0.5));
        assert_eq!(b.max, Vec3::new(31.5, -0.5, 15.5));
    }
}
