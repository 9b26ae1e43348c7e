//! CPU meshing: neighbour halo, run-length merged faces, per-block faces and depth geometry.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod constants;
pub mod depth;
pub mod face;
pub mod halo;
pub mod merge;
pub mod mesh_build;
pub mod neighbors;
pub mod per_block;
pub mod quad;
pub mod shade;

pub use chunk::ChunkMeshCPU;
pub use depth::{build_depth, depth_quads};
pub use face::{Corner, Face};
pub use halo::{Halo, halo_index};
pub use merge::{PASSES, build_merged, merged_quads};
pub use mesh_build::{MeshBuild, VertexFormat};
pub use neighbors::{Neighbor, NeighborRing, ring_resolvable};
pub use per_block::build_per_block;
pub use quad::QuadPrimitive;

use serde::Deserialize;
use terrane_blocks::{BlockRegistry, BrightnessRange, TextureAtlas};
use terrane_chunk::chunk_aabb;

/// The `[render]` table.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
    #[serde(default = "yes")]
    pub smooth_lighting: bool,
    #[serde(default = "yes")]
    pub nice_grass: bool,
    #[serde(default = "yes")]
    pub merge_faces: bool,
    #[serde(default)]
    pub depth_model: bool,
}

fn yes() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            smooth_lighting: true,
            nice_grass: true,
            merge_faces: true,
            depth_model: false,
        }
    }
}

/// Everything a mesh build reads besides voxels.
#[derive(Clone, Copy)]
pub struct MeshContext<'a> {
    pub reg: &'a BlockRegistry,
    pub atlas: &'a dyn TextureAtlas,
    pub render: RenderConfig,
    pub brightness: BrightnessRange,
}

/// Builds the geometry of the ring's centre chunk.
///
/// Returns `None` without touching any buffer when a neighbour is still
/// unloaded or the centre holds no voxels; the caller retries later.
pub fn build_chunk_mesh(ring: &NeighborRing<'_>, ctx: &MeshContext<'_>) -> Option<ChunkMeshCPU> {
    let coord = ring.coord();
    if !ring.is_resolvable() {
        log::trace!(target: "mesh", "deferred {:?}: neighbour not loaded", coord);
        return None;
    }
    if !matches!(ring.center(), Neighbor::Loaded(_)) {
        return None;
    }
    let halo = Halo::build(ring, &ctx.brightness);
    let passes = if ctx.render.merge_faces {
        build_merged(&halo, ctx)
    } else {
        build_per_block(&halo, ctx)
    };
    let depth = ctx
        .render
        .depth_model
        .then(|| build_depth(&halo, ctx.reg));
    Some(ChunkMeshCPU {
        coord,
        bbox: chunk_aabb(coord),
        passes,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_table_keys_default_individually() {
        let cfg: RenderConfig = toml::from_str("nice_grass = false").unwrap();
        assert!(!cfg.nice_grass);
        assert!(cfg.smooth_lighting);
        assert!(cfg.merge_faces);
        assert!(!cfg.depth_model);
    }
}
