use terrane_geom::Aabb;
use terrane_world::ChunkCoord;

use crate::merge::PASSES;
use crate::mesh_build::MeshBuild;

/// CPU-side geometry for one chunk, ready for upload.
pub struct ChunkMeshCPU {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    /// Opaque, translucent-solid and translucent-non-solid buffers.
    pub passes: [MeshBuild; PASSES],
    pub depth: Option<MeshBuild>,
}

impl ChunkMeshCPU {
    pub fn quad_count(&self) -> usize {
        self.passes.iter().map(MeshBuild::quad_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.iter().all(MeshBuild::is_empty)
    }
}
