//! Position-only merged mesh for a depth pre-pass.

use terrane_blocks::BlockRegistry;

use crate::constants::CHUNK_EDGE;
use crate::face::{Face, add3};
use crate::halo::Halo;
use crate::mesh_build::{MeshBuild, VertexFormat};
use crate::quad::QuadPrimitive;
use crate::shade::depth_visible;

/// Runs merge on visibility alone; light and texture are ignored.
pub fn depth_quads(halo: &Halo, reg: &BlockRegistry, face: Face, out: &mut Vec<QuadPrimitive>) {
    let d = face.delta();
    for i in 0..CHUNK_EDGE {
        for j in 0..CHUNK_EDGE {
            let mut run: Option<QuadPrimitive> = None;
            for k in 0..CHUNK_EDGE {
                let cell = face.cell(i, j, k);
                if !depth_visible(reg, halo.block_at(cell), halo.block_at(add3(cell, d))) {
                    out.extend(run.take());
                    continue;
                }
                match run.as_mut() {
                    Some(r) => r.length += 1,
                    None => run = Some(QuadPrimitive::new(cell, face, [0; 4], 0)),
                }
            }
            out.extend(run);
        }
    }
}

pub fn build_depth(halo: &Halo, reg: &BlockRegistry) -> MeshBuild {
    let mut quads = Vec::new();
    for face in Face::ALL {
        depth_quads(halo, reg, face, &mut quads);
    }
    let mut mb = MeshBuild::new(VertexFormat::DEPTH);
    mb.reserve_quads(quads.len());
    for q in &quads {
        mb.push_quad(&[q.corner_pos(0), q.corner_pos(1), q.corner_pos(2), q.corner_pos(3)]);
    }
    mb
}
