//! One quad per visible face, used when merging is disabled.

use terrane_blocks::texture::ATLAS_CELL_SIZE;

use crate::MeshContext;
use crate::constants::CHUNK_EDGE;
use crate::face::{Face, add3};
use crate::halo::Halo;
use crate::merge::PASSES;
use crate::mesh_build::{MeshBuild, VertexFormat};
use crate::quad::QuadPrimitive;
use crate::shade::{block_colour, face_role, face_visible, vertex_light};

pub fn build_per_block(halo: &Halo, ctx: &MeshContext<'_>) -> [MeshBuild; PASSES] {
    let mut passes: [MeshBuild; PASSES] =
        std::array::from_fn(|_| MeshBuild::new(VertexFormat::PER_BLOCK));
    for (pass, mb) in passes.iter_mut().enumerate() {
        for x in 0..CHUNK_EDGE {
            for y in 0..CHUNK_EDGE {
                for z in 0..CHUNK_EDGE {
                    let cell = (x, y, z);
                    let bl = halo.block_at(cell);
                    if bl.is_air() || ctx.reg.pass_of(bl) != pass {
                        continue;
                    }
                    for face in Face::ALL {
                        let nb = halo.block_at(add3(cell, face.delta()));
                        if face_visible(ctx.reg, bl, nb, pass) {
                            emit_block_face(mb, halo, ctx, cell, face);
                        }
                    }
                }
            }
        }
    }
    passes
}

fn emit_block_face(
    mb: &mut MeshBuild,
    halo: &Halo,
    ctx: &MeshContext<'_>,
    cell: (i32, i32, i32),
    face: Face,
) {
    let bl = halo.block_at(cell);
    let role = face_role(ctx, halo, cell, face, bl);
    let (tcx, tcy) = ctx.atlas.tex_coord(bl, role);
    let flat = f32::from(halo.light_at(add3(cell, face.delta())));
    let max = ctx.brightness.max;
    // Single-voxel quad reuses the corner geometry of the merged path.
    let q = QuadPrimitive::new(cell, face, [0; 4], ctx.atlas.texture_index(bl, role));
    let attr = face.index() as f32;
    let mut verts = [[0f32; 9]; 4];
    for (c, vert) in verts.iter_mut().enumerate() {
        let corner = &face.corners()[c];
        let light = if ctx.render.smooth_lighting {
            vertex_light(halo, cell, face, c)
        } else {
            flat
        };
        let col = block_colour(light, face, max);
        let u = tcx + if c >= 2 { ATLAS_CELL_SIZE } else { 0.0 };
        let v = tcy + corner.v * ATLAS_CELL_SIZE;
        let [x, y, z] = q.corner_pos(c);
        *vert = [u, v, col, col, col, x, y, z, attr];
    }
    mb.push_quad(&verts);
}
