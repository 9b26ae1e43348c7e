//! Run-length face merging along one axis per face direction.

use crate::MeshContext;
use crate::constants::{CHUNK_EDGE, INITIAL_QUAD_CAP};
use crate::face::{Face, add3};
use crate::halo::Halo;
use crate::mesh_build::{MeshBuild, VertexFormat};
use crate::quad::QuadPrimitive;
use crate::shade::{corner_sums, face_texture, face_visible, merged_colour};

pub const PASSES: usize = 3;

/// Appends the merged quads of one pass and face direction to `out`.
///
/// Runs only grow across directly adjacent visible faces; a hidden face, a
/// texture change or a lighting change closes the open run.
pub fn merged_quads(
    halo: &Halo,
    ctx: &MeshContext<'_>,
    pass: usize,
    face: Face,
    out: &mut Vec<QuadPrimitive>,
) {
    let d = face.delta();
    let smooth = ctx.render.smooth_lighting;
    for i in 0..CHUNK_EDGE {
        for j in 0..CHUNK_EDGE {
            let mut run: Option<QuadPrimitive> = None;
            for k in 0..CHUNK_EDGE {
                let cell = face.cell(i, j, k);
                let bl = halo.block_at(cell);
                let nb = halo.block_at(add3(cell, d));
                if !face_visible(ctx.reg, bl, nb, pass) {
                    out.extend(run.take());
                    continue;
                }
                let texture = face_texture(ctx, halo, cell, face, bl);
                let corners = corner_sums(halo, cell, face, smooth);
                match run.as_mut() {
                    Some(r) if r.accepts(&corners, texture) => r.length += 1,
                    _ => {
                        out.extend(run.take());
                        run = Some(QuadPrimitive::new(cell, face, corners, texture));
                    }
                }
            }
            out.extend(run);
        }
    }
}

/// Writes one merged quad as four `VertexFormat::MERGED` vertices.
pub fn emit_merged(mb: &mut MeshBuild, q: &QuadPrimitive, max_brightness: u8) {
    let layer = (f32::from(q.texture) + 0.5) / f32::from(terrane_blocks::texture::TEXTURE_LAYERS);
    let attr = q.face.index() as f32;
    let len = f32::from(q.length);
    let mut verts = [[0f32; 10]; 4];
    for (c, v) in verts.iter_mut().enumerate() {
        let corner = &q.face.corners()[c];
        let u = if c >= 2 { len } else { 0.0 };
        let col = merged_colour(q.corners[c], q.face, max_brightness);
        let [x, y, z] = q.corner_pos(c);
        *v = [u, corner.v, layer, col, col, col, x, y, z, attr];
    }
    mb.push_quad(&verts);
}

/// Merged geometry for the three visibility passes.
pub fn build_merged(halo: &Halo, ctx: &MeshContext<'_>) -> [MeshBuild; PASSES] {
    let mut passes: [MeshBuild; PASSES] =
        std::array::from_fn(|_| MeshBuild::new(VertexFormat::MERGED));
    let mut quads = Vec::with_capacity(INITIAL_QUAD_CAP);
    for (pass, mb) in passes.iter_mut().enumerate() {
        quads.clear();
        for face in Face::ALL {
            merged_quads(halo, ctx, pass, face, &mut quads);
        }
        if quads.is_empty() {
            continue;
        }
        mb.reserve_quads(quads.len());
        for q in &quads {
            emit_merged(mb, q, ctx.brightness.max);
        }
    }
    passes
}
