//! Face visibility, texture choice and corner lighting shared by the builders.

use terrane_blocks::{Block, BlockRegistry, FaceRole, TextureId};

use crate::MeshContext;
use crate::face::{Face, add3};
use crate::halo::Halo;

/// Whether the face of `bl` toward `nb` is drawn in `pass`.
#[inline]
pub fn face_visible(reg: &BlockRegistry, bl: Block, nb: Block, pass: usize) -> bool {
    !(bl == Block::AIR
        || (bl == nb && bl != Block::LEAF)
        || reg.is_opaque(nb)
        || reg.pass_of(bl) != pass)
}

/// Visibility for the depth pre-pass: opaque-class geometry only, no glass.
#[inline]
pub fn depth_visible(reg: &BlockRegistry, bl: Block, nb: Block) -> bool {
    !(bl == Block::AIR
        || bl == Block::GLASS
        || reg.is_translucent(bl)
        || (bl == nb && bl != Block::LEAF)
        || reg.is_opaque(nb))
}

/// Texture role for the face of `bl` at `cell`. With nice grass on, a grass
/// side above another grass block uses the top texture.
#[inline]
pub(crate) fn face_role(
    ctx: &MeshContext<'_>,
    halo: &Halo,
    cell: (i32, i32, i32),
    face: Face,
    bl: Block,
) -> FaceRole {
    if ctx.render.nice_grass && bl == Block::GRASS && face.is_side() {
        let (dx, _, dz) = face.delta();
        if halo.block(cell.0 + dx, cell.1 - 1, cell.2 + dz) == Block::GRASS {
            return FaceRole::Top;
        }
    }
    face.role()
}

#[inline]
pub(crate) fn face_texture(
    ctx: &MeshContext<'_>,
    halo: &Halo,
    cell: (i32, i32, i32),
    face: Face,
    bl: Block,
) -> TextureId {
    ctx.atlas.texture_index(bl, face_role(ctx, halo, cell, face, bl))
}

/// Corner light sums for the face of `cell`. Smooth sums the four cells around
/// each corner on the neighbour side; flat repeats the neighbour's light.
#[inline]
pub(crate) fn corner_sums(halo: &Halo, cell: (i32, i32, i32), face: Face, smooth: bool) -> [u16; 4] {
    let n = add3(cell, face.delta());
    let b = halo.light_at(n);
    if !smooth {
        return [b * 4; 4];
    }
    let mut out = [0u16; 4];
    for (o, c) in out.iter_mut().zip(face.corners()) {
        *o = b
            + halo.light_at(add3(n, c.t1))
            + halo.light_at(add3(n, c.t2))
            + halo.light_at(add3(add3(n, c.t1), c.t2));
    }
    out
}

/// Mean light of the eight cells that share corner `c` of the face of `cell`.
#[inline]
pub(crate) fn vertex_light(halo: &Halo, cell: (i32, i32, i32), face: Face, c: usize) -> f32 {
    let d = face.delta();
    let corner = &face.corners()[c];
    let mut sum = 0u16;
    for a in [(0, 0, 0), d] {
        for b in [(0, 0, 0), corner.t1] {
            for t in [(0, 0, 0), corner.t2] {
                sum += halo.light_at(add3(add3(add3(cell, a), b), t));
            }
        }
    }
    f32::from(sum) / 8.0
}

/// Colour channel for a merged-quad corner sum.
#[inline]
pub fn merged_colour(sum: u16, face: Face, max: u8) -> f32 {
    f32::from(sum) * 0.25 / f32::from(max) * face.ambient()
}

/// Colour channel for a per-block vertex light sample.
#[inline]
pub fn block_colour(light: f32, face: Face, max: u8) -> f32 {
    light / f32::from(max) * face.block_ambient()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_rules() {
        let reg = BlockRegistry::builtin();
        assert!(face_visible(&reg, Block::ROCK, Block::AIR, 0));
        assert!(!face_visible(&reg, Block::AIR, Block::ROCK, 0));
        assert!(!face_visible(&reg, Block::ROCK, Block::DIRT, 0));
        assert!(!face_visible(&reg, Block::GLASS, Block::GLASS, 1));
        assert!(face_visible(&reg, Block::LEAF, Block::LEAF, 0));
        assert!(face_visible(&reg, Block::ROCK, Block::WATER, 0));
        assert!(!face_visible(&reg, Block::ROCK, Block::AIR, 1));
        assert!(face_visible(&reg, Block::WATER, Block::AIR, 2));
        assert!(face_visible(&reg, Block::ICE, Block::WATER, 1));

        assert!(depth_visible(&reg, Block::ROCK, Block::GLASS));
        assert!(!depth_visible(&reg, Block::GLASS, Block::AIR));
        assert!(!depth_visible(&reg, Block::WATER, Block::AIR));
        assert!(depth_visible(&reg, Block::LEAF, Block::LEAF));
    }

    #[test]
    fn colour_scaling() {
        assert_eq!(merged_colour(60, Face::PosY, 15), 1.0);
        assert!((merged_colour(60, Face::PosX, 15) - 0.7).abs() < 1e-6);
        assert_eq!(block_colour(15.0, Face::NegZ, 15), 0.5);
    }
}
