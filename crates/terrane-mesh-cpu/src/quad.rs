use terrane_blocks::TextureId;

use crate::face::{Face, add3};

/// A run of coplanar faces produced by the merge sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadPrimitive {
    /// Chunk-local voxel at the start of the run.
    pub origin: (i32, i32, i32),
    /// Voxels covered along the run axis, at least 1.
    pub length: u8,
    pub face: Face,
    /// Corner light sums, each four brightness samples.
    pub corners: [u16; 4],
    /// Set when the corners differ; such a quad never merges.
    pub once: bool,
    pub texture: TextureId,
}

impl QuadPrimitive {
    pub fn new(origin: (i32, i32, i32), face: Face, corners: [u16; 4], texture: TextureId) -> Self {
        let once = corners.iter().any(|c| *c != corners[0]);
        Self {
            origin,
            length: 1,
            face,
            corners,
            once,
            texture,
        }
    }

    /// Whether a face with these attributes, adjacent along the run axis, joins this run.
    #[inline]
    pub fn accepts(&self, corners: &[u16; 4], texture: TextureId) -> bool {
        !self.once && self.texture == texture && self.corners == *corners
    }

    /// Chunk-local position of corner `c`.
    pub fn corner_pos(&self, c: usize) -> [f32; 3] {
        let corner = &self.face.corners()[c];
        let off = add3(add3(self.face.delta(), corner.t1), corner.t2);
        let mut p = [
            self.origin.0 as f32 + off.0 as f32 * 0.5,
            self.origin.1 as f32 + off.1 as f32 * 0.5,
            self.origin.2 as f32 + off.2 as f32 * 0.5,
        ];
        if c >= 2 {
            let r = self.face.run_axis();
            let ext = f32::from(self.length - 1);
            p[0] += r.0 as f32 * ext;
            p[1] += r.1 as f32 * ext;
            p[2] += r.2 as f32 * ext;
        }
        p
    }

    /// Voxels whose faces this quad covers.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let r = self.face.run_axis();
        (0..i32::from(self.length)).map(move |n| {
            (
                self.origin.0 + r.0 * n,
                self.origin.1 + r.1 * n,
                self.origin.2 + r.2 * n,
            )
        })
    }
}
