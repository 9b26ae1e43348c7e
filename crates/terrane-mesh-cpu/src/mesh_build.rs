/// Float components per vertex, in buffer order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexFormat {
    pub tex: u8,
    pub color: u8,
    pub pos: u8,
    pub attr: u8,
}

impl VertexFormat {
    /// `[u, v, layer, r, g, b, x, y, z, face]`
    pub const MERGED: VertexFormat = VertexFormat {
        tex: 3,
        color: 3,
        pos: 3,
        attr: 1,
    };
    /// `[u, v, r, g, b, x, y, z, face]`
    pub const PER_BLOCK: VertexFormat = VertexFormat {
        tex: 2,
        color: 3,
        pos: 3,
        attr: 1,
    };
    /// `[x, y, z]`
    pub const DEPTH: VertexFormat = VertexFormat {
        tex: 0,
        color: 0,
        pos: 3,
        attr: 0,
    };

    #[inline]
    pub const fn stride(self) -> usize {
        (self.tex + self.color + self.pos + self.attr) as usize
    }
}

/// Interleaved vertex floats for one buffer; every 4 vertices form a quad.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    format: VertexFormat,
    data: Vec<f32>,
    quads: usize,
}

impl MeshBuild {
    pub fn new(format: VertexFormat) -> Self {
        Self {
            format,
            data: Vec::new(),
            quads: 0,
        }
    }

    #[inline]
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quads
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.quads * 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads == 0
    }

    /// Clears the buffer but retains capacity for reuse across builds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.data.clear();
        self.quads = 0;
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.data.reserve(n_quads * 4 * self.format.stride());
    }

    /// Appends four vertices. `N` must equal the format stride.
    pub fn push_quad<const N: usize>(&mut self, verts: &[[f32; N]; 4]) {
        debug_assert_eq!(N, self.format.stride());
        for v in verts {
            self.data.extend_from_slice(v);
        }
        self.quads += 1;
    }

    /// Vertex `i` as a slice of `stride` floats.
    pub fn vertex(&self, i: usize) -> &[f32] {
        let s = self.format.stride();
        &self.data[i * s..(i + 1) * s]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides() {
        assert_eq!(VertexFormat::MERGED.stride(), 10);
        assert_eq!(VertexFormat::PER_BLOCK.stride(), 9);
        assert_eq!(VertexFormat::DEPTH.stride(), 3);
    }

    #[test]
    fn push_and_clear() {
        let mut mb = MeshBuild::new(VertexFormat::DEPTH);
        mb.reserve_quads(4);
        mb.push_quad(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(mb.quad_count(), 1);
        assert_eq!(mb.vertex_count(), 4);
        assert_eq!(mb.vertex(2), &[1.0, 1.0, 0.0]);
        mb.clear_keep_capacity();
        assert!(mb.is_empty());
        assert!(mb.data().is_empty());
    }
}
