//! Shared constants for terrane-mesh-cpu.

/// Halo edge: the chunk plus one voxel on each side.
pub const HALO_DIM: usize = 18;
pub const HALO_VOLUME: usize = HALO_DIM * HALO_DIM * HALO_DIM;

pub(crate) const HALO_X_STRIDE: usize = HALO_DIM * HALO_DIM;
pub(crate) const HALO_Y_STRIDE: usize = HALO_DIM;

pub(crate) const CHUNK_EDGE: i32 = 16;

/// Quads reserved up front per non-empty pass buffer.
pub(crate) const INITIAL_QUAD_CAP: usize = 256;
