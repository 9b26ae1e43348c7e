//! Chunk voxel storage, terrain and detail generation, and the chunk file codec.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod codec;
pub mod detail;
pub mod pool;
pub mod terrain;
pub mod voxels;

pub use chunk::{Chunk, chunk_aabb, edge_neighbors};
pub use codec::{CHUNK_FILE_LEN, DecodeError, decode_into, encode};
pub use detail::{DetailGenerator, NoDetail, TreeDetail, detail_for};
pub use pool::VoxelPool;
pub use terrain::generate_terrain;
pub use voxels::{CHUNK_DIM, CHUNK_VOLUME, Voxels, voxel_index};
