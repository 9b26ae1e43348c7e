//! Chunk lattice coordinates, height providers, and worldgen parameters.
#![forbid(unsafe_code)]

pub mod coord;
pub mod height;
pub mod worldgen;

pub use coord::{CHUNK_SIZE, ChunkCoord};
pub use height::{FlatHeightField, HeightField, HeightSamples, NoiseHeightField};
pub use worldgen::{
    ConfigError, DetailMode, HeightConfig, WorldGenConfig, WorldGenParams, load_params_from_path,
    params_from_toml_str,
};
