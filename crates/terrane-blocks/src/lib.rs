//! Block ids, material properties, brightness bounds and texture lookup.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod texture;
pub mod types;

pub use config::ConfigError;
pub use registry::{BlockProps, BlockRegistry};
pub use texture::{BlockTextures, TextureAtlas, TextureId};
pub use types::{Block, Brightness, BrightnessError, BrightnessRange, FaceRole};
