use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use terrane_blocks::{BrightnessError, BrightnessRange};

use crate::height::{FlatHeightField, HeightField, NoiseHeightField};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read worldgen config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Brightness(#[from] BrightnessError),
}

/// The `[worldgen]` table.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_water_level")]
    pub water_level: i32,
    #[serde(default = "default_max_chunk_y")]
    pub max_chunk_y: i32,
    #[serde(default = "default_shore_offset")]
    pub shore_offset: i32,
    #[serde(default = "default_topsoil_depth")]
    pub topsoil_depth: i32,
    #[serde(default = "default_low_margin")]
    pub low_margin: i32,
    #[serde(default = "default_high_margin")]
    pub high_margin: i32,
    #[serde(default)]
    pub seed: i32,
    #[serde(default)]
    pub height: HeightConfig,
    #[serde(default)]
    pub detail: DetailMode,
    #[serde(default = "default_tree_probability")]
    pub tree_probability: f32,
}

fn default_water_level() -> i32 {
    30
}
fn default_max_chunk_y() -> i32 {
    4
}
fn default_shore_offset() -> i32 {
    2
}
fn default_topsoil_depth() -> i32 {
    5
}
fn default_low_margin() -> i32 {
    21
}
fn default_high_margin() -> i32 {
    16
}
fn default_tree_probability() -> f32 {
    0.005
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            water_level: default_water_level(),
            max_chunk_y: default_max_chunk_y(),
            shore_offset: default_shore_offset(),
            topsoil_depth: default_topsoil_depth(),
            low_margin: default_low_margin(),
            high_margin: default_high_margin(),
            seed: 0,
            height: HeightConfig::default(),
            detail: DetailMode::default(),
            tree_probability: default_tree_probability(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HeightConfig {
    // height = { flat = 70 }
    Flat { flat: i32 },
    // height = { base = 40, amplitude = 24.0, frequency = 0.01 }
    Noise {
        #[serde(default = "default_noise_base")]
        base: i32,
        #[serde(default = "default_noise_amplitude")]
        amplitude: f32,
        #[serde(default = "default_noise_frequency")]
        frequency: f32,
    },
}

fn default_noise_base() -> i32 {
    32
}
fn default_noise_amplitude() -> f32 {
    24.0
}
fn default_noise_frequency() -> f32 {
    0.01
}

impl Default for HeightConfig {
    fn default() -> Self {
        HeightConfig::Noise {
            base: default_noise_base(),
            amplitude: default_noise_amplitude(),
            frequency: default_noise_frequency(),
        }
    }
}

impl HeightConfig {
    pub fn build(&self, seed: i32) -> Arc<dyn HeightField> {
        match *self {
            HeightConfig::Flat { flat } => Arc::new(FlatHeightField(flat)),
            HeightConfig::Noise {
                base,
                amplitude,
                frequency,
            } => Arc::new(NoiseHeightField::new(seed, base, amplitude, frequency)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetailMode {
    #[default]
    None,
    Trees,
}

// Flattened params used by the terrain and detail passes (snapshot of config)
#[derive(Clone, Debug, PartialEq)]
pub struct WorldGenParams {
    pub water_level: i32,
    pub max_chunk_y: i32,
    pub shore_offset: i32,
    pub topsoil_depth: i32,
    pub low_margin: i32,
    pub high_margin: i32,
    pub seed: u32,
    pub detail: DetailMode,
    pub tree_probability: f32,
    pub brightness: BrightnessRange,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default(), BrightnessRange::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig, brightness: BrightnessRange) -> Self {
        Self {
            water_level: cfg.water_level,
            max_chunk_y: cfg.max_chunk_y,
            shore_offset: cfg.shore_offset,
            topsoil_depth: cfg.topsoil_depth.max(0),
            low_margin: cfg.low_margin,
            high_margin: cfg.high_margin,
            seed: cfg.seed as u32,
            detail: cfg.detail,
            tree_probability: cfg.tree_probability.clamp(0.0, 1.0),
            brightness,
        }
    }

    pub fn with_water_level(mut self, water_level: i32) -> Self {
        self.water_level = water_level;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct WorldGenFile {
    #[serde(default)]
    worldgen: WorldGenConfig,
    #[serde(default)]
    brightness: BrightnessRange,
}

/// Parses the `[worldgen]` and `[brightness]` tables of a config string.
pub fn params_from_toml_str(s: &str) -> Result<WorldGenParams, ConfigError> {
    let file: WorldGenFile = toml::from_str(s)?;
    file.brightness.validate()?;
    Ok(WorldGenParams::from_config(&file.worldgen, file.brightness))
}

/// Reads the `[worldgen]` and `[brightness]` tables of a config file.
pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, ConfigError> {
    let s = fs::read_to_string(path)?;
    params_from_toml_str(&s)
}
