use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use terrane_blocks::{BlockRegistry, BlockTextures, BrightnessRange};
use terrane_mesh_cpu::RenderConfig;
use terrane_world::{HeightConfig, WorldGenConfig};

/// Optional block and texture tables replacing the builtin ones.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AssetsConfig {
    pub blocks: Option<PathBuf>,
    pub textures: Option<PathBuf>,
}

/// Whole engine config file. Every table and key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub worldgen: WorldGenConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub brightness: BrightnessRange,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Self = toml::from_str(s)?;
        cfg.brightness.validate()?;
        Ok(cfg)
    }

    /// Asset paths are resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let mut cfg = Self::from_toml_str(&s)?;
        if let Some(dir) = path.parent() {
            for p in [&mut cfg.assets.blocks, &mut cfg.assets.textures]
                .into_iter()
                .flatten()
            {
                if p.is_relative() {
                    *p = dir.join(&*p);
                }
            }
        }
        Ok(cfg)
    }

    pub fn registry(&self) -> Result<BlockRegistry, Box<dyn Error>> {
        match &self.assets.blocks {
            Some(p) => Ok(BlockRegistry::load_from_path(p)?),
            None => Ok(BlockRegistry::builtin()),
        }
    }

    pub fn textures(&self, reg: &BlockRegistry) -> Result<BlockTextures, Box<dyn Error>> {
        match &self.assets.textures {
            Some(p) => Ok(BlockTextures::load_from_path(p, reg)?),
            None => Ok(BlockTextures::builtin()),
        }
    }

    pub fn set_flat(&mut self, height: i32) {
        self.worldgen.height = HeightConfig::Flat { flat: height };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrane_world::DetailMode;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.worldgen.water_level, 30);
        assert_eq!(cfg.worldgen.max_chunk_y, 4);
        assert_eq!(cfg.worldgen.detail, DetailMode::None);
        assert_eq!(cfg.render, RenderConfig::default());
        assert_eq!(cfg.brightness, BrightnessRange::default());
        assert!(cfg.assets.blocks.is_none());
    }

    #[test]
    fn tables_override_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [worldgen]
            water_level = 62
            detail = "trees"
            height = { flat = 70 }

            [render]
            merge_faces = false
            depth_model = true

            [brightness]
            min = 1
            "#,
        )
        .unwrap();
        assert_eq!(cfg.worldgen.water_level, 62);
        assert_eq!(cfg.worldgen.detail, DetailMode::Trees);
        assert_eq!(cfg.worldgen.height, HeightConfig::Flat { flat: 70 });
        assert!(!cfg.render.merge_faces);
        assert!(cfg.render.smooth_lighting);
        assert!(cfg.render.depth_model);
        assert_eq!(cfg.brightness.min, 1);
        assert_eq!(cfg.brightness.max, 15);
    }

    #[test]
    fn unknown_detail_mode_is_rejected() {
        assert!(EngineConfig::from_toml_str("[worldgen]\ndetail = \"castles\"").is_err());
    }

    #[test]
    fn inverted_brightness_range_is_rejected() {
        let err = EngineConfig::from_toml_str("[brightness]\nmin = 10\nmax = 5").unwrap_err();
        assert!(err.downcast_ref::<terrane_blocks::BrightnessError>().is_some());
    }

    #[test]
    fn load_rejects_sky_above_max() {
        let path = std::env::temp_dir()
            .join(format!("terrane_cfg_sky_{}.toml", std::process::id()));
        fs::write(&path, "[brightness]\nmax = 8\nsky = 12\n").unwrap();
        let res = EngineConfig::load(&path);
        let _ = fs::remove_file(&path);
        assert!(res.is_err());
    }

    #[test]
    fn builtin_assets_without_paths() {
        let cfg = EngineConfig::default();
        let reg = cfg.registry().unwrap();
        assert!(cfg.textures(&reg).is_ok());
    }
}
