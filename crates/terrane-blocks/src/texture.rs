use std::fs;
use std::path::Path;

use super::config::{ConfigError, TextureEntry, TexturesConfig};
use super::registry::BlockRegistry;
use super::types::{Block, FaceRole};

pub type TextureId = u16;

/// Atlas cells per row in the 2D atlas layout.
pub const ATLAS_CELLS_PER_ROW: u16 = 8;
pub const ATLAS_CELL_SIZE: f32 = 1.0 / ATLAS_CELLS_PER_ROW as f32;
/// Layers in the texture array used by merged meshes.
pub const TEXTURE_LAYERS: u16 = 64;

/// Resolves which texture a block face samples.
pub trait TextureAtlas: Send + Sync {
    fn texture_index(&self, block: Block, role: FaceRole) -> TextureId;

    /// Origin of the texture's cell in a square 2D atlas.
    fn tex_coord(&self, block: Block, role: FaceRole) -> (f32, f32) {
        let t = self.texture_index(block, role);
        (
            (t % ATLAS_CELLS_PER_ROW) as f32 * ATLAS_CELL_SIZE,
            (t / ATLAS_CELLS_PER_ROW) as f32 * ATLAS_CELL_SIZE,
        )
    }

    /// Normalized array-layer coordinate for merged meshes.
    fn layer(&self, block: Block, role: FaceRole) -> f32 {
        (self.texture_index(block, role) as f32 + 0.5) / TEXTURE_LAYERS as f32
    }
}

/// Table of `[top, side, bottom]` texture ids per block id.
#[derive(Clone, Debug)]
pub struct BlockTextures {
    faces: Vec<[TextureId; 3]>,
    missing: TextureId,
}

#[inline]
fn slot(role: FaceRole) -> usize {
    match role {
        FaceRole::Top => 0,
        FaceRole::Side => 1,
        FaceRole::Bottom => 2,
    }
}

impl Default for BlockTextures {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockTextures {
    pub fn builtin() -> Self {
        let mut t = Self {
            faces: vec![[0; 3]; Block::BUILTIN_COUNT],
            missing: 0,
        };
        let same = |i: TextureId| [i, i, i];
        t.set(Block::ROCK, same(1));
        t.set(Block::GRASS, [2, 3, 4]);
        t.set(Block::DIRT, same(4));
        t.set(Block::STONE, same(5));
        t.set(Block::PLANK, same(6));
        t.set(Block::WOOD, [8, 7, 8]);
        t.set(Block::BEDROCK, same(9));
        t.set(Block::LEAF, same(10));
        t.set(Block::GLASS, same(11));
        t.set(Block::WATER, same(12));
        t.set(Block::LAVA, same(13));
        t.set(Block::GLOWSTONE, same(14));
        t.set(Block::SAND, same(15));
        t.set(Block::CEMENT, same(16));
        t.set(Block::ICE, same(17));
        t.set(Block::COAL, same(18));
        t.set(Block::IRON, same(19));
        t
    }

    pub fn set(&mut self, b: Block, faces: [TextureId; 3]) {
        let i = b.id() as usize;
        if i >= self.faces.len() {
            self.faces.resize(i + 1, [self.missing; 3]);
        }
        self.faces[i] = faces;
    }

    /// Builtin table with `[textures]` overrides keyed by block name.
    pub fn from_toml_str(toml_str: &str, reg: &BlockRegistry) -> Result<Self, ConfigError> {
        let cfg: TexturesConfig = toml::from_str(toml_str)?;
        let mut entries: Vec<(String, TextureEntry)> = cfg.textures.into_iter().collect();
        // Sorted so a later error always reports the same name.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut t = Self::builtin();
        for (name, entry) in entries {
            let b = reg
                .id_by_name(&name)
                .ok_or_else(|| ConfigError::UnknownBlock(name.clone()))?;
            let faces = match entry {
                TextureEntry::All(i) => [i, i, i],
                TextureEntry::Faces { top, side, bottom } => [top, side, bottom],
            };
            t.set(b, faces);
        }
        Ok(t)
    }

    pub fn load_from_path(path: impl AsRef<Path>, reg: &BlockRegistry) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s, reg)
    }
}

impl TextureAtlas for BlockTextures {
    #[inline]
    fn texture_index(&self, block: Block, role: FaceRole) -> TextureId {
        self.faces
            .get(block.id() as usize)
            .map(|f| f[slot(role)])
            .unwrap_or(self.missing)
    }
}
