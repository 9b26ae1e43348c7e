use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::config::{BlocksConfig, ConfigError};
use super::types::Block;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockProps {
    pub name: String,
    pub solid: bool,
    pub opaque: bool,
    pub translucent: bool,
}

impl BlockProps {
    fn new(name: &str, solid: bool, opaque: bool, translucent: bool) -> Self {
        Self {
            name: name.to_string(),
            solid,
            opaque,
            translucent,
        }
    }
}

/// Side table of material properties indexed by block id.
///
/// Ids with no entry resolve to [`BlockRegistry::unknown`], which is solid and opaque
/// so unexpected data reads as a wall rather than a hole.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    props: Vec<Option<BlockProps>>,
    by_name: HashMap<String, Block>,
    unknown: BlockProps,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockRegistry {
    pub fn builtin() -> Self {
        let table = [
            (Block::AIR, BlockProps::new("air", false, false, false)),
            (Block::ROCK, BlockProps::new("rock", true, true, false)),
            (Block::GRASS, BlockProps::new("grass", true, true, false)),
            (Block::DIRT, BlockProps::new("dirt", true, true, false)),
            (Block::STONE, BlockProps::new("stone", true, true, false)),
            (Block::PLANK, BlockProps::new("plank", true, true, false)),
            (Block::WOOD, BlockProps::new("wood", true, true, false)),
            (Block::BEDROCK, BlockProps::new("bedrock", true, true, false)),
            (Block::LEAF, BlockProps::new("leaf", true, false, false)),
            (Block::GLASS, BlockProps::new("glass", true, false, true)),
            (Block::WATER, BlockProps::new("water", false, false, true)),
            (Block::LAVA, BlockProps::new("lava", false, false, true)),
            (Block::GLOWSTONE, BlockProps::new("glowstone", true, true, false)),
            (Block::SAND, BlockProps::new("sand", true, true, false)),
            (Block::CEMENT, BlockProps::new("cement", true, true, false)),
            (Block::ICE, BlockProps::new("ice", true, false, true)),
            (Block::COAL, BlockProps::new("coal", true, true, false)),
            (Block::IRON, BlockProps::new("iron", true, true, false)),
        ];
        let mut reg = Self {
            props: vec![None; Block::BUILTIN_COUNT],
            by_name: HashMap::new(),
            unknown: BlockProps::new("unknown", true, true, false),
        };
        for (b, p) in table {
            reg.insert(b, p);
        }
        reg
    }

    fn insert(&mut self, b: Block, p: BlockProps) {
        let i = b.id() as usize;
        if i >= self.props.len() {
            self.props.resize(i + 1, None);
        }
        if let Some(old) = &self.props[i] {
            self.by_name.remove(&old.name);
        }
        self.by_name.insert(p.name.clone(), b);
        self.props[i] = Some(p);
    }

    /// Builtin table with `[[blocks]]` entries applied on top.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, ConfigError> {
        let mut reg = Self::builtin();
        let mut seen = Vec::with_capacity(cfg.blocks.len());
        for def in cfg.blocks {
            if seen.contains(&def.id) {
                return Err(ConfigError::DuplicateId(def.id));
            }
            seen.push(def.id);
            reg.insert(
                Block(def.id),
                BlockProps::new(&def.name, def.solid, def.opaque, def.translucent),
            );
        }
        Ok(reg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    #[inline]
    pub fn get(&self, b: Block) -> &BlockProps {
        self.props
            .get(b.id() as usize)
            .and_then(|p| p.as_ref())
            .unwrap_or(&self.unknown)
    }

    pub fn id_by_name(&self, name: &str) -> Option<Block> {
        self.by_name.get(name).copied()
    }

    pub fn unknown(&self) -> &BlockProps {
        &self.unknown
    }

    #[inline]
    pub fn is_solid(&self, b: Block) -> bool {
        self.get(b).solid
    }

    #[inline]
    pub fn is_opaque(&self, b: Block) -> bool {
        self.get(b).opaque
    }

    #[inline]
    pub fn is_translucent(&self, b: Block) -> bool {
        self.get(b).translucent
    }

    /// Render pass a block belongs to: 0 opaque-ish, 1 translucent solids, 2 translucent fluids.
    #[inline]
    pub fn pass_of(&self, b: Block) -> usize {
        let p = self.get(b);
        match (p.translucent, p.solid) {
            (false, _) => 0,
            (true, true) => 1,
            (true, false) => 2,
        }
    }
}
