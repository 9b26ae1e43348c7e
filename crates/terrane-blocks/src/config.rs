use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read block config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse block config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Two definitions claimed the same numeric id.
    #[error("block id {0} defined twice")]
    DuplicateId(u16),
    /// A texture entry names a block the registry does not know.
    #[error("unknown block name '{0}'")]
    UnknownBlock(String),
}

/// `[[blocks]]` tables. Entries override or extend the builtin table.
#[derive(Debug, Default, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: u16,
    #[serde(default = "yes")]
    pub solid: bool,
    #[serde(default = "yes")]
    pub opaque: bool,
    #[serde(default)]
    pub translucent: bool,
}

fn yes() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct TexturesConfig {
    #[serde(default)]
    pub textures: HashMap<String, TextureEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextureEntry {
    // rock = 1
    All(u16),
    // grass = { top = 2, side = 3, bottom = 4 }
    Faces {
        top: u16,
        side: u16,
        bottom: u16,
    },
}
