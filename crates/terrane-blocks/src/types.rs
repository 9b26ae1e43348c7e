use serde::Deserialize;

/// Material id of a single voxel. Stored as a little-endian `u16` on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Block(pub u16);

impl Block {
    pub const AIR: Block = Block(0);
    pub const ROCK: Block = Block(1);
    pub const GRASS: Block = Block(2);
    pub const DIRT: Block = Block(3);
    pub const STONE: Block = Block(4);
    pub const PLANK: Block = Block(5);
    pub const WOOD: Block = Block(6);
    pub const BEDROCK: Block = Block(7);
    pub const LEAF: Block = Block(8);
    pub const GLASS: Block = Block(9);
    pub const WATER: Block = Block(10);
    pub const LAVA: Block = Block(11);
    pub const GLOWSTONE: Block = Block(12);
    pub const SAND: Block = Block(13);
    pub const CEMENT: Block = Block(14);
    pub const ICE: Block = Block(15);
    pub const COAL: Block = Block(16);
    pub const IRON: Block = Block(17);

    /// Number of ids in the builtin table.
    pub const BUILTIN_COUNT: usize = 18;

    #[inline]
    pub const fn id(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// Per-voxel light level.
pub type Brightness = u8;

/// Which texture of a block a face samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Side,
    Bottom,
}

/// `[brightness]` values that would break the light bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid brightness range: need 0 < max and min <= sky <= max (min {min}, sky {sky}, max {max})")]
pub struct BrightnessError {
    pub min: Brightness,
    pub sky: Brightness,
    pub max: Brightness,
}

/// Light level bounds and the value used for open sky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct BrightnessRange {
    #[serde(default = "default_min")]
    pub min: Brightness,
    #[serde(default = "default_max")]
    pub max: Brightness,
    #[serde(default = "default_sky")]
    pub sky: Brightness,
}

fn default_min() -> Brightness {
    2
}
fn default_max() -> Brightness {
    15
}
fn default_sky() -> Brightness {
    15
}

impl Default for BrightnessRange {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            sky: default_sky(),
        }
    }
}

impl BrightnessRange {
    /// Every loader calls this before the range reaches generation or meshing.
    pub fn validate(&self) -> Result<(), BrightnessError> {
        if self.max == 0 || self.min > self.sky || self.sky > self.max {
            return Err(BrightnessError {
                min: self.min,
                sky: self.sky,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Clamps a signed light computation into `[min, max]`.
    #[inline]
    pub fn clamp(&self, v: i32) -> Brightness {
        v.clamp(i32::from(self.min), i32::from(self.max)) as Brightness
    }

    #[inline]
    pub fn sky_clamped(&self) -> Brightness {
        self.clamp(i32::from(self.sky))
    }
}
