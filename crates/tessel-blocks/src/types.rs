use serde::{Deserialize, Serialize};

// Compact block state used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct BlockState {
    pub id: BlockId,
    pub variant: u16,
}

pub type BlockId = u16;

impl BlockState {
    pub const AIR: BlockState = BlockState { id: 0, variant: 0 };

    #[inline]
    pub const fn new(id: BlockId, variant: u16) -> Self {
        Self { id, variant }
    }

    #[inline]
    pub const fn of(id: BlockId) -> Self {
        Self { id, variant: 0 }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct SpriteId(pub u16);

impl SpriteId {
    /// Sentinel used when a sprite key cannot be resolved.
    pub const MISSING: SpriteId = SpriteId(0);
}

// Shape abstraction used to pick a model and a culling shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cube,
    /// Half-height block; variant 0 is the bottom half, variant 1 the top half.
    Slab,
    /// Two crossed diagonal planes (plants).
    Cross,
    None,
}

/// Biome color channel a tinted block samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TintKind {
    Grass,
    Foliage,
    Water,
}

impl TintKind {
    pub const COUNT: usize = 3;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Tint source for color-sensitive quads. Fixed colors are `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Biome(TintKind),
    Fixed(u32),
}
