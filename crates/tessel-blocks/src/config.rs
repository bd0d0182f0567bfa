use serde::Deserialize;

use crate::offset::OffsetKind;
use crate::types::{Shape, TintKind};

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Optional name of the block used when a requested name is unavailable.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub opaque: Option<bool>,
    #[serde(default)]
    pub luminance: Option<u8>,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub sprites: Option<SpritesDef>,
    // Weighted alternatives; when present each variant replaces `sprites` on every face.
    #[serde(default)]
    pub variants: Option<Vec<VariantDef>>,
    #[serde(default)]
    pub tint: Option<TintConfig>,
    #[serde(default)]
    pub offset: Option<OffsetKind>,
    #[serde(default)]
    pub ambient_occlusion: Option<bool>,
    #[serde(default)]
    pub hides_same: Option<bool>,
    #[serde(default)]
    pub barrier: Option<bool>,
    #[serde(default)]
    pub fluid: Option<FluidDef>,
}

// Sprite mapping: all/top/bottom/side, falling back to `all`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SpritesDef {
    #[serde(default)]
    pub all: Option<String>,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VariantDef {
    pub sprite: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

// tint = "grass" or tint = 0x48B518
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum TintConfig {
    Biome(TintKind),
    Fixed(u32),
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FluidDef {
    #[serde(default)]
    pub drips: bool,
}
