//! Read-only world access for block rendering, plus an in-memory world slice.
#![forbid(unsafe_code)]

pub mod colors;
pub mod display;
mod light;
pub mod slice;

pub use colors::{BlockColorProvider, BlockColors};
pub use display::{DisplayTickSink, Particle, random_block_display_tick};
pub use slice::{BiomeColors, WorldSlice};

use tessel_blocks::{BlockState, TintKind};
use tessel_geom::BlockPos;

/// Block and sky light at a cell, each `0..=15`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightLevel {
    pub block: u8,
    pub sky: u8,
}

impl LightLevel {
    pub const DARK: LightLevel = LightLevel { block: 0, sky: 0 };
    pub const OPEN_SKY: LightLevel = LightLevel { block: 0, sky: 15 };

    #[inline]
    pub const fn new(block: u8, sky: u8) -> Self {
        Self { block, sky }
    }
}

/// World queries the block renderer needs. Positions outside the backing data are valid
/// and answer as air under open sky.
pub trait BlockRenderView {
    fn block_state(&self, pos: BlockPos) -> BlockState;

    fn light_level(&self, pos: BlockPos) -> LightLevel;

    /// Biome color (`0xRRGGBB`) for `kind` at `pos`, averaged over the view's blend radius.
    fn biome_color(&self, pos: BlockPos, kind: TintKind) -> u32;
}
