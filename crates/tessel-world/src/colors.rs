use hashbrown::HashMap;
use tessel_blocks::{BlockId, BlockRegistry, BlockState, Tint, TintKind};
use tessel_geom::BlockPos;

use crate::BlockRenderView;

/// Supplies the tint color (`0xRRGGBB`) for color-sensitive quads of a block.
pub trait BlockColorProvider: Send + Sync {
    fn color(
        &self,
        view: &dyn BlockRenderView,
        state: BlockState,
        pos: BlockPos,
        tint_index: i32,
    ) -> u32;
}

/// Samples the world's biome color of one kind.
#[derive(Clone, Copy, Debug)]
pub struct BiomeTint(pub TintKind);

impl BlockColorProvider for BiomeTint {
    fn color(&self, view: &dyn BlockRenderView, _state: BlockState, pos: BlockPos, _tint_index: i32) -> u32 {
        view.biome_color(pos, self.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTint(pub u32);

impl BlockColorProvider for FixedTint {
    fn color(&self, _view: &dyn BlockRenderView, _state: BlockState, _pos: BlockPos, _tint_index: i32) -> u32 {
        self.0
    }
}

/// Color providers by block id.
#[derive(Default)]
pub struct BlockColors {
    providers: HashMap<BlockId, Box<dyn BlockColorProvider>>,
}

impl BlockColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider for every block whose config declares a tint.
    pub fn from_registry(reg: &BlockRegistry) -> Self {
        let mut colors = Self::new();
        for ty in &reg.blocks {
            match ty.tint {
                Some(Tint::Biome(kind)) => colors.register(ty.id, Box::new(BiomeTint(kind))),
                Some(Tint::Fixed(rgb)) => colors.register(ty.id, Box::new(FixedTint(rgb))),
                None => {}
            }
        }
        log::debug!(target: "blocks", "{} color providers", colors.len());
        colors
    }

    pub fn register(&mut self, id: BlockId, provider: Box<dyn BlockColorProvider>) {
        self.providers.insert(id, provider);
    }

    #[inline]
    pub fn provider_for(&self, state: BlockState) -> Option<&dyn BlockColorProvider> {
        self.providers.get(&state.id).map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
