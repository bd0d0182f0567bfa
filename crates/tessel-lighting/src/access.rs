use hashbrown::HashMap;
use tessel_blocks::BlockRegistry;
use tessel_geom::{BlockPos, Direction};
use tessel_world::BlockRenderView;

use crate::data::pack_light;

/// Occlusion shade of a full opaque cube; everything else is 1.0.
pub const OCCLUDER_AO: f32 = 0.2;

/// Lighting-relevant facts about one block position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightWord {
    /// Packed light map coordinates; 0 inside non-emissive full opaque cubes.
    pub lm: u32,
    pub ao: f32,
    pub opaque: bool,
    /// Opaque and a full cube.
    pub full_opaque: bool,
    pub full_cube: bool,
}

/// World and registry the light pipelines sample.
pub struct LightWorld<'a, W: BlockRenderView + ?Sized> {
    pub world: &'a W,
    pub reg: &'a BlockRegistry,
}

impl<'a, W: BlockRenderView + ?Sized> LightWorld<'a, W> {
    pub fn new(world: &'a W, reg: &'a BlockRegistry) -> Self {
        Self { world, reg }
    }
}

/// Position-keyed memo of [`LightWord`]s.
///
/// Keys are positions, not content; call [`LightDataAccess::clear`] whenever the world
/// behind the view changes.
#[derive(Default)]
pub struct LightDataAccess {
    words: HashMap<BlockPos, LightWord>,
}

impl LightDataAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn get<W: BlockRenderView + ?Sized>(&mut self, lw: &LightWorld<'_, W>, pos: BlockPos) -> LightWord {
        if let Some(w) = self.words.get(&pos) {
            return *w;
        }
        let w = compute(lw, pos);
        self.words.insert(pos, w);
        w
    }

    #[inline]
    pub fn get_offset<W: BlockRenderView + ?Sized>(
        &mut self,
        lw: &LightWorld<'_, W>,
        pos: BlockPos,
        dir: Direction,
    ) -> LightWord {
        self.get(lw, pos.offset(dir))
    }

    #[inline]
    pub fn get_offset2<W: BlockRenderView + ?Sized>(
        &mut self,
        lw: &LightWorld<'_, W>,
        pos: BlockPos,
        a: Direction,
        b: Direction,
    ) -> LightWord {
        self.get(lw, pos.offset(a).offset(b))
    }
}

fn compute<W: BlockRenderView + ?Sized>(lw: &LightWorld<'_, W>, pos: BlockPos) -> LightWord {
    let state = lw.world.block_state(pos);
    let ty = lw.reg.ty(state);
    let opaque = ty.opaque;
    let full_cube = lw.reg.is_full_cube(state);
    let full_opaque = opaque && full_cube;
    let lum = ty.luminance;
    let ao = if lum == 0 && full_opaque { OCCLUDER_AO } else { 1.0 };
    let lm = if full_opaque && lum == 0 {
        0
    } else {
        let level = lw.world.light_level(pos);
        pack_light(level.block.max(lum), level.sky)
    };
    LightWord {
        lm,
        ao,
        opaque,
        full_opaque,
        full_cube,
    }
}
