use tessel_blocks::{BlockState, TintKind};
use tessel_geom::BlockPos;

use crate::{BlockRenderView, LightLevel};

/// Per-column biome colors, `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomeColors {
    pub grass: u32,
    pub foliage: u32,
    pub water: u32,
}

impl BiomeColors {
    pub const PLAINS: BiomeColors = BiomeColors {
        grass: 0x91BD59,
        foliage: 0x77AB2F,
        water: 0x3F76E4,
    };

    #[inline]
    pub fn get(&self, kind: TintKind) -> u32 {
        match kind {
            TintKind::Grass => self.grass,
            TintKind::Foliage => self.foliage,
            TintKind::Water => self.water,
        }
    }
}

impl Default for BiomeColors {
    fn default() -> Self {
        Self::PLAINS
    }
}

/// Dense box of blocks with light and biome data. Everything outside is air, open sky
/// and the default biome.
#[derive(Clone, Debug)]
pub struct WorldSlice {
    pub origin: BlockPos,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub(crate) blocks: Vec<BlockState>,
    pub(crate) block_light: Vec<u8>,
    pub(crate) sky_light: Vec<u8>,
    biomes: Vec<BiomeColors>,
    default_biome: BiomeColors,
    blend_radius: i32,
}

impl WorldSlice {
    pub fn new(origin: BlockPos, sx: usize, sy: usize, sz: usize) -> Self {
        let n = sx * sy * sz;
        Self {
            origin,
            sx,
            sy,
            sz,
            blocks: vec![BlockState::AIR; n],
            block_light: vec![0; n],
            sky_light: vec![15; n],
            biomes: vec![BiomeColors::default(); sx * sz],
            default_biome: BiomeColors::default(),
            blend_radius: 0,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    /// Local coordinates of `pos`, if inside.
    #[inline]
    pub fn local(&self, pos: BlockPos) -> Option<(usize, usize, usize)> {
        let lx = pos.x - self.origin.x;
        let ly = pos.y - self.origin.y;
        let lz = pos.z - self.origin.z;
        if lx < 0 || ly < 0 || lz < 0 {
            return None;
        }
        let (lx, ly, lz) = (lx as usize, ly as usize, lz as usize);
        if lx >= self.sx || ly >= self.sy || lz >= self.sz {
            return None;
        }
        Some((lx, ly, lz))
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.local(pos).is_some()
    }

    #[inline]
    pub fn get(&self, pos: BlockPos) -> BlockState {
        match self.local(pos) {
            Some((x, y, z)) => self.blocks[self.idx(x, y, z)],
            None => BlockState::AIR,
        }
    }

    /// Writes a block; returns false if `pos` lies outside.
    pub fn set(&mut self, pos: BlockPos, state: BlockState) -> bool {
        match self.local(pos) {
            Some((x, y, z)) => {
                let i = self.idx(x, y, z);
                self.blocks[i] = state;
                true
            }
            None => false,
        }
    }

    /// Overrides stored light at `pos`; `relight` recomputes everything.
    pub fn set_light(&mut self, pos: BlockPos, level: LightLevel) -> bool {
        match self.local(pos) {
            Some((x, y, z)) => {
                let i = self.idx(x, y, z);
                self.block_light[i] = level.block.min(15);
                self.sky_light[i] = level.sky.min(15);
                true
            }
            None => false,
        }
    }

    pub fn set_biome(&mut self, x: i32, z: i32, colors: BiomeColors) -> bool {
        let lx = x - self.origin.x;
        let lz = z - self.origin.z;
        if lx < 0 || lz < 0 || lx as usize >= self.sx || lz as usize >= self.sz {
            return false;
        }
        let i = lz as usize * self.sx + lx as usize;
        self.biomes[i] = colors;
        true
    }

    pub fn set_default_biome(&mut self, colors: BiomeColors) {
        self.default_biome = colors;
    }

    pub fn set_blend_radius(&mut self, radius: i32) {
        self.blend_radius = radius.max(0);
    }

    #[inline]
    pub fn blend_radius(&self) -> i32 {
        self.blend_radius
    }

    /// Unblended biome color of the column at `(x, z)`.
    #[inline]
    pub fn biome_raw(&self, x: i32, z: i32, kind: TintKind) -> u32 {
        let lx = x - self.origin.x;
        let lz = z - self.origin.z;
        if lx < 0 || lz < 0 || lx as usize >= self.sx || lz as usize >= self.sz {
            return self.default_biome.get(kind);
        }
        self.biomes[lz as usize * self.sx + lx as usize].get(kind)
    }

    /// World positions of one horizontal layer, `y` counted up from the origin.
    pub fn layer_positions(&self, y: usize) -> impl Iterator<Item = BlockPos> + '_ {
        (0..self.sz).flat_map(move |z| {
            (0..self.sx).map(move |x| self.origin.add(x as i32, y as i32, z as i32))
        })
    }

    /// World positions of every cell, in storage order.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        (0..self.sy).flat_map(move |y| self.layer_positions(y))
    }
}

impl BlockRenderView for WorldSlice {
    #[inline]
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.get(pos)
    }

    #[inline]
    fn light_level(&self, pos: BlockPos) -> LightLevel {
        match self.local(pos) {
            Some((x, y, z)) => {
                let i = self.idx(x, y, z);
                LightLevel::new(self.block_light[i], self.sky_light[i])
            }
            None => LightLevel::OPEN_SKY,
        }
    }

    fn biome_color(&self, pos: BlockPos, kind: TintKind) -> u32 {
        let r = self.blend_radius;
        if r == 0 {
            return self.biome_raw(pos.x, pos.z, kind);
        }
        let (mut rs, mut gs, mut bs, mut n) = (0u32, 0u32, 0u32, 0u32);
        for dz in -r..=r {
            for dx in -r..=r {
                let c = self.biome_raw(pos.x + dx, pos.z + dz, kind);
                rs += (c >> 16) & 0xFF;
                gs += (c >> 8) & 0xFF;
                bs += c & 0xFF;
                n += 1;
            }
        }
        ((rs / n) << 16) | ((gs / n) << 8) | (bs / n)
    }
}
