use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessel_blocks::{BlockRegistry, BlockState};
use tessel_geom::BlockPos;
use tessel_world::{BiomeColors, DisplayTickSink, Particle, WorldSlice, random_block_display_tick};

const HEIGHT: usize = 10;
const GROUND: i32 = 3;

const SWAMP: BiomeColors = BiomeColors {
    grass: 0x6A7039,
    foliage: 0x6A7039,
    water: 0x617B64,
};

/// Resolves a block by name, falling back to the registry's unknown block, then air.
fn state(reg: &BlockRegistry, name: &str) -> BlockState {
    if let Some(s) = reg.state_by_name(name) {
        return s;
    }
    log::warn!(target: "blocks", "scene block '{}' is not registered", name);
    reg.unknown_block_id.map(BlockState::of).unwrap_or(BlockState::AIR)
}

/// Lays out a small test scene: layered ground, a pond, a wall of weighted variants,
/// glass, slabs, a light source, leaves, and scattered plants.
pub fn build(reg: &BlockRegistry, size: usize, seed: u64, blend_radius: i32) -> WorldSlice {
    let size = size.max(12);
    let n = size as i32;
    let mut w = WorldSlice::new(BlockPos::ORIGIN, size, HEIGHT, size);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let stone = state(reg, "stone");
    let dirt = state(reg, "dirt");
    let grass = state(reg, "grass");
    for x in 0..n {
        for z in 0..n {
            w.set(BlockPos::new(x, 0, z), stone);
            w.set(BlockPos::new(x, 1, z), dirt);
            w.set(BlockPos::new(x, 2, z), dirt);
            w.set(BlockPos::new(x, GROUND, z), grass);
            if x >= n / 2 {
                w.set_biome(x, z, SWAMP);
            }
        }
    }

    let water = state(reg, "water");
    for x in 2..6 {
        for z in 2..6 {
            w.set(BlockPos::new(x, GROUND, z), water);
        }
    }

    let cobble = state(reg, "cobblestone");
    for z in 0..n {
        for y in GROUND + 1..GROUND + 3 {
            w.set(BlockPos::new(n / 2, y, z), cobble);
        }
    }

    // Hollow glass box.
    let glass = state(reg, "glass");
    let (gx, gz) = (n - 6, 2);
    for x in gx..gx + 3 {
        for y in GROUND + 1..GROUND + 4 {
            for z in gz..gz + 3 {
                let inner = x == gx + 1 && z == gz + 1 && y == GROUND + 2;
                if !inner {
                    w.set(BlockPos::new(x, y, z), glass);
                }
            }
        }
    }

    if let Some(slab) = reg.id_by_name("smooth_stone_slab") {
        for x in 2..n - 2 {
            let half = (x & 1) as u16;
            w.set(BlockPos::new(x, GROUND + 1, n - 3), BlockState::new(slab, half));
        }
    }

    w.set(BlockPos::new(n / 2, GROUND + 3, n / 2), state(reg, "glowstone"));
    w.set(BlockPos::new(1, GROUND + 1, 1), state(reg, "barrier"));

    let leaves = state(reg, "oak_leaves");
    for x in 3..6 {
        for y in GROUND + 3..GROUND + 5 {
            for z in n - 8..n - 5 {
                w.set(BlockPos::new(x, y, z), leaves);
            }
        }
    }

    let plants = [state(reg, "fern"), state(reg, "poppy")];
    let mut placed = 0;
    for x in 0..n {
        for z in 0..n {
            let top = BlockPos::new(x, GROUND + 1, z);
            if w.get(top) == BlockState::AIR && w.get(top.down()) == grass && rng.gen_bool(0.15) {
                w.set(top, plants[rng.gen_range(0..plants.len())]);
                placed += 1;
            }
        }
    }

    w.set_blend_radius(blend_radius);
    w.relight(reg);
    log::info!("scene {}x{}x{}: {} plants", size, HEIGHT, size, placed);
    w
}

/// Counts display tick effects instead of spawning anything.
#[derive(Default, Debug)]
pub struct TickTally {
    pub block_ticks: usize,
    pub fluid_ticks: usize,
    pub barriers: usize,
    pub drips: usize,
}

impl DisplayTickSink for TickTally {
    fn block_display_tick(&mut self, _state: BlockState, _pos: BlockPos, _rng: &mut dyn RngCore) {
        self.block_ticks += 1;
    }

    fn fluid_display_tick(&mut self, _state: BlockState, _pos: BlockPos, _rng: &mut dyn RngCore) {
        self.fluid_ticks += 1;
    }

    fn add_particle(&mut self, particle: Particle) {
        match particle {
            Particle::Barrier { .. } => self.barriers += 1,
            Particle::Drip { .. } => self.drips += 1,
        }
    }
}

/// Runs `count` random display ticks around `center`.
pub fn display_ticks(world: &WorldSlice, reg: &BlockRegistry, center: BlockPos, count: usize, seed: u64) -> TickTally {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally = TickTally::default();
    for _ in 0..count {
        random_block_display_tick(world, reg, &mut tally, center, 16, &mut rng, true);
    }
    tally
}
