use rand::{Rng, RngCore};
use tessel_blocks::{BlockRegistry, BlockState};
use tessel_geom::{BlockPos, Direction, Vec3};

use crate::BlockRenderView;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Particle {
    /// Barrier marker at the block center.
    Barrier { at: Vec3 },
    /// Fluid drip spawned in the cell below a fluid block.
    Drip {
        pos: BlockPos,
        state: BlockState,
        solid_bottom: bool,
    },
}

/// Receives the effects of a random display tick.
pub trait DisplayTickSink {
    fn block_display_tick(&mut self, state: BlockState, pos: BlockPos, rng: &mut dyn RngCore);

    fn fluid_display_tick(&mut self, state: BlockState, pos: BlockPos, rng: &mut dyn RngCore);

    fn add_particle(&mut self, particle: Particle);
}

/// Ticks one random block near `center`. Each axis is offset by the difference of two
/// draws in `0..radius`, which favors cells close to the center.
pub fn random_block_display_tick<W, S, R>(
    world: &W,
    reg: &BlockRegistry,
    sink: &mut S,
    center: BlockPos,
    radius: i32,
    rng: &mut R,
    spawn_barrier_particles: bool,
) where
    W: BlockRenderView + ?Sized,
    S: DisplayTickSink + ?Sized,
    R: Rng,
{
    if radius <= 0 {
        return;
    }
    let x = center.x + (rng.gen_range(0..radius) - rng.gen_range(0..radius));
    let y = center.y + (rng.gen_range(0..radius) - rng.gen_range(0..radius));
    let z = center.z + (rng.gen_range(0..radius) - rng.gen_range(0..radius));
    let pos = BlockPos::new(x, y, z);

    let state = world.block_state(pos);
    let ty = reg.ty(state);

    if !ty.is_air() {
        sink.block_display_tick(state, pos, rng);
        if spawn_barrier_particles && ty.barrier {
            sink.add_particle(Particle::Barrier {
                at: Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5),
            });
        }
    }

    if let Some(fluid) = ty.fluid {
        sink.fluid_display_tick(state, pos, rng);
        if fluid.drips && rng.gen_range(0..10) == 0 {
            let solid_bottom = reg.is_solid_full_square(state, Direction::Down);
            let below = pos.down();
            sink.add_particle(Particle::Drip {
                pos: below,
                state: world.block_state(below),
                solid_bottom,
            });
        }
    }
}
