use std::time::Instant;

use tessel_blocks::offset::position_hash;
use tessel_geom::BlockPos;
use tessel_model::BlockModels;
use tessel_world::WorldSlice;

use crate::renderer::BlockRenderer;
use crate::sink::QuadSink;

/// Counters from one [`build_slice`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceStats {
    pub blocks: usize,
    pub rendered: usize,
    pub failed: usize,
    pub total_ms: u32,
}

/// Model selection seed for a block position.
#[inline]
pub fn block_seed(pos: BlockPos) -> u64 {
    position_hash(pos.x, pos.y, pos.z) as u64
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Renders every non-air block of `world` into `sink`.
pub fn build_slice<S: QuadSink + ?Sized>(
    renderer: &mut BlockRenderer<'_>,
    world: &WorldSlice,
    models: &BlockModels,
    sink: &mut S,
    cull: bool,
) -> SliceStats {
    build_blocks(renderer, world, models, sink, cull, world.positions())
}

/// Renders the blocks at `positions`.
///
/// A block whose model is malformed is logged and skipped; the remaining blocks still
/// render.
pub fn build_blocks<S, I>(
    renderer: &mut BlockRenderer<'_>,
    world: &WorldSlice,
    models: &BlockModels,
    sink: &mut S,
    cull: bool,
    positions: I,
) -> SliceStats
where
    S: QuadSink + ?Sized,
    I: IntoIterator<Item = BlockPos>,
{
    let start = Instant::now();
    let mut stats = SliceStats::default();
    renderer.prepare();
    for pos in positions {
        let state = world.get(pos);
        let Some(model) = models.get(state) else {
            continue;
        };
        stats.blocks += 1;
        match renderer.render_model(world, state, pos, model, sink, cull, block_seed(pos)) {
            Ok(true) => stats.rendered += 1,
            Ok(false) => {}
            Err(e) => {
                stats.failed += 1;
                log::warn!(target: "mesh", "block {:?} at {:?}: {}", state, pos, e);
            }
        }
    }
    stats.total_ms = elapsed_ms(start);
    log::debug!(
        target: "mesh",
        "ms={} build_blocks blocks={} rendered={} failed={}",
        stats.total_ms,
        stats.blocks,
        stats.rendered,
        stats.failed
    );
    stats
}

impl SliceStats {
    /// Sums counters; elapsed time takes the slower side.
    pub fn merge(self, other: SliceStats) -> SliceStats {
        SliceStats {
            blocks: self.blocks + other.blocks,
            rendered: self.rendered + other.rendered,
            failed: self.failed + other.failed,
            total_ms: self.total_ms.max(other.total_ms),
        }
    }
}
