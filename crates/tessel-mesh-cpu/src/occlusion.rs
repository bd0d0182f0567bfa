use hashbrown::HashMap;
use tessel_blocks::{BlockRegistry, BlockState, ShapeId};
use tessel_geom::{BlockPos, Direction};
use tessel_world::BlockRenderView;

/// Face visibility test against the neighboring block, with memoized shape comparisons.
///
/// Owned by one renderer; it is never shared between threads.
#[derive(Clone, Debug, Default)]
pub struct BlockOcclusionCache {
    map: HashMap<(ShapeId, ShapeId, Direction), bool>,
}

impl BlockOcclusionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the face of `state` at `pos` toward `dir` can be seen. Returns false only
    /// when the neighbor provably covers the whole face.
    pub fn should_draw_side<W: BlockRenderView + ?Sized>(
        &mut self,
        world: &W,
        reg: &BlockRegistry,
        state: BlockState,
        pos: BlockPos,
        dir: Direction,
    ) -> bool {
        let adj = world.block_state(pos.offset(dir));
        if reg.ty(state).hides_same && adj.id == state.id {
            return false;
        }
        if !reg.is_opaque(adj) {
            return true;
        }
        let self_shape = reg.cull_shape(state);
        let adj_shape = reg.cull_shape(adj);
        if self_shape == ShapeId::FULL && adj_shape == ShapeId::FULL {
            return false;
        }
        self.calculate(reg, self_shape, adj_shape, dir)
    }

    fn calculate(&mut self, reg: &BlockRegistry, self_shape: ShapeId, adj_shape: ShapeId, dir: Direction) -> bool {
        *self
            .map
            .entry((self_shape, adj_shape, dir))
            .or_insert_with(|| {
                let face = reg.shape(self_shape).touched(dir);
                let cover = reg.shape(adj_shape).covered(dir.opposite());
                let draw = face.overhangs(cover);
                log::trace!(
                    target: "mesh",
                    "occlusion miss self={:?} adj={:?} dir={:?} draw={}",
                    self_shape,
                    adj_shape,
                    dir,
                    draw
                );
                draw
            })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
