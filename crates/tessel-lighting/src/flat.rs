use tessel_geom::{BlockPos, Direction};
use tessel_model::{ModelQuadView, QuadFlags};
use tessel_world::BlockRenderView;

use crate::LightPipeline;
use crate::access::{LightDataAccess, LightWorld};
use crate::data::{QuadLightData, diffuse};

/// One light sample shared by all four corners.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatLightPipeline;

impl LightPipeline for FlatLightPipeline {
    fn calculate<W, Q>(
        &mut self,
        cache: &mut LightDataAccess,
        lw: &LightWorld<'_, W>,
        quad: &Q,
        pos: BlockPos,
        out: &mut QuadLightData,
        face: Direction,
        shade: bool,
    ) where
        W: BlockRenderView + ?Sized,
        Q: ModelQuadView + ?Sized,
    {
        // Quads on the block boundary are lit by the cell they face.
        let word = if quad.flags().contains(QuadFlags::ALIGNED) {
            cache.get_offset(lw, pos, face)
        } else {
            cache.get(lw, pos)
        };
        out.lm = [word.lm; 4];
        out.br = [diffuse(face, shade); 4];
    }
}
