//! Per-quad light pipelines: flat and smooth (ambient occlusion).
#![forbid(unsafe_code)]

mod access;
mod data;
mod flat;
mod smooth;

pub use access::{LightDataAccess, LightWord, LightWorld, OCCLUDER_AO};
pub use data::{QuadLightData, block_coord, diffuse, pack_coords, pack_light, sky_coord};
pub use flat::FlatLightPipeline;
pub use smooth::{SmoothLightPipeline, corner_brightness, corner_weights, face_depth, face_tangents};

use tessel_blocks::BlockRegistry;
use tessel_geom::{BlockPos, Direction};
use tessel_model::ModelQuadView;
use tessel_world::BlockRenderView;

/// Computes brightness and light map values for the four corners of a quad.
///
/// Implementations write every element of `out`; nothing is retained past the call
/// apart from caches keyed on `pos`.
pub trait LightPipeline {
    #[allow(clippy::too_many_arguments)]
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
        Q: ModelQuadView + ?Sized;

    fn reset(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightMode {
    Flat,
    Smooth,
}

impl LightMode {
    /// Smooth lighting needs AO enabled globally, a model that opts in, and a block that
    /// emits no light.
    #[inline]
    pub fn select(ao_enabled: bool, model_ao: bool, luminance: u8) -> LightMode {
        if ao_enabled && model_ao && luminance == 0 {
            LightMode::Smooth
        } else {
            LightMode::Flat
        }
    }
}

/// Owns both pipelines and the light cache they share. One per renderer.
#[derive(Default)]
pub struct LightPipelineProvider {
    access: LightDataAccess,
    flat: FlatLightPipeline,
    smooth: SmoothLightPipeline,
}

impl LightPipelineProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn calculate<W, Q>(
        &mut self,
        mode: LightMode,
        world: &W,
        reg: &BlockRegistry,
        quad: &Q,
        pos: BlockPos,
        out: &mut QuadLightData,
        face: Direction,
        shade: bool,
    ) where
        W: BlockRenderView + ?Sized,
        Q: ModelQuadView + ?Sized,
    {
        let lw = LightWorld::new(world, reg);
        match mode {
            LightMode::Flat => self
                .flat
                .calculate(&mut self.access, &lw, quad, pos, out, face, shade),
            LightMode::Smooth => self
                .smooth
                .calculate(&mut self.access, &lw, quad, pos, out, face, shade),
        }
    }

    /// Forgets all cached light data. Required after the world behind the view changes.
    pub fn reset(&mut self) {
        self.access.clear();
        self.flat.reset();
        self.smooth.reset();
        log::trace!(target: "light", "light caches cleared");
    }

    pub fn cached_positions(&self) -> usize {
        self.access.len()
    }
}
