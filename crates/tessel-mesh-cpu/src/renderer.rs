use tessel_blocks::{BlockRegistry, BlockState};
use tessel_geom::{BlockPos, Direction, Vec3};
use tessel_lighting::{LightMode, LightPipelineProvider, QuadLightData};
use tessel_model::color::normalize;
use tessel_model::quad::pack_normal;
use tessel_model::{
    BakedModel, BakedQuad, ModelQuad, ModelQuadFacing, ModelQuadOrientation, ModelQuadView, ModelVertex,
    SeededRandom,
};
use tessel_world::{BlockColorProvider, BlockColors, BlockRenderView};

use crate::blender::BiomeColorBlender;
use crate::error::RenderError;
use crate::occlusion::BlockOcclusionCache;
use crate::settings::RenderSettings;
use crate::sink::QuadSink;

/// Turns one block's model into lit, tinted quads.
///
/// Holds scratch state reused across calls, so each worker needs its own instance.
pub struct BlockRenderer<'r> {
    reg: &'r BlockRegistry,
    colors: &'r BlockColors,
    random: SeededRandom,
    occlusion: BlockOcclusionCache,
    lighters: LightPipelineProvider,
    blender: BiomeColorBlender,
    quad: ModelQuad,
    light: QuadLightData,
    use_ambient_occlusion: bool,
}

impl<'r> BlockRenderer<'r> {
    pub fn new(reg: &'r BlockRegistry, colors: &'r BlockColors, settings: &RenderSettings) -> Self {
        Self {
            reg,
            colors,
            random: SeededRandom::default(),
            occlusion: BlockOcclusionCache::new(),
            lighters: LightPipelineProvider::new(),
            blender: BiomeColorBlender::for_radius(settings.biome_blend_radius),
            quad: ModelQuad::default(),
            light: QuadLightData::default(),
            use_ambient_occlusion: settings.ambient_occlusion,
        }
    }

    /// Drops light data cached by position. Call before rendering against a different
    /// or modified world.
    pub fn prepare(&mut self) {
        self.lighters.reset();
    }

    pub fn occlusion_cache(&self) -> &BlockOcclusionCache {
        &self.occlusion
    }

    pub fn light_mode(&self, state: BlockState, model: &dyn BakedModel) -> LightMode {
        LightMode::select(
            self.use_ambient_occlusion,
            model.use_ambient_occlusion(),
            self.reg.luminance(state),
        )
    }

    /// Emits the quads of `model` for the block at `pos` into `sink`.
    ///
    /// Returns whether any quad list was rendered. Fails on the first quad that does not
    /// carry exactly four vertices.
    #[allow(clippy::too_many_arguments)]
    pub fn render_model<S: QuadSink + ?Sized>(
        &mut self,
        world: &dyn BlockRenderView,
        state: BlockState,
        pos: BlockPos,
        model: &dyn BakedModel,
        sink: &mut S,
        cull: bool,
        seed: u64,
    ) -> Result<bool, RenderError> {
        let mode = self.light_mode(state, model);
        let offset = self.reg.ty(state).offset.model_offset(pos);
        let mut rendered = false;

        for dir in Direction::ALL {
            self.random.set_seed(seed);
            let sided = model.quads(state, Some(dir), &mut self.random);
            if sided.is_empty() {
                continue;
            }
            if !cull || self.occlusion.should_draw_side(world, self.reg, state, pos, dir) {
                self.render_quad_list(world, state, pos, mode, offset, sink, sided, dir.into())?;
                rendered = true;
            }
        }

        self.random.set_seed(seed);
        let all = model.quads(state, None, &mut self.random);
        if !all.is_empty() {
            self.render_quad_list(world, state, pos, mode, offset, sink, all, ModelQuadFacing::None)?;
            rendered = true;
        }

        Ok(rendered)
    }

    #[allow(clippy::too_many_arguments)]
    fn render_quad_list<S: QuadSink + ?Sized>(
        &mut self,
        world: &dyn BlockRenderView,
        state: BlockState,
        pos: BlockPos,
        mode: LightMode,
        offset: Vec3,
        sink: &mut S,
        quads: &[BakedQuad],
        facing: ModelQuadFacing,
    ) -> Result<(), RenderError> {
        let mut colorizer: Option<&'r dyn BlockColorProvider> = None;

        for quad in quads {
            if !quad.is_well_formed() {
                return Err(RenderError::MalformedQuad {
                    vertices: quad.vertex_count(),
                });
            }
            self.lighters.calculate(
                mode,
                world,
                self.reg,
                quad,
                pos,
                &mut self.light,
                quad.light_face(),
                quad.has_shade(),
            );
            if quad.has_color() && colorizer.is_none() {
                colorizer = self.colors.provider_for(state);
            }
            self.render_quad(world, state, pos, offset, colorizer, quad);
            sink.writer(facing).write(&self.quad);
        }
        Ok(())
    }

    fn render_quad(
        &mut self,
        world: &dyn BlockRenderView,
        state: BlockState,
        pos: BlockPos,
        offset: Vec3,
        colorizer: Option<&dyn BlockColorProvider>,
        src: &BakedQuad,
    ) {
        let light = &self.light;
        let order = ModelQuadOrientation::order_of(&light.br);
        let norm = pack_normal(src.light_face().normal());
        let colors = match colorizer {
            Some(provider) if src.has_color() => {
                Some(self.blender.get_colors(provider, world, state, pos, src))
            }
            _ => None,
        };

        let copy = &mut self.quad;
        for dst in 0..4 {
            let si = order.index_of(dst);
            let br = light.br[si];
            let color = match &colors {
                None => src.color(si).mul(br),
                Some(tints) => {
                    let t = tints[si];
                    src.color(si).mul_rgb(
                        normalize(t.red()) * br,
                        normalize(t.green()) * br,
                        normalize(t.blue()) * br,
                    )
                }
            };
            copy.vertices[dst] = ModelVertex {
                pos: src.position(si) + offset,
                color,
                u: src.tex_u(si),
                v: src.tex_v(si),
                light: light.lm[si],
                normal: norm,
            };
        }
        copy.sprite = src.sprite();
        copy.flags = src.flags();
        copy.face = src.light_face();
        copy.color_index = src.color_index();
        copy.shade = src.has_shade();
    }
}
