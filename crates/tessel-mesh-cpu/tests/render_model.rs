use proptest::prelude::*;
use tessel_blocks::config::{BlockDef, BlocksConfig, SpritesDef, TintConfig, VariantDef};
use tessel_blocks::{BlockRegistry, BlockState, OffsetKind, Shape, SpriteCatalog, SpriteId, TintKind};
use tessel_geom::{BlockPos, Direction};
use tessel_lighting::{LightMode, LightPipelineProvider, QuadLightData};
use tessel_model::{
    BakedModel, BakedQuad, BlockModels, ModelQuad, ModelQuadFacing, ModelQuadOrientation, ModelQuadView,
    PackedColor, QuadFlags, SeededRandom, VERTEX_STRIDE, bake_models,
};
use tessel_model::quad::pack_normal;
use tessel_mesh_cpu::{
    BlockOcclusionCache, BlockRenderer, FacingBuckets, QuadSink, QuadWriter, RenderError, RenderSettings,
    block_seed, build_slice,
};
use tessel_world::{BlockColors, WorldSlice};

const STONE: BlockState = BlockState::of(1);
const GLASS: BlockState = BlockState::of(2);
const SLAB: BlockState = BlockState::of(3);
const FERN: BlockState = BlockState::of(4);
const MOSSY: BlockState = BlockState::of(5);
const RED: BlockState = BlockState::of(6);
const LAMP: BlockState = BlockState::of(7);
const GRASS: BlockState = BlockState::of(8);
const SOLID_SLAB: BlockState = BlockState::of(9);
const SOLID_SLAB_TOP: BlockState = BlockState::new(9, 1);

fn registry() -> BlockRegistry {
    let sprites = SpriteCatalog::from_toml_str(
        r#"
        [sprites]
        stone = "stone.png"
        moss_a = "moss_a.png"
        moss_b = "moss_b.png"
        fern = "fern.png"
    "#,
    )
    .unwrap();
    let all = |k: &str| {
        Some(SpritesDef {
            all: Some(k.into()),
            ..Default::default()
        })
    };
    let blocks = vec![
        BlockDef {
            name: "air".into(),
            id: Some(0),
            shape: Some(Shape::None),
            ..Default::default()
        },
        BlockDef {
            name: "stone".into(),
            sprites: all("stone"),
            ..Default::default()
        },
        BlockDef {
            name: "glass".into(),
            opaque: Some(false),
            hides_same: Some(true),
            ..Default::default()
        },
        BlockDef {
            name: "slab".into(),
            shape: Some(Shape::Slab),
            sprites: all("stone"),
            ..Default::default()
        },
        BlockDef {
            name: "fern".into(),
            shape: Some(Shape::Cross),
            sprites: all("fern"),
            offset: Some(OffsetKind::Xz),
            ..Default::default()
        },
        BlockDef {
            name: "mossy".into(),
            variants: Some(vec![
                VariantDef {
                    sprite: "moss_a".into(),
                    weight: 1,
                },
                VariantDef {
                    sprite: "moss_b".into(),
                    weight: 1,
                },
            ]),
            ..Default::default()
        },
        BlockDef {
            name: "red_tinted".into(),
            tint: Some(TintConfig::Fixed(0xFF0000)),
            ..Default::default()
        },
        BlockDef {
            name: "lamp".into(),
            luminance: Some(15),
            ..Default::default()
        },
        BlockDef {
            name: "grass".into(),
            tint: Some(TintConfig::Biome(TintKind::Grass)),
            ..Default::default()
        },
        BlockDef {
            name: "solid_slab".into(),
            shape: Some(Shape::Slab),
            opaque: Some(true),
            sprites: all("stone"),
            ..Default::default()
        },
    ];
    BlockRegistry::from_configs(
        sprites,
        BlocksConfig {
            blocks,
            unknown_block: None,
        },
    )
    .unwrap()
}

struct Fixture {
    reg: BlockRegistry,
    models: BlockModels,
    colors: BlockColors,
}

impl Fixture {
    fn new() -> Self {
        let reg = registry();
        let models = bake_models(&reg);
        let colors = BlockColors::from_registry(&reg);
        Self { reg, models, colors }
    }

    fn renderer(&self, settings: RenderSettings) -> BlockRenderer<'_> {
        BlockRenderer::new(&self.reg, &self.colors, &settings)
    }

    fn model(&self, state: BlockState) -> &dyn BakedModel {
        self.models.get(state).unwrap()
    }
}

fn flat() -> RenderSettings {
    RenderSettings {
        ambient_occlusion: false,
        biome_blend_radius: 0,
        cull: true,
    }
}

fn world() -> WorldSlice {
    WorldSlice::new(BlockPos::new(-4, -4, -4), 9, 9, 9)
}

#[derive(Default)]
struct Recorder {
    facing: Option<ModelQuadFacing>,
    quads: Vec<(ModelQuadFacing, ModelQuad)>,
}

impl QuadWriter for Recorder {
    fn write(&mut self, quad: &ModelQuad) {
        let facing = self.facing.unwrap_or(ModelQuadFacing::None);
        self.quads.push((facing, *quad));
    }
}

impl QuadSink for Recorder {
    fn writer(&mut self, facing: ModelQuadFacing) -> &mut dyn QuadWriter {
        self.facing = Some(facing);
        self
    }
}

impl Recorder {
    fn facings(&self) -> Vec<ModelQuadFacing> {
        self.quads.iter().map(|(f, _)| *f).collect()
    }

    fn color_of(&self, facing: ModelQuadFacing) -> PackedColor {
        let (_, q) = self.quads.iter().find(|(f, _)| *f == facing).unwrap();
        q.vertices[0].color
    }
}

#[test]
fn cube_without_culling_fills_every_direction_bucket() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, STONE);
    let mut r = fx.renderer(flat());
    let mut sink = FacingBuckets::new();
    let drawn = r
        .render_model(&w, STONE, BlockPos::ORIGIN, fx.model(STONE), &mut sink, false, 42)
        .unwrap();
    assert!(drawn);
    assert_eq!(sink.quad_count(), 6);
    for dir in Direction::ALL {
        assert_eq!(sink.get(dir.into()).quad_count(), 1, "{dir:?}");
    }
    assert!(sink.get(ModelQuadFacing::None).is_empty());
}

#[test]
fn enclosed_cube_emits_nothing_when_culled() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, STONE);
    for dir in Direction::ALL {
        w.set(BlockPos::ORIGIN.offset(dir), STONE);
    }
    let mut r = fx.renderer(flat());
    let mut sink = FacingBuckets::new();
    let drawn = r
        .render_model(&w, STONE, BlockPos::ORIGIN, fx.model(STONE), &mut sink, true, 42)
        .unwrap();
    assert!(!drawn);
    assert_eq!(sink.quad_count(), 0);
}

#[test]
fn air_and_unknown_neighbors_never_occlude() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, STONE);
    w.set(BlockPos::new(0, 1, 0), BlockState::of(999));
    let mut cache = BlockOcclusionCache::new();
    for dir in Direction::ALL {
        assert!(cache.should_draw_side(&w, &fx.reg, STONE, BlockPos::ORIGIN, dir), "{dir:?}");
    }
}

#[test]
fn same_block_hiding_skips_shared_glass_faces() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, GLASS);
    w.set(BlockPos::new(1, 0, 0), GLASS);
    let mut r = fx.renderer(flat());
    let mut sink = Recorder::default();
    r.render_model(&w, GLASS, BlockPos::ORIGIN, fx.model(GLASS), &mut sink, true, 1)
        .unwrap();
    assert_eq!(sink.quads.len(), 5);
    assert!(!sink.facings().contains(&ModelQuadFacing::East));

    // Stone next to glass still draws: glass is not opaque.
    let mut cache = BlockOcclusionCache::new();
    w.set(BlockPos::new(0, 1, 0), STONE);
    assert!(cache.should_draw_side(&w, &fx.reg, STONE, BlockPos::new(0, 1, 0), Direction::Down));
}

#[test]
fn slab_side_is_culled_by_a_full_neighbor_but_its_top_is_not() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, SLAB);
    w.set(BlockPos::new(1, 0, 0), STONE);
    w.set(BlockPos::new(0, 1, 0), STONE);
    let mut r = fx.renderer(flat());
    let mut sink = Recorder::default();
    let drawn = r
        .render_model(&w, SLAB, BlockPos::ORIGIN, fx.model(SLAB), &mut sink, true, 7)
        .unwrap();
    assert!(drawn);
    let facings = sink.facings();
    assert!(!facings.contains(&ModelQuadFacing::East));
    // The inset top face is general geometry and never culled.
    assert_eq!(facings.iter().filter(|f| **f == ModelQuadFacing::None).count(), 1);
    assert_eq!(facings.len(), 5);

    // A stone face against the half-height slab stays visible.
    let mut cache = BlockOcclusionCache::new();
    assert!(cache.should_draw_side(&w, &fx.reg, STONE, BlockPos::new(1, 0, 0), Direction::West));
}

#[test]
fn opaque_slabs_cover_only_matching_halves() {
    let fx = Fixture::new();
    let mut cache = BlockOcclusionCache::new();
    let east = BlockPos::new(1, 0, 0);

    let mut w = world();
    w.set(BlockPos::ORIGIN, SOLID_SLAB);
    w.set(east, SOLID_SLAB);
    assert!(!cache.should_draw_side(&w, &fx.reg, SOLID_SLAB, BlockPos::ORIGIN, Direction::East));
    assert_eq!(cache.len(), 1);
    // Same shape pair again is answered from the cache.
    assert!(!cache.should_draw_side(&w, &fx.reg, SOLID_SLAB, BlockPos::ORIGIN, Direction::East));
    assert_eq!(cache.len(), 1);

    w.set(east, SOLID_SLAB_TOP);
    assert!(cache.should_draw_side(&w, &fx.reg, SOLID_SLAB, BlockPos::ORIGIN, Direction::East));

    w.set(BlockPos::ORIGIN, STONE);
    w.set(east, SOLID_SLAB);
    assert!(cache.should_draw_side(&w, &fx.reg, STONE, BlockPos::ORIGIN, Direction::East));

    let below = BlockPos::new(0, -1, 0);
    w.set(below, STONE);
    w.set(BlockPos::ORIGIN, SOLID_SLAB);
    assert!(!cache.should_draw_side(&w, &fx.reg, STONE, below, Direction::Up));
    assert_eq!(cache.len(), 4);
}

#[test]
fn renderer_culls_between_opaque_slabs() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, SOLID_SLAB);
    w.set(BlockPos::new(1, 0, 0), SOLID_SLAB);
    let mut r = fx.renderer(flat());
    for _ in 0..2 {
        let mut sink = Recorder::default();
        r.render_model(&w, SOLID_SLAB, BlockPos::ORIGIN, fx.model(SOLID_SLAB), &mut sink, true, 5)
            .unwrap();
        assert!(!sink.facings().contains(&ModelQuadFacing::East));
        assert!(sink.facings().contains(&ModelQuadFacing::West));
    }
    // Only the east side reached a shape comparison.
    assert_eq!(r.occlusion_cache().len(), 1);
}

#[test]
fn emitted_vertices_follow_the_resolved_orientation() {
    let fx = Fixture::new();
    let mut w = world();
    for x in -4..=4 {
        for z in -4..=4 {
            w.set(BlockPos::new(x, -1, z), STONE);
        }
    }
    w.set(BlockPos::new(1, 0, 0), STONE);
    w.relight(&fx.reg);
    let pos = BlockPos::new(0, -1, 0);
    let mut r = fx.renderer(RenderSettings::default());
    let mut sink = Recorder::default();
    r.render_model(&w, STONE, pos, fx.model(STONE), &mut sink, true, 3).unwrap();

    let mut rng = SeededRandom::new(3);
    let src = &fx.model(STONE).quads(STONE, Some(Direction::Up), &mut rng)[0];
    let mut light = QuadLightData::default();
    LightPipelineProvider::new().calculate(
        LightMode::Smooth,
        &w,
        &fx.reg,
        src,
        pos,
        &mut light,
        Direction::Up,
        src.has_shade(),
    );
    // The wall darkens one edge, so the corners differ.
    assert!(light.br.iter().any(|b| *b != light.br[0]));
    let order = ModelQuadOrientation::order_of(&light.br);

    let (_, out) = sink
        .quads
        .iter()
        .find(|(f, _)| *f == ModelQuadFacing::Up)
        .unwrap();
    let normal = pack_normal(Direction::Up.normal());
    for dst in 0..4 {
        let si = order.index_of(dst);
        let v = &out.vertices[dst];
        assert_eq!(v.pos, src.position(si));
        assert_eq!(v.u, src.tex_u(si));
        assert_eq!(v.v, src.tex_v(si));
        assert_eq!(v.light, light.lm[si]);
        assert_eq!(v.color, src.color(si).mul(light.br[si]));
        assert_eq!(v.normal, normal);
    }
    assert_eq!(out.sprite, src.sprite());
}

#[test]
fn offsets_shift_positions_only() {
    let fx = Fixture::new();
    let mut w = world();
    let pos = BlockPos::new(3, 0, -2);
    w.set(pos, FERN);
    let mut r = fx.renderer(flat());
    let mut sink = Recorder::default();
    r.render_model(&w, FERN, pos, fx.model(FERN), &mut sink, true, 0).unwrap();
    assert_eq!(sink.quads.len(), 4);
    let offset = OffsetKind::Xz.model_offset(pos);
    let mut rng = SeededRandom::new(0);
    let src = fx.model(FERN).quads(FERN, None, &mut rng);
    for ((facing, out), q) in sink.quads.iter().zip(src) {
        assert_eq!(*facing, ModelQuadFacing::None);
        for dst in 0..4 {
            let p = out.vertices[dst].pos;
            assert!((0..4).any(|si| q.position(si) + offset == p));
        }
    }
}

#[test]
fn same_seed_gives_same_quads_regardless_of_call_order() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, MOSSY);
    let render = |r: &mut BlockRenderer<'_>, seed: u64| {
        let mut sink = Recorder::default();
        r.render_model(&w, MOSSY, BlockPos::ORIGIN, fx.model(MOSSY), &mut sink, true, seed)
            .unwrap();
        sink.quads
    };
    let mut a = fx.renderer(flat());
    let first = render(&mut a, 99);
    render(&mut a, 12345);
    let again = render(&mut a, 99);
    assert_eq!(first, again);

    let mut b = fx.renderer(flat());
    assert_eq!(first, render(&mut b, 99));

    // Every face of one render comes from the same variant.
    let sprite = first[0].1.sprite;
    assert!(first.iter().all(|(_, q)| q.sprite == sprite));
}

#[test]
fn brightness_scales_color_with_floor_rounding() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, STONE);
    let mut r = fx.renderer(flat());
    let mut sink = Recorder::default();
    r.render_model(&w, STONE, BlockPos::ORIGIN, fx.model(STONE), &mut sink, false, 0)
        .unwrap();
    assert_eq!(sink.color_of(ModelQuadFacing::Up), PackedColor::WHITE);
    // Down faces are shaded to half brightness.
    assert_eq!(
        sink.color_of(ModelQuadFacing::Down),
        PackedColor::pack(127, 127, 127, 255)
    );
}

#[test]
fn tint_multiplies_each_channel() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, RED);
    let mut r = fx.renderer(flat());
    let mut sink = Recorder::default();
    r.render_model(&w, RED, BlockPos::ORIGIN, fx.model(RED), &mut sink, false, 0)
        .unwrap();
    let up = sink.color_of(ModelQuadFacing::Up);
    assert_eq!(up.red(), 255);
    assert_eq!(up.green(), 0);
    assert_eq!(up.blue(), 0);
    assert_eq!(up.alpha(), 255);
}

#[test]
fn biome_tint_follows_world_colors() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, GRASS);
    let mut r = fx.renderer(flat());
    let mut sink = Recorder::default();
    r.render_model(&w, GRASS, BlockPos::ORIGIN, fx.model(GRASS), &mut sink, false, 0)
        .unwrap();
    let expect = PackedColor::from_rgb(tessel_world::BiomeColors::PLAINS.grass);
    let up = sink.color_of(ModelQuadFacing::Up);
    assert!(up.red().abs_diff(expect.red()) <= 1);
    assert!(up.green().abs_diff(expect.green()) <= 1);
    assert!(up.blue().abs_diff(expect.blue()) <= 1);
}

#[test]
fn light_mode_respects_emitters_and_settings() {
    let fx = Fixture::new();
    let r = fx.renderer(RenderSettings::default());
    assert_eq!(r.light_mode(STONE, fx.model(STONE)), LightMode::Smooth);
    assert_eq!(r.light_mode(LAMP, fx.model(LAMP)), LightMode::Flat);
    assert_eq!(r.light_mode(FERN, fx.model(FERN)), LightMode::Flat);
    let r = fx.renderer(flat());
    assert_eq!(r.light_mode(STONE, fx.model(STONE)), LightMode::Flat);
}

struct Broken {
    quads: Vec<BakedQuad>,
}

impl BakedModel for Broken {
    fn quads(&self, _state: BlockState, face: Option<Direction>, _rng: &mut SeededRandom) -> &[BakedQuad] {
        match face {
            Some(Direction::Up) => &self.quads[..],
            _ => &[],
        }
    }

    fn use_ambient_occlusion(&self) -> bool {
        true
    }
}

#[test]
fn malformed_quads_fail_fast_and_renderer_stays_usable() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, STONE);
    let broken = Broken {
        quads: vec![BakedQuad::from_raw(
            vec![0u32; 3 * VERTEX_STRIDE].into_boxed_slice(),
            SpriteId::MISSING,
            -1,
            Direction::Up,
            true,
            QuadFlags::default(),
        )],
    };
    let mut r = fx.renderer(RenderSettings::default());
    let mut sink = Recorder::default();
    let err = r
        .render_model(&w, STONE, BlockPos::ORIGIN, &broken, &mut sink, false, 0)
        .unwrap_err();
    assert_eq!(err, RenderError::MalformedQuad { vertices: 3 });
    assert!(sink.quads.is_empty());

    let drawn = r
        .render_model(&w, STONE, BlockPos::ORIGIN, fx.model(STONE), &mut sink, false, 0)
        .unwrap();
    assert!(drawn);
    assert_eq!(sink.quads.len(), 6);
}

#[test]
fn build_slice_renders_each_block_once() {
    let fx = Fixture::new();
    let mut w = world();
    w.set(BlockPos::ORIGIN, STONE);
    w.set(BlockPos::new(1, 0, 0), STONE);
    w.set(BlockPos::new(0, 1, 0), FERN);
    w.relight(&fx.reg);
    let mut r = fx.renderer(RenderSettings::default());
    let mut sink = FacingBuckets::new();
    let stats = build_slice(&mut r, &w, &fx.models, &mut sink, true);
    assert_eq!(stats.blocks, 3);
    assert_eq!(stats.rendered, 3);
    assert_eq!(stats.failed, 0);
    // Two cubes sharing one face, plus four fern planes.
    assert_eq!(sink.quad_count(), 10 + 4);
    assert_eq!(sink.get(ModelQuadFacing::None).quad_count(), 4);
    assert_eq!(block_seed(BlockPos::ORIGIN), block_seed(BlockPos::ORIGIN));
}

proptest! {
    // Under culling, exactly the faces toward non-opaque neighbors are drawn
    #[test]
    fn culled_faces_match_open_neighbors(solid in prop::array::uniform6(any::<bool>()), seed in any::<u64>()) {
        let fx = Fixture::new();
        let mut w = world();
        w.set(BlockPos::ORIGIN, STONE);
        for (dir, s) in Direction::ALL.into_iter().zip(solid) {
            if s {
                w.set(BlockPos::ORIGIN.offset(dir), STONE);
            }
        }
        let mut r = fx.renderer(flat());
        let mut sink = Recorder::default();
        let drawn = r
            .render_model(&w, STONE, BlockPos::ORIGIN, fx.model(STONE), &mut sink, true, seed)
            .unwrap();
        let open = solid.iter().filter(|s| !**s).count();
        prop_assert_eq!(sink.quads.len(), open);
        prop_assert_eq!(drawn, open > 0);
        for (facing, _) in &sink.quads {
            let dir = facing.direction().unwrap();
            prop_assert!(!solid[dir.index()]);
        }
    }
}
