use std::path::PathBuf;

use tessel_blocks::{BlockRegistry, BlockState};
use tessel_geom::{BlockPos, Direction};
use tessel_mesh_cpu::{BlockRenderer, FacingBuckets, RenderSettings, build_slice};
use tessel_model::{ModelQuadFacing, bake_models};
use tessel_world::{BlockColors, WorldSlice};

fn assets() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

fn load() -> (BlockRegistry, RenderSettings) {
    let dir = assets();
    let reg = BlockRegistry::load_from_paths(dir.join("sprites.toml"), dir.join("blocks.toml")).unwrap();
    let settings = RenderSettings::load(dir.join("render.toml")).unwrap();
    (reg, settings)
}

#[test]
fn shipped_assets_load() {
    let (reg, settings) = load();
    assert_eq!(reg.state_by_name("air"), Some(BlockState::AIR));
    for name in ["stone", "grass", "glass", "fern", "smooth_stone_slab", "water", "barrier"] {
        assert!(reg.id_by_name(name).is_some(), "{name}");
    }
    assert_eq!(reg.unknown_block_id, reg.id_by_name("stone"));
    assert!(settings.cull);
    let models = bake_models(&reg);
    // Air, barrier and water have nothing to draw.
    assert!(models.get(reg.state_by_name("water").unwrap()).is_none());
    assert!(models.get(reg.state_by_name("stone").unwrap()).is_some());
}

#[test]
fn shipped_blocks_mesh_without_failures() {
    let (reg, settings) = load();
    let models = bake_models(&reg);
    let colors = BlockColors::from_registry(&reg);
    let mut w = WorldSlice::new(BlockPos::ORIGIN, 4, 4, reg.blocks.len());
    for ty in &reg.blocks {
        w.set(BlockPos::new(1, 1, ty.id as i32), BlockState::of(ty.id));
    }
    w.relight(&reg);
    let mut r = BlockRenderer::new(&reg, &colors, &settings);
    let mut sink = FacingBuckets::new();
    let stats = build_slice(&mut r, &w, &models, &mut sink, settings.cull);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.blocks, models.len());
    assert!(sink.quad_count() > 0);
    for dir in Direction::ALL {
        assert!(!sink.get(dir.into()).is_empty(), "{dir:?}");
    }
    assert!(!sink.get(ModelQuadFacing::None).is_empty());
}
