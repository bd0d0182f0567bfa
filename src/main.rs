use std::error::Error;

use clap::Parser;
use hashbrown::HashMap;
use rayon::prelude::*;
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use tessel_blocks::{BlockRegistry, SpriteId};
use tessel_geom::BlockPos;
use tessel_mesh_cpu::{BlockRenderer, FacingBuckets, RenderSettings, SliceStats, build_blocks};
use tessel_model::{BlockModels, ModelQuadFacing, bake_models};
use tessel_world::{BlockColors, WorldSlice};

mod config;
mod scene;

use config::Args;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Meshes `world` on a pool of `workers` threads, one layer per task. Each fold chain owns
/// its renderer and output buckets; renderers are never shared between threads.
fn mesh_world(
    reg: &BlockRegistry,
    colors: &BlockColors,
    models: &BlockModels,
    world: &WorldSlice,
    settings: &RenderSettings,
    workers: usize,
) -> Result<(SliceStats, Vec<FacingBuckets>), ThreadPoolBuildError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("tessel-mesh-{i}"))
        .build()?;
    let out = pool.install(|| {
        (0..world.sy)
            .into_par_iter()
            .fold(
                || {
                    (
                        BlockRenderer::new(reg, colors, settings),
                        FacingBuckets::new(),
                        SliceStats::default(),
                    )
                },
                |(mut renderer, mut sink, stats), y| {
                    let layer = world.layer_positions(y);
                    let s = build_blocks(&mut renderer, world, models, &mut sink, settings.cull, layer);
                    (renderer, sink, stats.merge(s))
                },
            )
            .map(|(_, sink, stats)| (stats, vec![sink]))
            .reduce(
                || (SliceStats::default(), Vec::new()),
                |(a, mut sinks), (b, more)| {
                    sinks.extend(more);
                    (a.merge(b), sinks)
                },
            )
    });
    Ok(out)
}

fn report(reg: &BlockRegistry, stats: &SliceStats, sinks: &[FacingBuckets]) {
    log::info!(
        "meshed {} blocks ({} emitted geometry, {} failed) in {} ms",
        stats.blocks,
        stats.rendered,
        stats.failed,
        stats.total_ms
    );
    for facing in ModelQuadFacing::ALL {
        let quads: usize = sinks.iter().map(|s| s.get(facing).quad_count()).sum();
        log::info!("  {:?}: {} quads", facing, quads);
    }
    let mut by_sprite: HashMap<SpriteId, usize> = HashMap::new();
    for sink in sinks {
        for (_, build) in sink.iter() {
            for sprite in &build.sprites {
                *by_sprite.entry(*sprite).or_insert(0) += 1;
            }
        }
    }
    let mut top: Vec<(SpriteId, usize)> = by_sprite.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (sprite, count) in top.iter().take(8) {
        let key = reg.sprites.get(*sprite).map(|s| s.key.as_str()).unwrap_or("?");
        log::debug!("  sprite {} ({}): {} quads", sprite.0, key, count);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let reg = BlockRegistry::load_from_paths(args.asset("sprites.toml"), args.asset("blocks.toml"))?;
    let settings = args.render_settings();
    log::info!("render settings: {:?}", settings);

    let models = bake_models(&reg);
    let colors = BlockColors::from_registry(&reg);
    let world = scene::build(&reg, args.size, args.seed, settings.biome_blend_radius);

    let (stats, sinks) = mesh_world(&reg, &colors, &models, &world, &settings, args.workers)?;
    report(&reg, &stats, &sinks);

    let center = BlockPos::new(world.sx as i32 / 2, 4, world.sz as i32 / 2);
    let ticks = scene::display_ticks(&world, &reg, center, 512, args.seed);
    log::info!("display ticks: {:?}", ticks);
    Ok(())
}
