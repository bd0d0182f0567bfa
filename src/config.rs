use std::path::{Path, PathBuf};

use clap::Parser;
use tessel_mesh_cpu::RenderSettings;

/// Command-line arguments. Flags override values read from `render.toml`.
#[derive(Parser, Debug)]
#[command(name = "tessel", about = "Meshes a demo block scene and reports what was emitted")]
pub struct Args {
    /// Directory holding sprites.toml, blocks.toml and render.toml.
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Seed for scene decoration and display ticks.
    #[arg(long, default_value_t = 0xC0FFEE)]
    pub seed: u64,

    /// Draw every face, hidden or not.
    #[arg(long)]
    pub no_cull: bool,

    /// Disable ambient occlusion and biome blending.
    #[arg(long)]
    pub flat: bool,

    /// Scene edge length in blocks.
    #[arg(long, default_value_t = 24)]
    pub size: usize,

    /// Mesh-building threads, each with its own renderer.
    #[arg(long, default_value_t = 2)]
    pub workers: usize,

    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    pub fn asset(&self, name: &str) -> PathBuf {
        self.assets.join(name)
    }

    /// Reads `render.toml` from the asset directory, falling back to defaults, then
    /// applies flag overrides.
    pub fn render_settings(&self) -> RenderSettings {
        let path = self.asset("render.toml");
        let mut settings = load_or_default(&path);
        if self.no_cull {
            settings.cull = false;
        }
        if self.flat {
            settings.ambient_occlusion = false;
            settings.biome_blend_radius = 0;
        }
        settings
    }
}

fn load_or_default(path: &Path) -> RenderSettings {
    if !path.exists() {
        log::info!("{} not found; using default render settings", path.display());
        return RenderSettings::default();
    }
    match RenderSettings::load(path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("failed to read {}: {}; using defaults", path.display(), e);
            RenderSettings::default()
        }
    }
}
