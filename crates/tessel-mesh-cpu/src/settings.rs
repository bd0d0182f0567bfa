use std::error::Error;
use std::path::Path;

use serde::Deserialize;

/// Renderer options, read from `render.toml`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Global ambient occlusion toggle.
    pub ambient_occlusion: bool,
    /// Biome averaging radius; 0 selects flat tinting.
    pub biome_blend_radius: i32,
    pub cull: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            ambient_occlusion: true,
            biome_blend_radius: 2,
            cull: true,
        }
    }
}

impl RenderSettings {
    pub fn from_toml_str(src: &str) -> Result<Self, Box<dyn Error>> {
        let mut settings: RenderSettings = toml::from_str(src)?;
        settings.biome_blend_radius = settings.biome_blend_radius.max(0);
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let src = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_toml_str(&src)?;
        log::debug!(target: "mesh", "render settings from {}: {:?}", path.as_ref().display(), settings);
        Ok(settings)
    }
}
