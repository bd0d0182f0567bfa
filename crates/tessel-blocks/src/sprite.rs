use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::Deserialize;

use crate::types::SpriteId;

/// Atlas region a sprite occupies, in normalized atlas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl AtlasRect {
    pub const FULL: AtlasRect = AtlasRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    /// Maps sprite-local `(u, v)` in `[0,1]` into the atlas.
    #[inline]
    pub fn map(&self, u: f32, v: f32) -> (f32, f32) {
        (
            self.u0 + (self.u1 - self.u0) * u,
            self.v0 + (self.v1 - self.v0) * v,
        )
    }
}

#[derive(Clone, Debug)]
pub struct Sprite {
    pub id: SpriteId,
    pub key: String,
    pub path: Option<PathBuf>,
    pub rect: AtlasRect,
}

#[derive(Clone, Debug)]
pub struct SpriteCatalog {
    pub sprites: Vec<Sprite>,
    pub by_key: HashMap<String, SpriteId>,
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self {
            // Id 0 is the missing-sprite sentinel.
            sprites: vec![Sprite {
                id: SpriteId::MISSING,
                key: String::new(),
                path: None,
                rect: AtlasRect::FULL,
            }],
            by_key: HashMap::new(),
        }
    }

    pub fn get_id(&self, key: &str) -> Option<SpriteId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0 as usize)
    }

    /// Atlas rect for `id`; unknown ids map to the full atlas.
    #[inline]
    pub fn rect(&self, id: SpriteId) -> AtlasRect {
        self.get(id).map(|s| s.rect).unwrap_or(AtlasRect::FULL)
    }

    pub fn insert(&mut self, key: &str, path: Option<PathBuf>, rect: AtlasRect) -> SpriteId {
        if let Some(id) = self.get_id(key) {
            return id;
        }
        let id = SpriteId(self.sprites.len() as u16);
        self.by_key.insert(key.to_string(), id);
        self.sprites.push(Sprite {
            id,
            key: key.to_string(),
            path,
            rect,
        });
        id
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: SpritesConfig = toml::from_str(toml_str)?;
        let mut catalog = SpriteCatalog::new();
        let mut entries: Vec<(String, SpriteEntry)> = cfg.sprites.into_iter().collect();
        // Sort so SpriteId assignment does not depend on HashMap order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, entry) in entries {
            let (path, rect) = match entry {
                SpriteEntry::Path(p) => (Some(PathBuf::from(p)), AtlasRect::FULL),
                SpriteEntry::Detail { path, uv } => {
                    let rect = match uv {
                        Some([u0, v0, u1, v1]) => AtlasRect { u0, v0, u1, v1 },
                        None => AtlasRect::FULL,
                    };
                    (path.map(PathBuf::from), rect)
                }
            };
            catalog.insert(&key, path, rect);
        }
        log::debug!(target: "blocks", "loaded {} sprites", catalog.sprites.len() - 1);
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
pub struct SpritesConfig {
    pub sprites: HashMap<String, SpriteEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum SpriteEntry {
    // stone = "textures/stone.png"
    Path(String),
    // stone = { path = "textures/stone.png", uv = [0.0, 0.0, 0.25, 0.25] }
    Detail {
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        uv: Option<[f32; 4]>,
    },
}
