use std::error::Error;
use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use tessel_geom::Direction;

use super::config::{BlockDef, BlocksConfig, FluidDef, SpritesDef, TintConfig};
use super::offset::OffsetKind;
use super::shape::{CullShape, ShapeId, ShapeTable, slab_box};
use super::sprite::SpriteCatalog;
use super::types::{BlockId, BlockState, Shape, SpriteId, Tint};

/// Per-face sprite lookup resolved at load time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceSprites {
    pub top: SpriteId,
    pub bottom: SpriteId,
    pub side: SpriteId,
}

impl FaceSprites {
    pub fn uniform(id: SpriteId) -> Self {
        Self {
            top: id,
            bottom: id,
            side: id,
        }
    }

    #[inline]
    pub fn for_face(&self, dir: Direction) -> SpriteId {
        match dir {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            _ => self.side,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub sprites: SpriteCatalog,
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub shapes: ShapeTable,
    pub unknown_block_id: Option<BlockId>,
    // Returned for ids with no definition.
    fallback: BlockType,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            sprites: SpriteCatalog::new(),
            blocks: Vec::new(),
            by_name: HashMap::new(),
            shapes: ShapeTable::new(),
            unknown_block_id: None,
            fallback: BlockType::placeholder(0),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    /// Type for `state`; undefined ids behave as air.
    #[inline]
    pub fn ty(&self, state: BlockState) -> &BlockType {
        self.get(state.id).unwrap_or(&self.fallback)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn state_by_name(&self, name: &str) -> Option<BlockState> {
        self.id_by_name(name).map(BlockState::of)
    }

    #[inline]
    pub fn cull_shape(&self, state: BlockState) -> ShapeId {
        self.ty(state).cull_shape(state)
    }

    #[inline]
    pub fn shape(&self, id: ShapeId) -> &CullShape {
        self.shapes.get(id)
    }

    #[inline]
    pub fn is_opaque(&self, state: BlockState) -> bool {
        self.ty(state).opaque
    }

    #[inline]
    pub fn is_full_cube(&self, state: BlockState) -> bool {
        self.cull_shape(state) == ShapeId::FULL
    }

    #[inline]
    pub fn luminance(&self, state: BlockState) -> u8 {
        self.ty(state).luminance
    }

    /// Solid block whose face toward `dir` is a complete square.
    pub fn is_solid_full_square(&self, state: BlockState, dir: Direction) -> bool {
        let ty = self.ty(state);
        ty.opaque && self.shape(ty.cull_shape(state)).is_full_square(dir)
    }

    pub fn load_from_paths(
        sprites_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let sprites = SpriteCatalog::from_path(sprites_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        let blocks_cfg: BlocksConfig = toml::from_str(&blocks_toml)?;
        Self::from_configs(sprites, blocks_cfg)
    }

    pub fn from_configs(sprites: SpriteCatalog, cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry {
            sprites,
            ..BlockRegistry::new()
        };
        let mut seen: HashMap<String, BlockId> = HashMap::new();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if let Some(prev) = seen.insert(def.name.clone(), id) {
                return Err(format!("block '{}' defined twice (ids {} and {})", def.name, prev, id).into());
            }
            let ty = compile_block(&mut reg, id, def);
            while reg.blocks.len() <= id as usize {
                let gap = reg.blocks.len() as BlockId;
                reg.blocks.push(BlockType::placeholder(gap));
            }
            reg.blocks[id as usize] = ty;
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();
        if let Some(name) = cfg.unknown_block {
            reg.unknown_block_id = reg.id_by_name(&name);
        }
        log::info!(
            target: "blocks",
            "registry: {} blocks, {} sprites, {} culling shapes",
            reg.by_name.len(),
            reg.sprites.sprites.len() - 1,
            reg.shapes.len()
        );
        Ok(reg)
    }
}

fn compile_block(reg: &mut BlockRegistry, id: BlockId, def: BlockDef) -> BlockType {
    let shape = def.shape.unwrap_or(Shape::Cube);
    let opaque = def.opaque.unwrap_or(shape == Shape::Cube);
    let cull_shapes = match shape {
        Shape::Cube => [ShapeId::FULL, ShapeId::FULL],
        Shape::Slab => [
            reg.shapes.intern(CullShape::from_boxes(vec![slab_box(false)])),
            reg.shapes.intern(CullShape::from_boxes(vec![slab_box(true)])),
        ],
        Shape::Cross | Shape::None => [ShapeId::EMPTY, ShapeId::EMPTY],
    };
    let sprites = resolve_sprites(&reg.sprites, &def.name, def.sprites.as_ref());
    let variants = def
        .variants
        .unwrap_or_default()
        .into_iter()
        .map(|v| (resolve_key(&reg.sprites, &def.name, &v.sprite), v.weight))
        .collect();
    let tint = def.tint.map(|t| match t {
        TintConfig::Biome(kind) => Tint::Biome(kind),
        TintConfig::Fixed(rgb) => Tint::Fixed(rgb & 0x00FF_FFFF),
    });
    BlockType {
        id,
        name: def.name,
        opaque,
        luminance: def.luminance.unwrap_or(0).min(15),
        shape,
        sprites,
        variants,
        tint,
        offset: def.offset.unwrap_or_default(),
        // Cross-shaped plants skip AO by default.
        ambient_occlusion: def.ambient_occlusion.unwrap_or(shape != Shape::Cross),
        hides_same: def.hides_same.unwrap_or(false),
        barrier: def.barrier.unwrap_or(false),
        fluid: def.fluid,
        cull_shapes,
    }
}

fn resolve_key(cat: &SpriteCatalog, block: &str, key: &str) -> SpriteId {
    match cat.get_id(key) {
        Some(id) => id,
        None => {
            log::warn!(target: "blocks", "block '{}' references unknown sprite '{}'", block, key);
            SpriteId::MISSING
        }
    }
}

fn resolve_sprites(cat: &SpriteCatalog, block: &str, def: Option<&SpritesDef>) -> FaceSprites {
    let Some(def) = def else {
        return FaceSprites::default();
    };
    let pick = |k: &Option<String>| -> SpriteId {
        match k.as_ref().or(def.all.as_ref()) {
            Some(key) => resolve_key(cat, block, key),
            None => SpriteId::MISSING,
        }
    };
    FaceSprites {
        top: pick(&def.top),
        bottom: pick(&def.bottom),
        side: pick(&def.side),
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub opaque: bool,
    pub luminance: u8,
    pub shape: Shape,
    pub sprites: FaceSprites,
    // Weighted sprite alternatives (sprite, weight)
    pub variants: Vec<(SpriteId, u32)>,
    pub tint: Option<Tint>,
    pub offset: OffsetKind,
    pub ambient_occlusion: bool,
    // Faces toward a neighbor of the same type are never drawn.
    pub hides_same: bool,
    pub barrier: bool,
    pub fluid: Option<FluidDef>,
    // Culling shape per half (slabs); other shapes repeat one entry
    cull_shapes: [ShapeId; 2],
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            opaque: false,
            luminance: 0,
            shape: Shape::None,
            sprites: FaceSprites::default(),
            variants: Vec::new(),
            tint: None,
            offset: OffsetKind::None,
            ambient_occlusion: false,
            hides_same: false,
            barrier: false,
            fluid: None,
            cull_shapes: [ShapeId::EMPTY, ShapeId::EMPTY],
        }
    }

    #[inline]
    pub fn cull_shape(&self, state: BlockState) -> ShapeId {
        self.cull_shapes[(state.variant & 1) as usize]
    }

    /// Slab states with variant bit 0 set are the upper half.
    #[inline]
    pub fn is_top_half(&self, state: BlockState) -> bool {
        self.shape == Shape::Slab && state.variant & 1 == 1
    }

    /// Nothing to draw and nothing to tick.
    pub fn is_air(&self) -> bool {
        self.shape == Shape::None && self.fluid.is_none() && !self.barrier
    }

    pub fn is_fluid(&self) -> bool {
        self.fluid.is_some()
    }
}
