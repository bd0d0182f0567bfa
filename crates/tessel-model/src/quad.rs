use tessel_blocks::SpriteId;
use tessel_geom::{Direction, Vec3};

use crate::color::PackedColor;

/// `u32` words per vertex in baked vertex data: x, y, z, color, u, v, light, normal.
pub const VERTEX_STRIDE: usize = 8;

const POSITION: usize = 0;
const COLOR: usize = 3;
const TEXTURE: usize = 4;
const LIGHT: usize = 6;
const NORMAL: usize = 7;

const BOUND_EPS: f32 = 1e-4;

/// Geometry flags computed once when a quad is baked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct QuadFlags(pub u8);

impl QuadFlags {
    /// Does not span the whole block face.
    pub const PARTIAL: QuadFlags = QuadFlags(1);
    /// All vertices share the coordinate along the light face axis.
    pub const PARALLEL: QuadFlags = QuadFlags(2);
    /// Parallel and lying on the block boundary of its light face.
    pub const ALIGNED: QuadFlags = QuadFlags(4);

    #[inline]
    pub fn contains(self, other: QuadFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn union(self, other: QuadFlags) -> QuadFlags {
        QuadFlags(self.0 | other.0)
    }

    /// Flags for a quad with the given positions and light face.
    pub fn compute(positions: &[Vec3; 4], face: Direction) -> QuadFlags {
        let mut min = positions[0];
        let mut max = positions[0];
        for p in &positions[1..] {
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        let axis = face.axis();
        let mut partial = false;
        for a in 0..3 {
            if a != axis && (min.axis(a) >= BOUND_EPS || max.axis(a) <= 1.0 - BOUND_EPS) {
                partial = true;
            }
        }
        let parallel = (max.axis(axis) - min.axis(axis)).abs() < BOUND_EPS;
        let on_boundary = if face.is_positive() {
            min.axis(axis) > 1.0 - BOUND_EPS
        } else {
            max.axis(axis) < BOUND_EPS
        };
        let mut flags = QuadFlags::default();
        if partial {
            flags = flags.union(QuadFlags::PARTIAL);
        }
        if parallel {
            flags = flags.union(QuadFlags::PARALLEL);
            if on_boundary {
                flags = flags.union(QuadFlags::ALIGNED);
            }
        }
        flags
    }
}

/// Packs a unit normal as three signed bytes (x low, then y, then z).
#[inline]
pub fn pack_normal(n: Vec3) -> u32 {
    let q = |c: f32| ((c.clamp(-1.0, 1.0) * 127.0) as i8) as u8 as u32;
    q(n.x) | q(n.y) << 8 | q(n.z) << 16
}

/// Inverse of [`pack_normal`], up to quantization.
#[inline]
pub fn unpack_normal(packed: u32) -> Vec3 {
    let c = |shift: u32| ((packed >> shift) & 0xFF) as u8 as i8 as f32 / 127.0;
    Vec3::new(c(0), c(8), c(16))
}

/// Read access to the four vertices of a quad, baked or scratch.
pub trait ModelQuadView {
    fn position(&self, idx: usize) -> Vec3;
    fn color(&self, idx: usize) -> PackedColor;
    fn tex_u(&self, idx: usize) -> f32;
    fn tex_v(&self, idx: usize) -> f32;
    fn light(&self, idx: usize) -> u32;
    fn normal(&self, idx: usize) -> u32;
    fn sprite(&self) -> SpriteId;
    fn flags(&self) -> QuadFlags;
    /// Face used for lighting and shading.
    fn light_face(&self) -> Direction;
    /// Tint slot, negative when the quad is not color-sensitive.
    fn color_index(&self) -> i32;
    fn has_shade(&self) -> bool;

    #[inline]
    fn has_color(&self) -> bool {
        self.color_index() >= 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModelVertex {
    pub pos: Vec3,
    pub color: PackedColor,
    pub u: f32,
    pub v: f32,
    pub light: u32,
    pub normal: u32,
}

/// Immutable quad produced by model baking, stored as packed vertex words.
#[derive(Clone, Debug, PartialEq)]
pub struct BakedQuad {
    vertex_data: Box<[u32]>,
    sprite: SpriteId,
    color_index: i32,
    face: Direction,
    shade: bool,
    flags: QuadFlags,
}

impl BakedQuad {
    pub fn new(
        vertices: &[ModelVertex; 4],
        sprite: SpriteId,
        color_index: i32,
        face: Direction,
        shade: bool,
    ) -> Self {
        let mut data = Vec::with_capacity(4 * VERTEX_STRIDE);
        for v in vertices {
            data.extend_from_slice(&[
                v.pos.x.to_bits(),
                v.pos.y.to_bits(),
                v.pos.z.to_bits(),
                v.color.0,
                v.u.to_bits(),
                v.v.to_bits(),
                v.light,
                v.normal,
            ]);
        }
        let positions = [
            vertices[0].pos,
            vertices[1].pos,
            vertices[2].pos,
            vertices[3].pos,
        ];
        Self {
            vertex_data: data.into_boxed_slice(),
            sprite,
            color_index,
            face,
            shade,
            flags: QuadFlags::compute(&positions, face),
        }
    }

    /// Wraps raw vertex words as-is; no vertex count check is made here.
    pub fn from_raw(
        vertex_data: Box<[u32]>,
        sprite: SpriteId,
        color_index: i32,
        face: Direction,
        shade: bool,
        flags: QuadFlags,
    ) -> Self {
        Self {
            vertex_data,
            sprite,
            color_index,
            face,
            shade,
            flags,
        }
    }

    /// Number of complete vertices in the data.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / VERTEX_STRIDE
    }

    /// Exactly four vertices and no trailing words.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.vertex_data.len() == 4 * VERTEX_STRIDE
    }

    #[inline]
    pub fn vertex_data(&self) -> &[u32] {
        &self.vertex_data
    }

    #[inline]
    fn word(&self, idx: usize, off: usize) -> u32 {
        self.vertex_data
            .get(idx * VERTEX_STRIDE + off)
            .copied()
            .unwrap_or(0)
    }
}

impl ModelQuadView for BakedQuad {
    #[inline]
    fn position(&self, idx: usize) -> Vec3 {
        Vec3::new(
            f32::from_bits(self.word(idx, POSITION)),
            f32::from_bits(self.word(idx, POSITION + 1)),
            f32::from_bits(self.word(idx, POSITION + 2)),
        )
    }

    #[inline]
    fn color(&self, idx: usize) -> PackedColor {
        PackedColor(self.word(idx, COLOR))
    }

    #[inline]
    fn tex_u(&self, idx: usize) -> f32 {
        f32::from_bits(self.word(idx, TEXTURE))
    }

    #[inline]
    fn tex_v(&self, idx: usize) -> f32 {
        f32::from_bits(self.word(idx, TEXTURE + 1))
    }

    #[inline]
    fn light(&self, idx: usize) -> u32 {
        self.word(idx, LIGHT)
    }

    #[inline]
    fn normal(&self, idx: usize) -> u32 {
        self.word(idx, NORMAL)
    }

    fn sprite(&self) -> SpriteId {
        self.sprite
    }

    fn flags(&self) -> QuadFlags {
        self.flags
    }

    fn light_face(&self) -> Direction {
        self.face
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn has_shade(&self) -> bool {
        self.shade
    }
}

/// Mutable scratch quad the renderer fills before handing it to a sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelQuad {
    pub vertices: [ModelVertex; 4],
    pub sprite: SpriteId,
    pub flags: QuadFlags,
    pub face: Direction,
    pub color_index: i32,
    pub shade: bool,
}

impl Default for ModelQuad {
    fn default() -> Self {
        Self {
            vertices: [ModelVertex::default(); 4],
            sprite: SpriteId::MISSING,
            flags: QuadFlags::default(),
            face: Direction::Up,
            color_index: -1,
            shade: true,
        }
    }
}

impl ModelQuadView for ModelQuad {
    #[inline]
    fn position(&self, idx: usize) -> Vec3 {
        self.vertices[idx & 3].pos
    }

    #[inline]
    fn color(&self, idx: usize) -> PackedColor {
        self.vertices[idx & 3].color
    }

    #[inline]
    fn tex_u(&self, idx: usize) -> f32 {
        self.vertices[idx & 3].u
    }

    #[inline]
    fn tex_v(&self, idx: usize) -> f32 {
        self.vertices[idx & 3].v
    }

    #[inline]
    fn light(&self, idx: usize) -> u32 {
        self.vertices[idx & 3].light
    }

    #[inline]
    fn normal(&self, idx: usize) -> u32 {
        self.vertices[idx & 3].normal
    }

    fn sprite(&self) -> SpriteId {
        self.sprite
    }

    fn flags(&self) -> QuadFlags {
        self.flags
    }

    fn light_face(&self) -> Direction {
        self.face
    }

    fn color_index(&self) -> i32 {
        self.color_index
    }

    fn has_shade(&self) -> bool {
        self.shade
    }
}
