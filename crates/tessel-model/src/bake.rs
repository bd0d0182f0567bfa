use tessel_blocks::shape::slab_box;
use tessel_blocks::sprite::AtlasRect;
use tessel_blocks::{BlockRegistry, BlockState, BlockType, Shape, SpriteId};
use tessel_blocks::registry::FaceSprites;
use tessel_geom::{Aabb, Direction, Vec3};

use crate::color::PackedColor;
use crate::model::{BakedModel, BlockModels, SimpleModel, WeightedModel};
use crate::quad::{BakedQuad, ModelVertex, pack_normal};

// Corner selectors per face, wound counter-clockwise seen from outside. Each entry picks
// min (false) or max (true) of the box along x, y, z.
const FACE_CORNERS: [[[bool; 3]; 4]; 6] = [
    // Down
    [
        [false, false, true],
        [false, false, false],
        [true, false, false],
        [true, false, true],
    ],
    // Up
    [
        [false, true, false],
        [false, true, true],
        [true, true, true],
        [true, true, false],
    ],
    // North
    [
        [true, true, false],
        [true, false, false],
        [false, false, false],
        [false, true, false],
    ],
    // South
    [
        [false, true, true],
        [false, false, true],
        [true, false, true],
        [true, true, true],
    ],
    // West
    [
        [false, true, false],
        [false, false, false],
        [false, false, true],
        [false, true, true],
    ],
    // East
    [
        [true, true, true],
        [true, false, true],
        [true, false, false],
        [true, true, false],
    ],
];

// Cross planes sit slightly inside the block so they never touch a neighbor.
const CROSS_LO: f32 = 0.15;
const CROSS_HI: f32 = 0.85;

/// Sprite-local texture coordinates of a point on `face`, derived from its position.
#[inline]
pub fn face_uv(face: Direction, p: Vec3) -> (f32, f32) {
    match face {
        Direction::Down => (p.x, 1.0 - p.z),
        Direction::Up => (p.x, p.z),
        Direction::North => (1.0 - p.x, 1.0 - p.y),
        Direction::South => (p.x, 1.0 - p.y),
        Direction::West => (p.z, 1.0 - p.y),
        Direction::East => (1.0 - p.z, 1.0 - p.y),
    }
}

fn vertex(pos: Vec3, uv: (f32, f32), rect: &AtlasRect, normal: u32) -> ModelVertex {
    let (u, v) = rect.map(uv.0, uv.1);
    ModelVertex {
        pos,
        color: PackedColor::WHITE,
        u,
        v,
        light: 0,
        normal,
    }
}

/// One face of `bx` as a quad, textured from `sprite`.
pub fn box_face(
    bx: &Aabb,
    face: Direction,
    sprite: SpriteId,
    rect: &AtlasRect,
    color_index: i32,
) -> BakedQuad {
    let normal = pack_normal(face.normal());
    let corners = &FACE_CORNERS[face.index()];
    let mut vs = [ModelVertex::default(); 4];
    for (v, sel) in vs.iter_mut().zip(corners.iter()) {
        let p = Vec3::new(
            if sel[0] { bx.max.x } else { bx.min.x },
            if sel[1] { bx.max.y } else { bx.min.y },
            if sel[2] { bx.max.z } else { bx.min.z },
        );
        *v = vertex(p, face_uv(face, p), rect, normal);
    }
    BakedQuad::new(&vs, sprite, color_index, face, true)
}

/// Cull face of a box face: the face's own direction when it lies on the block boundary.
fn cull_face_of(bx: &Aabb, face: Direction) -> Option<Direction> {
    let axis = face.axis();
    let on_boundary = if face.is_positive() {
        bx.max.axis(axis) >= 1.0
    } else {
        bx.min.axis(axis) <= 0.0
    };
    on_boundary.then_some(face)
}

fn bake_box(model: &mut SimpleModel, reg: &BlockRegistry, bx: &Aabb, sprites: &FaceSprites, color_index: i32) {
    for face in Direction::ALL {
        let sprite = sprites.for_face(face);
        let rect = reg.sprites.rect(sprite);
        let quad = box_face(bx, face, sprite, &rect, color_index);
        model.push(cull_face_of(bx, face), quad);
    }
}

fn bake_cross(model: &mut SimpleModel, reg: &BlockRegistry, sprite: SpriteId, color_index: i32) {
    let rect = reg.sprites.rect(sprite);
    let planes = [
        (Vec3::new(CROSS_LO, 0.0, CROSS_LO), Vec3::new(CROSS_HI, 1.0, CROSS_HI)),
        (Vec3::new(CROSS_LO, 0.0, CROSS_HI), Vec3::new(CROSS_HI, 1.0, CROSS_LO)),
    ];
    for (a, b) in planes {
        let corners = [
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ];
        let uvs = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let n = (corners[1] - corners[0]).cross(corners[2] - corners[0]).normalized();
        // Front side, then the same plane wound the other way.
        for (order, normal) in [([0usize, 1, 2, 3], n), ([3, 2, 1, 0], n * -1.0)] {
            let packed = pack_normal(normal);
            let mut vs = [ModelVertex::default(); 4];
            for (v, &i) in vs.iter_mut().zip(order.iter()) {
                *v = vertex(corners[i], uvs[i], &rect, packed);
            }
            let face = Direction::from_normal(normal);
            model.push(None, BakedQuad::new(&vs, sprite, color_index, face, true));
        }
    }
}

fn bake_variant(reg: &BlockRegistry, ty: &BlockType, state: BlockState, sprites: &FaceSprites) -> SimpleModel {
    let mut model = SimpleModel::new(ty.ambient_occlusion);
    let color_index = if ty.tint.is_some() { 0 } else { -1 };
    match ty.shape {
        Shape::Cube => bake_box(&mut model, reg, &Aabb::UNIT, sprites, color_index),
        Shape::Slab => bake_box(&mut model, reg, &slab_box(ty.is_top_half(state)), sprites, color_index),
        Shape::Cross => bake_cross(&mut model, reg, sprites.side, color_index),
        Shape::None => {}
    }
    model
}

fn bake_state(reg: &BlockRegistry, ty: &BlockType, state: BlockState) -> Box<dyn BakedModel> {
    if !ty.variants.is_empty() {
        let entries = ty
            .variants
            .iter()
            .map(|(sprite, w)| (*w, bake_variant(reg, ty, state, &FaceSprites::uniform(*sprite))))
            .collect();
        if let Some(weighted) = WeightedModel::new(entries) {
            return Box::new(weighted);
        }
        log::warn!(target: "blocks", "block '{}' has only zero-weight variants", ty.name);
    }
    Box::new(bake_variant(reg, ty, state, &ty.sprites))
}

/// Bakes a model for every drawable block state in the registry.
pub fn bake_models(reg: &BlockRegistry) -> BlockModels {
    let mut models = BlockModels::new();
    for ty in &reg.blocks {
        if ty.shape == Shape::None {
            continue;
        }
        let variants = if ty.shape == Shape::Slab { 2 } else { 1 };
        let baked = (0..variants)
            .map(|v| bake_state(reg, ty, BlockState::new(ty.id, v)))
            .collect();
        models.insert(ty.id, baked);
    }
    log::debug!(target: "blocks", "baked {} block models", models.len());
    models
}
