//! Block models: quads, packed colors, output facings, and model baking.
#![forbid(unsafe_code)]

pub mod bake;
pub mod color;
mod facing;
pub mod model;
mod orientation;
pub mod quad;
mod random;

pub use bake::bake_models;
pub use color::PackedColor;
pub use facing::ModelQuadFacing;
pub use model::{BakedModel, BlockModels, SimpleModel, WeightedModel};
pub use orientation::ModelQuadOrientation;
pub use quad::{BakedQuad, ModelQuad, ModelQuadView, ModelVertex, QuadFlags, VERTEX_STRIDE};
pub use random::SeededRandom;
