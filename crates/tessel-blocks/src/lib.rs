//! Block, sprite, and culling-shape registry crate.
#![forbid(unsafe_code)]

pub mod config;
pub mod offset;
pub mod registry;
pub mod shape;
pub mod sprite;
pub mod types;

pub use offset::OffsetKind;
pub use registry::{BlockRegistry, BlockType};
pub use shape::{CullShape, FaceMask, ShapeId};
pub use sprite::SpriteCatalog;
pub use types::{BlockId, BlockState, Shape, SpriteId, Tint, TintKind};
