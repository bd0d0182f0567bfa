//! CPU block meshing: per-block quad emission with culling, lighting, and tinting.
#![forbid(unsafe_code)]

mod blender;
mod build;
mod error;
mod mesh_build;
mod occlusion;
mod renderer;
mod settings;
mod sink;

pub use blender::BiomeColorBlender;
pub use build::{SliceStats, block_seed, build_blocks, build_slice};
pub use error::RenderError;
pub use mesh_build::MeshBuild;
pub use occlusion::BlockOcclusionCache;
pub use renderer::BlockRenderer;
pub use settings::RenderSettings;
pub use sink::{FacingBuckets, QuadSink, QuadWriter};
