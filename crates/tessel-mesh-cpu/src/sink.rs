use tessel_model::{ModelQuad, ModelQuadFacing};

use crate::mesh_build::MeshBuild;

/// Append-only destination for finished quads.
pub trait QuadWriter {
    fn write(&mut self, quad: &ModelQuad);
}

/// Routes quads to one writer per facing.
pub trait QuadSink {
    fn writer(&mut self, facing: ModelQuadFacing) -> &mut dyn QuadWriter;
}

/// One [`MeshBuild`] per facing, indexed by [`ModelQuadFacing::index`].
#[derive(Clone, Debug, Default)]
pub struct FacingBuckets {
    buckets: [MeshBuild; ModelQuadFacing::COUNT],
}

impl FacingBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, facing: ModelQuadFacing) -> &MeshBuild {
        &self.buckets[facing.index()]
    }

    pub fn quad_count(&self) -> usize {
        self.buckets.iter().map(MeshBuild::quad_count).sum()
    }

    pub fn clear_keep_capacity(&mut self) {
        for b in &mut self.buckets {
            b.clear_keep_capacity();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelQuadFacing, &MeshBuild)> {
        ModelQuadFacing::ALL.into_iter().zip(self.buckets.iter())
    }
}

impl QuadSink for FacingBuckets {
    #[inline]
    fn writer(&mut self, facing: ModelQuadFacing) -> &mut dyn QuadWriter {
        &mut self.buckets[facing.index()]
    }
}
