use tessel_blocks::SpriteId;
use tessel_model::quad::unpack_normal;
use tessel_model::{ModelQuad, ModelQuadView};

use crate::sink::QuadWriter;

/// Flat vertex streams for one output bucket.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
    pub light: Vec<u32>,
    /// Sprite of each quad, in emission order.
    pub sprites: Vec<SpriteId>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across batches.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
        self.light.clear();
        self.sprites.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Appends a quad as two triangles, keeping its vertex order.
    pub fn add_quad(&mut self, quad: &ModelQuad) {
        let base = self.vertex_count() as u32;
        for i in 0..4 {
            let p = quad.position(i);
            let n = unpack_normal(quad.normal(i));
            self.pos.extend_from_slice(&[p.x, p.y, p.z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[quad.tex_u(i), quad.tex_v(i)]);
            self.col.extend_from_slice(&quad.color(i).to_rgba());
            self.light.push(quad.light(i));
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        self.sprites.push(quad.sprite);
    }
}

impl QuadWriter for MeshBuild {
    #[inline]
    fn write(&mut self, quad: &ModelQuad) {
        self.add_quad(quad);
    }
}
