use tessel_blocks::BlockState;
use tessel_geom::BlockPos;
use tessel_model::{ModelQuadView, PackedColor};
use tessel_world::{BlockColorProvider, BlockRenderView};

/// Produces one tint color per source vertex of a color-sensitive quad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BiomeColorBlender {
    /// One sample at the block position for all four vertices.
    #[default]
    Flat,
    /// Bilinear blend between the four block columns around each vertex.
    Smooth,
}

impl BiomeColorBlender {
    /// Flat for radius 0, smooth otherwise.
    pub fn for_radius(radius: i32) -> Self {
        if radius > 0 {
            BiomeColorBlender::Smooth
        } else {
            BiomeColorBlender::Flat
        }
    }

    /// Colors indexed by source vertex, before any orientation reorder.
    pub fn get_colors<Q: ModelQuadView + ?Sized>(
        &self,
        provider: &dyn BlockColorProvider,
        world: &dyn BlockRenderView,
        state: BlockState,
        pos: BlockPos,
        quad: &Q,
    ) -> [PackedColor; 4] {
        match self {
            BiomeColorBlender::Flat => {
                let c = PackedColor::from_rgb(provider.color(world, state, pos, quad.color_index()));
                [c; 4]
            }
            BiomeColorBlender::Smooth => {
                let mut out = [PackedColor::WHITE; 4];
                for (i, c) in out.iter_mut().enumerate() {
                    *c = vertex_color(provider, world, state, pos, quad, i);
                }
                out
            }
        }
    }
}

fn column_color<Q: ModelQuadView + ?Sized>(
    provider: &dyn BlockColorProvider,
    world: &dyn BlockRenderView,
    state: BlockState,
    quad: &Q,
    x: i32,
    y: i32,
    z: i32,
) -> PackedColor {
    PackedColor::from_rgb(provider.color(world, state, BlockPos::new(x, y, z), quad.color_index()))
}

fn vertex_color<Q: ModelQuadView + ?Sized>(
    provider: &dyn BlockColorProvider,
    world: &dyn BlockRenderView,
    state: BlockState,
    origin: BlockPos,
    quad: &Q,
    idx: usize,
) -> PackedColor {
    let p = quad.position(idx);
    let x = origin.x as f32 + p.x;
    let z = origin.z as f32 + p.z;
    let (ix, iz) = (x.floor() as i32, z.floor() as i32);
    let (fx, fz) = (x - ix as f32, z - iz as f32);

    let c1 = column_color(provider, world, state, quad, ix, origin.y, iz);
    let c2 = column_color(provider, world, state, quad, ix, origin.y, iz + 1);
    let c3 = column_color(provider, world, state, quad, ix + 1, origin.y, iz);
    let c4 = column_color(provider, world, state, quad, ix + 1, origin.y, iz + 1);
    if c1 == c2 && c2 == c3 && c3 == c4 {
        return c1;
    }

    let lerp = |a: u8, b: u8, t: f32| a as f32 + (b as f32 - a as f32) * t;
    let channel = |f: fn(PackedColor) -> u8| {
        let near = lerp(f(c1), f(c2), fz);
        let far = lerp(f(c3), f(c4), fz);
        (near + (far - near) * fx).clamp(0.0, 255.0) as u8
    };
    PackedColor::pack(
        channel(PackedColor::red),
        channel(PackedColor::green),
        channel(PackedColor::blue),
        0xFF,
    )
}
