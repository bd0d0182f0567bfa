use serde::Deserialize;
use tessel_geom::{BlockPos, Vec3};

/// State-independent positional jitter applied to a block's model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetKind {
    #[default]
    None,
    Xz,
    Xyz,
}

impl OffsetKind {
    /// Offset for a block at `pos`. Horizontal jitter spans ±0.25, vertical `-0.2..=0`.
    pub fn model_offset(self, pos: BlockPos) -> Vec3 {
        if self == OffsetKind::None {
            return Vec3::ZERO;
        }
        let h = position_hash(pos.x, 0, pos.z);
        let x = (((h & 15) as f32) / 15.0 - 0.5) * 0.5;
        let z = ((((h >> 8) & 15) as f32) / 15.0 - 0.5) * 0.5;
        let y = match self {
            OffsetKind::Xyz => ((((h >> 4) & 15) as f32) / 15.0 - 1.0) * 0.2,
            _ => 0.0,
        };
        Vec3::new(x, y, z)
    }
}

/// Deterministic 64-bit hash of a block coordinate.
#[inline]
pub fn position_hash(x: i32, y: i32, z: i32) -> i64 {
    let mut l = (x.wrapping_mul(3_129_871) as i64) ^ (z as i64).wrapping_mul(116_129_781) ^ (y as i64);
    l = l
        .wrapping_mul(l)
        .wrapping_mul(42_317_861)
        .wrapping_add(l.wrapping_mul(11));
    l >> 16
}
