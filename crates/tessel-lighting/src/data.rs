use tessel_geom::Direction;

/// Per-corner lighting of one quad, indexed by source vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuadLightData {
    /// Brightness in `[0, 1]`.
    pub br: [f32; 4],
    /// Packed light map coordinates.
    pub lm: [u32; 4],
}

/// Packs light levels (`0..=15`) as light map coordinates: block in bits 4..8, sky in 20..24.
#[inline]
pub const fn pack_light(block: u8, sky: u8) -> u32 {
    ((block as u32 & 0xF) << 4) | ((sky as u32 & 0xF) << 20)
}

/// Block channel of packed coordinates, `0..=240`.
#[inline]
pub const fn block_coord(lm: u32) -> u32 {
    lm & 0xFF
}

/// Sky channel of packed coordinates, `0..=240`.
#[inline]
pub const fn sky_coord(lm: u32) -> u32 {
    (lm >> 16) & 0xFF
}

/// Packs blended channel coordinates back into one word.
#[inline]
pub fn pack_coords(block: f32, sky: f32) -> u32 {
    ((sky as u32 & 0xFF) << 16) | (block as u32 & 0xFF)
}

/// Directional shade applied to quads that opt into shading.
#[inline]
pub fn diffuse(face: Direction, shade: bool) -> f32 {
    if !shade {
        return 1.0;
    }
    match face {
        Direction::Down => 0.5,
        Direction::Up => 1.0,
        Direction::North | Direction::South => 0.8,
        Direction::West | Direction::East => 0.6,
    }
}
