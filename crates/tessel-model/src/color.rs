//! Packed 32-bit colors.
//!
//! [`PackedColor`] stores channels as ABGR: red in the low byte, then green, blue, and
//! alpha in the high byte. Biome and tint providers speak `0xRRGGBB` (ARGB without alpha)
//! and are converted on entry with [`PackedColor::from_rgb`].

/// Normalizes an 8-bit channel to `[0, 1]`.
#[inline]
pub fn normalize(v: u8) -> f32 {
    v as f32 / 255.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor(0xFFFF_FFFF);
    pub const BLACK: PackedColor = PackedColor(0xFF00_0000);

    #[inline]
    pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32)
    }

    /// Converts `0xRRGGBB` to an opaque packed color.
    #[inline]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self::pack(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
            0xFF,
        )
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Scales RGB by `factor`, keeping alpha. Channels round down.
    #[inline]
    pub fn mul(self, factor: f32) -> Self {
        self.mul_rgb(factor, factor, factor)
    }

    /// Scales each RGB channel by its own factor, keeping alpha. Factors clamp to `[0, 1]`
    /// and channels round down.
    #[inline]
    pub fn mul_rgb(self, r: f32, g: f32, b: f32) -> Self {
        Self::pack(
            scale(self.red(), r),
            scale(self.green(), g),
            scale(self.blue(), b),
            self.alpha(),
        )
    }
}

#[inline]
fn scale(c: u8, f: f32) -> u8 {
    let f = if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) };
    (c as f32 * f).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_order_is_abgr() {
        let c = PackedColor::pack(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.0, 0x4433_2211);
        assert_eq!(c.to_rgba(), [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn rgb_conversion_swaps_red_and_blue() {
        let c = PackedColor::from_rgb(0x00AA_BBCC);
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0xAA, 0xBB, 0xCC, 0xFF));
    }

    #[test]
    fn white_at_half_brightness_is_127() {
        let c = PackedColor::WHITE.mul(0.5);
        assert_eq!(c.to_rgba(), [127, 127, 127, 255]);
    }

    #[test]
    fn red_tint_zeroes_green_and_blue() {
        let tint = PackedColor::from_rgb(0xFF0000);
        let c = PackedColor::WHITE.mul_rgb(
            normalize(tint.red()),
            normalize(tint.green()),
            normalize(tint.blue()),
        );
        assert_eq!(c.to_rgba(), [255, 0, 0, 255]);
    }

    #[test]
    fn factors_clamp() {
        let c = PackedColor::pack(200, 100, 50, 7);
        assert_eq!(c.mul(2.0), c);
        assert_eq!(c.mul(-1.0), PackedColor::pack(0, 0, 0, 7));
        assert_eq!(c.mul(f32::NAN), PackedColor::pack(0, 0, 0, 7));
    }
}
