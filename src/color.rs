// MIT/Apache2 License

use crate::intensity::Intensity;

/// A four-element color, packed as `0xAARRGGBB`.
///
/// This is the same layout the pixels of a [`PixelSurface`] use, so a `Color` can be converted to and from a
/// raw pixel value without any loss.
///
/// [`PixelSurface`]: crate::PixelSurface
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Color {
    argb: u32,
}

impl Color {
    pub const WHITE: Color = Color::from_argb(0xFF_FF_FF_FF);
    pub const BLACK: Color = Color::from_argb(0xFF_00_00_00);
    pub const TRANSPARENT: Color = Color::from_argb(0);

    /// Create a color from a packed `0xAARRGGBB` value.
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self { argb }
    }

    /// Create a color from a packed pixel value.
    ///
    /// If `has_alpha` is false, the top byte of `packed` is ignored and the color is fully opaque.
    #[inline]
    pub const fn from_packed(packed: u32, has_alpha: bool) -> Self {
        if has_alpha {
            Self::from_argb(packed)
        } else {
            Self::from_argb(packed | 0xFF_00_00_00)
        }
    }

    /// Create a color from 8-bit channels.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_argb(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Creates a new color from float channels. This function returns `None` if any of the elements are NaN or
    /// lie outside of [0, 1].
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Option<Self> {
        Some(Self::from_intensities(
            Intensity::new(r)?,
            Intensity::new(g)?,
            Intensity::new(b)?,
            Intensity::new(a)?,
        ))
    }

    /// Create a color from four intensities.
    #[inline]
    pub fn from_intensities(r: Intensity, g: Intensity, b: Intensity, a: Intensity) -> Self {
        Self::from_rgba8(
            r.clamp_to_u8(),
            g.clamp_to_u8(),
            b.clamp_to_u8(),
            a.clamp_to_u8(),
        )
    }

    /// Get the packed `0xAARRGGBB` value.
    #[inline]
    pub const fn argb(self) -> u32 {
        self.argb
    }

    /// Gets the red element.
    #[inline]
    pub fn red(self) -> f32 {
        Intensity::from_u8(self.rgba8().0).into_inner()
    }

    /// Gets the green element.
    #[inline]
    pub fn green(self) -> f32 {
        Intensity::from_u8(self.rgba8().1).into_inner()
    }

    /// Gets the blue element.
    #[inline]
    pub fn blue(self) -> f32 {
        Intensity::from_u8(self.rgba8().2).into_inner()
    }

    /// Gets the alpha element.
    #[inline]
    pub fn alpha(self) -> f32 {
        Intensity::from_u8(self.rgba8().3).into_inner()
    }

    /// Split into 8-bit channels, in `(r, g, b, a)` order.
    #[inline]
    pub const fn rgba8(self) -> (u8, u8, u8, u8) {
        let [a, r, g, b] = self.argb.to_be_bytes();
        (r, g, b, a)
    }
}

impl From<Color> for u32 {
    #[inline]
    fn from(c: Color) -> u32 {
        c.argb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_packing() {
        let c = Color::from_rgba8(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.argb(), 0x78_12_34_56);
        assert_eq!(c.rgba8(), (0x12, 0x34, 0x56, 0x78));

        // without alpha, the top byte is forced opaque
        assert_eq!(Color::from_packed(0x00_11_22_33, false).argb(), 0xFF_11_22_33);
        assert_eq!(Color::from_packed(0x00_11_22_33, true).argb(), 0x00_11_22_33);
    }

    #[test]
    fn test_float_channels() {
        let c = Color::new(1.0, 0.0, 0.5, 1.0).unwrap();
        assert_eq!(c.rgba8(), (255, 0, 128, 255));
        assert_relative_eq!(c.red(), 1.0);
        assert_relative_eq!(c.blue(), 128.0 / 255.0);
        assert!(Color::new(1.5, 0.0, 0.0, 0.0).is_none());
    }
}
