// MIT/Apache2 License

//! Client-side pixel storage.

use crate::{Canvas, Color, Error, PixelFormat};
use image::GenericImageView;
use std::{convert::TryFrom, path::Path};

/// A rectangular buffer of packed color values, living in client memory.
///
/// Pixels are stored row-major as `u32`s, so the pixel at `(x, y)` is found at index `x + y * width`. The
/// values are stored exactly as they are written; the [`PixelFormat`] only describes how a [`Toolkit`] should
/// interpret them when the surface is uploaded to the device.
///
/// The buffer never changes length after creation. Once [`destroy`] has been called it is gone, and every
/// further pixel access is an error.
///
/// [`Toolkit`]: crate::Toolkit
/// [`destroy`]: PixelSurface::destroy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    format: PixelFormat,
    // invariant: Some(buf) implies buf.len() == width * height
    pixels: Option<Vec<u32>>,
}

#[inline]
fn pixel_count(width: u32, height: u32) -> crate::Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .ok_or(Error::InvalidDimensions { width, height })
}

impl PixelSurface {
    /// Create a new surface with every pixel set to zero.
    #[inline]
    pub fn new(width: u32, height: u32, has_alpha: bool) -> crate::Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            format: PixelFormat::with_alpha(has_alpha),
            pixels: Some(vec![0; len]),
        })
    }

    /// Adopt an existing row-major pixel buffer.
    #[inline]
    pub fn from_pixels(
        width: u32,
        height: u32,
        has_alpha: bool,
        pixels: Vec<u32>,
    ) -> crate::Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format: PixelFormat::with_alpha(has_alpha),
            pixels: Some(pixels),
        })
    }

    /// Decode an image file into a new surface.
    ///
    /// The dimensions come from the decoded image. The surface has an alpha channel if the file's color type
    /// does.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let (width, height) = decoded.dimensions();
        let has_alpha = decoded.color().has_alpha();
        let pixels = decoded
            .into_rgba8()
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Color::from_rgba8(r, g, b, a).argb()
            })
            .collect();

        log::debug!(
            "Decoded {} as a {}x{} surface (alpha: {})",
            path.display(),
            width,
            height,
            has_alpha
        );

        Self::from_pixels(width, height, has_alpha, pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    #[inline]
    fn checked_index(&self, x: u32, y: u32) -> crate::Result<usize> {
        if self.pixels.is_none() {
            Err(Error::Destroyed)
        } else if x >= self.width || y >= self.height {
            Err(Error::OutOfBounds { x, y })
        } else {
            Ok(self.index(x, y))
        }
    }

    /// Set the pixel at `(x, y)` to `color`.
    ///
    /// # Panics
    ///
    /// The caller is responsible for keeping `(x, y)` inside the surface. This function panics if the
    /// computed index falls outside of the buffer, or if the surface has been destroyed. Note that an `x`
    /// past the right edge wraps onto the next row rather than panicking; use [`try_set_pixel`] for a checked
    /// variant.
    ///
    /// [`try_set_pixel`]: PixelSurface::try_set_pixel
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        let i = self.index(x, y);
        self.buffer_mut()[i] = color;
    }

    /// Get the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`set_pixel`].
    ///
    /// [`set_pixel`]: PixelSurface::set_pixel
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.buffer()[self.index(x, y)]
    }

    /// Set the pixel at `(x, y)`, checking the bounds and the surface's liveness first.
    #[inline]
    pub fn try_set_pixel(&mut self, x: u32, y: u32, color: u32) -> crate::Result {
        let i = self.checked_index(x, y)?;
        match self.pixels {
            Some(ref mut pixels) => pixels[i] = color,
            None => return Err(Error::Destroyed),
        }
        Ok(())
    }

    /// Get the pixel at `(x, y)`, checking the bounds and the surface's liveness first.
    #[inline]
    pub fn try_pixel(&self, x: u32, y: u32) -> crate::Result<u32> {
        let i = self.checked_index(x, y)?;
        self.pixels
            .as_ref()
            .map(|pixels| pixels[i])
            .ok_or(Error::Destroyed)
    }

    /// Set every pixel in the surface to `color`.
    ///
    /// # Panics
    ///
    /// Panics if the surface has been destroyed.
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer_mut().iter_mut().for_each(|p| *p = color);
    }

    /// The width of the surface, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the surface, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether or not this surface has an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.format.is_transparent()
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Borrow the pixel buffer, or `None` if the surface has been destroyed.
    #[inline]
    pub fn pixels(&self) -> Option<&[u32]> {
        self.pixels.as_deref()
    }

    /// Mutably borrow the pixel buffer for bulk operations, or `None` if the surface has been destroyed.
    ///
    /// The slice cannot be resized, so the length invariant holds.
    #[inline]
    pub fn pixels_mut(&mut self) -> Option<&mut [u32]> {
        self.pixels.as_deref_mut()
    }

    /// Get a drawing context over this surface's pixels.
    ///
    /// Returns [`Error::Destroyed`] if the surface has been destroyed.
    #[inline]
    pub fn canvas(&mut self) -> crate::Result<Canvas<'_>> {
        let (width, height) = (self.width, self.height);
        self.pixels
            .as_deref_mut()
            .map(|pixels| Canvas::new(pixels, width, height))
            .ok_or(Error::Destroyed)
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.pixels.is_none()
    }

    /// Release the pixel buffer.
    ///
    /// After this, `pixels()` returns `None`, the checked accessors return [`Error::Destroyed`], and the
    /// unchecked accessors panic. Destroying an already destroyed surface does nothing.
    #[inline]
    pub fn destroy(&mut self) {
        if self.pixels.take().is_some() {
            log::trace!("Released {}x{} pixel buffer", self.width, self.height);
        }
    }

    #[inline]
    fn buffer(&self) -> &[u32] {
        self.pixels.as_deref().expect("pixel surface used after destroy()")
    }

    #[inline]
    fn buffer_mut(&mut self) -> &mut [u32] {
        self.pixels
            .as_deref_mut()
            .expect("pixel surface used after destroy()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        for &(w, h) in &[(1, 1), (3, 3), (7, 2), (640, 480)] {
            let s = PixelSurface::new(w, h, false).unwrap();
            assert_eq!(s.dimensions(), (w, h));
            assert_eq!(s.pixels().unwrap().len(), (w * h) as usize);
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            PixelSurface::new(0, 5, true),
            Err(Error::InvalidDimensions {
                width: 0,
                height: 5
            })
        ));
        assert!(matches!(
            PixelSurface::new(5, 0, true),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PixelSurface::from_pixels(2, 2, false, vec![0; 3]),
            Err(Error::BufferLength {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_pixel_round_trip() {
        let colors = [0, 1, 0x00_FF_00_00, 0x7F_12_34_56, 0xFF_FF_FF_FF, u32::MAX - 1];

        for &alpha in &[false, true] {
            let mut s = PixelSurface::new(4, 3, alpha).unwrap();
            assert_eq!(s.has_alpha(), alpha);

            for (i, &c) in colors.iter().enumerate() {
                let (x, y) = (i as u32 % 4, i as u32 / 4);
                s.set_pixel(x, y, c);
                assert_eq!(s.pixel(x, y), c);
            }

            // row-major layout
            s.set_pixel(1, 2, 0xABCDEF);
            assert_eq!(s.pixels().unwrap()[1 + 2 * 4], 0xABCDEF);
        }
    }

    #[test]
    fn test_clear() {
        for &(w, h) in &[(3, 3), (1, 1)] {
            let mut s = PixelSurface::new(w, h, true).unwrap();
            s.set_pixel(0, 0, 12);
            s.clear(0xDEAD_BEEF);

            for y in 0..h {
                for x in 0..w {
                    assert_eq!(s.pixel(x, y), 0xDEAD_BEEF);
                }
            }
        }
    }

    #[test]
    fn test_checked_access() {
        let mut s = PixelSurface::new(2, 2, false).unwrap();
        assert!(matches!(
            s.try_set_pixel(2, 0, 1),
            Err(Error::OutOfBounds { x: 2, y: 0 })
        ));
        s.try_set_pixel(1, 1, 9).unwrap();
        assert_eq!(s.try_pixel(1, 1).unwrap(), 9);
    }

    #[test]
    fn test_destroy() {
        let mut s = PixelSurface::new(2, 2, false).unwrap();
        s.destroy();
        assert!(s.is_destroyed());
        assert!(s.pixels().is_none());
        assert!(matches!(s.try_pixel(0, 0), Err(Error::Destroyed)));
        assert!(matches!(s.try_set_pixel(0, 0, 1), Err(Error::Destroyed)));
        assert!(matches!(s.canvas(), Err(Error::Destroyed)));
    }

    #[test]
    #[should_panic]
    fn test_unchecked_after_destroy() {
        let mut s = PixelSurface::new(2, 2, false).unwrap();
        s.destroy();
        let _ = s.pixel(0, 0);
    }

    #[test]
    fn test_missing_file() {
        let err = PixelSurface::load_from_file("/nonexistent/slate/image.png").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
