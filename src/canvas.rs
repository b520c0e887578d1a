// MIT/Apache2 License

use crate::{
    raster::{self, Target, Tessellation},
    Color, Error, PixelSurface, Shape, ShapeStyle,
};
use std::fmt;

/// A drawing context over the pixels of a [`PixelSurface`].
///
/// Obtained through [`PixelSurface::canvas`]. The canvas keeps its own drawing color and line width, much
/// like a toolkit's drawing context does, and writes straight into the surface's buffer. Drawing is a lot
/// slower than setting pixels by hand, but saves rasterizing shapes yourself.
pub struct Canvas<'a> {
    target: Target<'a>,
    color: Color,
    line_width: f32,
    tessellation: Tessellation,
}

impl<'a> fmt::Debug for Canvas<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.target.width)
            .field("height", &self.target.height)
            .field("color", &self.color)
            .field("line_width", &self.line_width)
            .finish()
    }
}

impl<'a> Canvas<'a> {
    #[inline]
    pub(crate) fn new(pixels: &'a mut [u32], width: u32, height: u32) -> Self {
        Self {
            target: Target {
                pixels,
                width,
                height,
            },
            color: Color::BLACK,
            line_width: 1.0,
            tessellation: Tessellation::default(),
        }
    }

    /// Set the color used for subsequent drawing. Defaults to black.
    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the width of outlines. Defaults to one pixel.
    #[inline]
    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width;
    }

    /// Draw a shape in the current color.
    ///
    /// A pixel is drawn if its center lies inside the shape. Pixels are overwritten with the packed color;
    /// no blending takes place.
    #[inline]
    pub fn draw_shape(&mut self, shape: &Shape, style: ShapeStyle) -> crate::Result {
        self.tessellation.draw_shape(
            &mut self.target,
            shape,
            style,
            self.line_width,
            self.color.argb(),
        )
    }

    /// Copy another surface onto this one, with its origin at `(x, y)`. Parts falling outside are clipped.
    #[inline]
    pub fn draw_surface(&mut self, source: &PixelSurface, x: i32, y: i32) -> crate::Result {
        let pixels = source.pixels().ok_or(Error::Destroyed)?;
        let (width, height) = source.dimensions();
        raster::copy_clipped(
            &mut self.target,
            pixels,
            width,
            height,
            i64::from(x),
            i64::from(y),
        );
        Ok(())
    }
}
