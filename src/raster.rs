// MIT/Apache2 License

//! Software rasterization into packed pixel buffers.
//!
//! Shapes are turned into paths, tessellated into triangles with `lyon_tessellation`, and the triangles are
//! then filled by sampling pixel centers. Drawn pixels are overwritten, not blended.

use crate::{Error, Shape, ShapeStyle};
use lyon_geom::Point;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, StrokeOptions,
    StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};
use std::fmt;

/// A mutable view of a row-major pixel buffer.
#[derive(Debug)]
pub(crate) struct Target<'a> {
    pub(crate) pixels: &'a mut [u32],
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Triangle {
    p1: Point<f32>,
    p2: Point<f32>,
    p3: Point<f32>,
}

struct PositionCvt;

impl FillVertexConstructor<Point<f32>> for PositionCvt {
    #[inline]
    fn new_vertex(&mut self, vert: FillVertex) -> Point<f32> {
        vert.position()
    }
}

impl StrokeVertexConstructor<Point<f32>> for PositionCvt {
    #[inline]
    fn new_vertex(&mut self, vert: StrokeVertex) -> Point<f32> {
        vert.position()
    }
}

/// Cached tessellators and vertex buffers.
pub(crate) struct Tessellation {
    buffers: VertexBuffers<Point<f32>, u32>,
    fill: FillTessellator,
    stroke: StrokeTessellator,
}

impl fmt::Debug for Tessellation {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Tessellation { .. }")
    }
}

impl Default for Tessellation {
    #[inline]
    fn default() -> Self {
        Self {
            buffers: VertexBuffers::new(),
            fill: FillTessellator::new(),
            stroke: StrokeTessellator::new(),
        }
    }
}

impl Tessellation {
    /// Tessellate a shape into triangles.
    ///
    /// Lines have no area, so they are always stroked regardless of `style`.
    fn triangles(
        &mut self,
        shape: &Shape,
        style: ShapeStyle,
        line_width: f32,
    ) -> crate::Result<Vec<Triangle>> {
        self.buffers.vertices.clear();
        self.buffers.indices.clear();

        let path = shape.to_path();
        let style = match shape {
            Shape::Line(_) => ShapeStyle::Outline,
            _ => style,
        };

        let result = {
            let mut builder = BuffersBuilder::new(&mut self.buffers, PositionCvt);
            match style {
                ShapeStyle::Fill => {
                    self.fill
                        .tessellate(path.iter(), &FillOptions::default(), &mut builder)
                }
                ShapeStyle::Outline => self.stroke.tessellate(
                    path.iter(),
                    &StrokeOptions::default().with_line_width(line_width),
                    &mut builder,
                ),
            }
        };
        result.map_err(|e| Error::Tessellation(format!("{:?}", e)))?;

        let vertices = &self.buffers.vertices;
        Ok(self
            .buffers
            .indices
            .chunks_exact(3)
            .map(|chunk| Triangle {
                p1: vertices[chunk[0] as usize],
                p2: vertices[chunk[1] as usize],
                p3: vertices[chunk[2] as usize],
            })
            .collect())
    }

    /// Draw a shape onto `target` in a solid color.
    pub(crate) fn draw_shape(
        &mut self,
        target: &mut Target<'_>,
        shape: &Shape,
        style: ShapeStyle,
        line_width: f32,
        color: u32,
    ) -> crate::Result {
        let triangles = self.triangles(shape, style, line_width)?;
        log::trace!(
            "Rasterizing {} triangles onto a {}x{} buffer",
            triangles.len(),
            target.width,
            target.height
        );
        triangles
            .iter()
            .for_each(|t| fill_triangle(target, t, color));
        Ok(())
    }
}

#[inline]
fn edge(a: Point<f32>, b: Point<f32>, p: Point<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Fill every pixel whose center lies inside the triangle, edges included.
fn fill_triangle(target: &mut Target<'_>, t: &Triangle, color: u32) {
    if edge(t.p1, t.p2, t.p3) == 0.0 {
        return;
    }

    let min_x = t.p1.x.min(t.p2.x).min(t.p3.x).floor().max(0.0);
    let min_y = t.p1.y.min(t.p2.y).min(t.p3.y).floor().max(0.0);
    let max_x = t.p1.x.max(t.p2.x).max(t.p3.x).ceil().min(target.width as f32);
    let max_y = t.p1.y.max(t.p2.y).max(t.p3.y).ceil().min(target.height as f32);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    for y in min_y as u32..max_y as u32 {
        for x in min_x as u32..max_x as u32 {
            let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let w1 = edge(t.p2, t.p3, p);
            let w2 = edge(t.p3, t.p1, p);
            let w3 = edge(t.p1, t.p2, p);

            // accept either winding
            let inside = (w1 >= 0.0 && w2 >= 0.0 && w3 >= 0.0)
                || (w1 <= 0.0 && w2 <= 0.0 && w3 <= 0.0);
            if inside {
                let i = x as usize + y as usize * target.width as usize;
                target.pixels[i] = color;
            }
        }
    }
}

/// Copy `src` onto `target` with its origin at `(x, y)`, clipping to `target`.
pub(crate) fn copy_clipped(
    target: &mut Target<'_>,
    src: &[u32],
    src_width: u32,
    src_height: u32,
    x: i64,
    y: i64,
) {
    for sy in 0..i64::from(src_height) {
        let dy = y + sy;
        if dy < 0 || dy >= i64::from(target.height) {
            continue;
        }

        for sx in 0..i64::from(src_width) {
            let dx = x + sx;
            if dx < 0 || dx >= i64::from(target.width) {
                continue;
            }

            let s = (sx + sy * i64::from(src_width)) as usize;
            let d = (dx + dy * i64::from(target.width)) as usize;
            target.pixels[d] = src[s];
        }
    }
}
