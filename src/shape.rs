// MIT/Apache2 License

use lyon_geom::{LineSegment, Point, Rect, Vector};
use lyon_path::{builder::PathBuilder, Path};
use std::f32::consts::PI;

/// Number of straight segments an ellipse outline is flattened into.
const ELLIPSE_SEGMENTS: usize = 64;

/// An axis-aligned ellipse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Point<f32>,
    pub radii: Vector<f32>,
}

/// A geometric primitive that can be drawn onto a pixel surface or a device mirror.
#[derive(Debug, Clone)]
pub enum Shape {
    Line(LineSegment<f32>),
    Rectangle(Rect<f32>),
    Ellipse(Ellipse),
    /// A closed polygon, given by its outline.
    Polygon(Vec<Point<f32>>),
    Path(Path),
}

impl Shape {
    /// Convert this shape into a path.
    ///
    /// Every shape but `Line` produces a closed path. Ellipses are approximated by a polygon.
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();

        match self {
            Shape::Line(line) => {
                builder.begin(line.from);
                builder.line_to(line.to);
                builder.end(false);
            }
            Shape::Rectangle(rect) => {
                let (min, max) = (rect.min(), rect.max());
                builder.begin(min);
                builder.line_to(Point::new(max.x, min.y));
                builder.line_to(max);
                builder.line_to(Point::new(min.x, max.y));
                builder.close();
            }
            Shape::Ellipse(Ellipse { center, radii }) => {
                builder.begin(Point::new(center.x + radii.x, center.y));
                for i in 1..ELLIPSE_SEGMENTS {
                    let theta = (i as f32 / ELLIPSE_SEGMENTS as f32) * PI * 2.0;
                    builder.line_to(Point::new(
                        center.x + radii.x * theta.cos(),
                        center.y + radii.y * theta.sin(),
                    ));
                }
                builder.close();
            }
            Shape::Polygon(points) => {
                if let Some((first, rest)) = points.split_first() {
                    builder.begin(*first);
                    rest.iter().for_each(|p| {
                        builder.line_to(*p);
                    });
                    builder.close();
                }
            }
            Shape::Path(path) => return path.clone(),
        }

        builder.build()
    }
}

/// Whether a shape is outlined or filled in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeStyle {
    Outline,
    Fill,
}

impl ShapeStyle {
    #[inline]
    pub fn from_fill(fill: bool) -> Self {
        if fill {
            ShapeStyle::Fill
        } else {
            ShapeStyle::Outline
        }
    }
}

impl From<LineSegment<f32>> for Shape {
    #[inline]
    fn from(l: LineSegment<f32>) -> Self {
        Shape::Line(l)
    }
}

impl From<Rect<f32>> for Shape {
    #[inline]
    fn from(r: Rect<f32>) -> Self {
        Shape::Rectangle(r)
    }
}

impl From<Ellipse> for Shape {
    #[inline]
    fn from(e: Ellipse) -> Self {
        Shape::Ellipse(e)
    }
}

impl From<Vec<Point<f32>>> for Shape {
    #[inline]
    fn from(points: Vec<Point<f32>>) -> Self {
        Shape::Polygon(points)
    }
}

impl From<Path> for Shape {
    #[inline]
    fn from(p: Path) -> Self {
        Shape::Path(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon_path::PathEvent;

    #[test]
    fn test_polygon_conversion() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        ];
        let shape = Shape::from(points.clone());
        assert!(matches!(shape, Shape::Polygon(ref p) if *p == points));

        let events: Vec<PathEvent> = shape.to_path().iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events.last(), Some(PathEvent::End { close: true, .. })));
    }

    #[test]
    fn test_empty_polygon() {
        let shape = Shape::Polygon(Vec::new());
        assert_eq!(shape.to_path().iter().count(), 0);
    }

    #[test]
    fn test_line_is_open() {
        let shape = Shape::from(LineSegment {
            from: Point::new(0.0, 0.0),
            to: Point::new(1.0, 1.0),
        });
        let events: Vec<PathEvent> = shape.to_path().iter().collect();
        assert!(matches!(events.last(), Some(PathEvent::End { close: false, .. })));
    }
}
