//! 2D shape primitives and their pairwise predicates.
//!
//! [`Shape`] is a closed sum type over ten primitives. Intersection and
//! containment tests are dispatched over the `(kind, kind)` pair in
//! [`intersect`], so every combination is an explicit match arm.

mod arc;
mod bounds;
mod circle;
mod ellipse;
pub mod intersect;
mod line;
mod outline;
mod point;
mod polygon;
mod rectangle;
mod sector;
mod spline;
mod triangle;

pub use arc::{AngularSpan, Arc};
pub use bounds::Aabb;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::{segment_intersection, Line, LineIntersection};
pub use point::Point;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use sector::Sector;
pub use spline::Spline;
pub use triangle::Triangle;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// RGBA color, 8 bits per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed `[r, g, b, a]` bytes, ready for upload to a vertex buffer.
    pub fn to_bytes(self) -> [u8; 4] {
        bytemuck::cast(self)
    }

    /// Normalized `[0, 1]` float channels.
    pub fn to_f32_array(self) -> [f32; 4] {
        self.to_bytes().map(|c| c as f32 / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Presentation attributes every shape carries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub color: Color,
    pub filled: bool,
}

impl Style {
    pub fn new(color: Color, filled: bool) -> Self {
        Self { color, filled }
    }
}

/// Discriminant of a [`Shape`].
///
/// The declaration order is the canonical operand order used by the
/// predicate dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    Point,
    Line,
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Arc,
    Sector,
    Polygon,
    Spline,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::Point,
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Triangle,
        ShapeKind::Arc,
        ShapeKind::Sector,
        ShapeKind::Polygon,
        ShapeKind::Spline,
    ];

    /// Whether the shape encloses an area (as opposed to a point or curve).
    pub fn is_region(self) -> bool {
        matches!(
            self,
            ShapeKind::Rectangle
                | ShapeKind::Circle
                | ShapeKind::Ellipse
                | ShapeKind::Triangle
                | ShapeKind::Sector
                | ShapeKind::Polygon
        )
    }
}

/// A geometric primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Arc(Arc),
    Sector(Sector),
    Polygon(Polygon),
    Spline(Spline),
}

macro_rules! each_shape {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            Shape::Point($s) => $body,
            Shape::Line($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Triangle($s) => $body,
            Shape::Arc($s) => $body,
            Shape::Sector($s) => $body,
            Shape::Polygon($s) => $body,
            Shape::Spline($s) => $body,
        }
    };
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point(_) => ShapeKind::Point,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Arc(_) => ShapeKind::Arc,
            Shape::Sector(_) => ShapeKind::Sector,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Spline(_) => ShapeKind::Spline,
        }
    }

    /// Reference point: the centre for symmetric shapes, the centroid for
    /// vertex-defined shapes, the midpoint for lines.
    pub fn position(&self) -> Vec2 {
        each_shape!(self, s => s.position())
    }

    /// Move the shape so its reference point lands on `position`.
    pub fn set_position(&mut self, position: Vec2) {
        each_shape!(self, s => s.set_position(position))
    }

    pub fn translate(&mut self, delta: Vec2) {
        each_shape!(self, s => s.translate(delta))
    }

    /// Never negative on either axis.
    pub fn half_extents(&self) -> Vec2 {
        each_shape!(self, s => s.half_extents())
    }

    /// Signed for vertex-defined shapes (positive when counter-clockwise),
    /// zero for points and curves.
    pub fn area(&self) -> f32 {
        each_shape!(self, s => s.area())
    }

    pub fn bounds(&self) -> Aabb {
        each_shape!(self, s => s.bounds())
    }

    pub fn style(&self) -> &Style {
        each_shape!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut Style {
        each_shape!(self, s => s.style_mut())
    }

    pub fn color(&self) -> Color {
        self.style().color
    }

    pub fn set_color(&mut self, color: Color) {
        self.style_mut().color = color;
    }

    pub fn is_filled(&self) -> bool {
        self.style().filled
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.style_mut().filled = filled;
    }

    /// Whether `point` lies inside or on the shape.
    pub fn contains_point(&self, point: Vec2) -> bool {
        each_shape!(self, s => s.contains_point(point))
    }

    /// Same as [`Shape::contains_point`]; a point touches a shape exactly
    /// when it lies in it.
    pub fn intersects_point(&self, point: Vec2) -> bool {
        self.contains_point(point)
    }

    /// Symmetric: `a.intersects(b) == b.intersects(a)` for every pair.
    pub fn intersects(&self, other: &Shape) -> bool {
        intersect::intersects(self, other)
    }

    /// Whether `other` lies entirely inside or on `self`.
    pub fn contains(&self, other: &Shape) -> bool {
        intersect::contains(self, other)
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(Point, Line, Rectangle, Circle, Ellipse, Triangle, Arc, Sector, Polygon, Spline);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Point::new(Vec2::new(1.0, 1.0)).into(),
            Line::new(Vec2::new(-3.0, 0.0), Vec2::new(3.0, 2.0)).into(),
            Rectangle::new(Vec2::ZERO, Vec2::new(2.0, 1.0)).into(),
            Circle::new(Vec2::new(1.0, 0.0), 1.5).into(),
            Ellipse::new(Vec2::ZERO, Vec2::new(3.0, 1.0)).into(),
            Triangle::new(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0))
                .unwrap()
                .into(),
            Arc::new(Vec2::ZERO, 2.0, 0.0, std::f32::consts::PI).into(),
            Sector::new(Vec2::ZERO, 2.0, 0.0, std::f32::consts::FRAC_PI_2).into(),
            Polygon::new(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(4.0, 0.0),
                Vec2::new(4.0, 3.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(0.0, 3.0),
            ])
            .unwrap()
            .into(),
            Spline::new(vec![
                Vec2::new(-2.0, -2.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(2.0, -1.0),
            ])
            .unwrap()
            .into(),
        ]
    }

    #[test]
    fn test_kinds_are_distinct_and_ordered() {
        let shapes = sample_shapes();
        let kinds: Vec<_> = shapes.iter().map(Shape::kind).collect();
        assert_eq!(kinds, ShapeKind::ALL.to_vec());
    }

    #[test]
    fn test_area_invariant_under_translation() {
        for mut shape in sample_shapes() {
            let before = shape.area();
            shape.set_position(Vec2::new(37.5, -12.25));
            assert!(
                approx_eq(shape.area(), before),
                "{:?} area changed: {} -> {}",
                shape.kind(),
                before,
                shape.area()
            );
            assert!(
                (shape.position() - Vec2::new(37.5, -12.25)).length() < 1e-3,
                "{:?} did not move to the requested position",
                shape.kind()
            );
        }
    }

    #[test]
    fn test_half_extents_never_negative() {
        for shape in sample_shapes() {
            let h = shape.half_extents();
            assert!(h.x >= 0.0 && h.y >= 0.0, "{:?}: {:?}", shape.kind(), h);
        }
        let circle = Circle::new(Vec2::ZERO, -4.0);
        assert_eq!(circle.radius(), 0.0);
        let rect = Rectangle::new(Vec2::ZERO, Vec2::new(-1.0, 2.0));
        assert_eq!(rect.half_extents(), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_style_accessors() {
        let mut shape: Shape = Circle::new(Vec2::ZERO, 1.0).into();
        assert_eq!(shape.color(), Color::WHITE);
        assert!(!shape.is_filled());
        shape.set_color(Color::RED);
        shape.set_filled(true);
        assert_eq!(shape.color(), Color::RED);
        assert!(shape.is_filled());
    }

    #[test]
    fn test_color_bytes() {
        let c = Color::rgba(10, 20, 30, 40);
        assert_eq!(c.to_bytes(), [10, 20, 30, 40]);
        assert!(approx_eq(Color::WHITE.to_f32_array()[0], 1.0));
    }

    #[test]
    fn test_intersects_symmetric_over_matrix() {
        let shapes = sample_shapes();
        let offsets = [
            Vec2::ZERO,
            Vec2::new(1.5, 0.5),
            Vec2::new(-2.5, 1.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(20.0, -20.0),
        ];
        for a in &shapes {
            for b in &shapes {
                for offset in offsets {
                    let mut moved = b.clone();
                    moved.translate(offset);
                    assert_eq!(
                        a.intersects(&moved),
                        moved.intersects(a),
                        "asymmetric {:?} vs {:?} at offset {:?}",
                        a.kind(),
                        moved.kind(),
                        offset
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_shape_intersects_itself() {
        for shape in sample_shapes() {
            assert!(shape.intersects(&shape), "{:?}", shape.kind());
        }
    }

    #[test]
    fn test_far_apart_shapes_never_intersect() {
        let shapes = sample_shapes();
        for a in &shapes {
            for b in &shapes {
                let mut far = b.clone();
                far.translate(Vec2::new(500.0, 500.0));
                assert!(!a.intersects(&far), "{:?} vs {:?}", a.kind(), b.kind());
            }
        }
    }
}
