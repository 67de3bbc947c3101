use glam::Vec2;

use super::{Aabb, Line, Style};
use crate::error::GeometryError;
use crate::math::{self, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Vec2; 3],
    style: Style,
}

impl Triangle {
    /// Fails when two vertices coincide or all three are collinear.
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Result<Self, GeometryError> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        // |ab x ac| = |ab||ac| sin(angle); reject near-zero sines and
        // coincident vertices alike.
        let ab = b - a;
        let ac = c - a;
        let scale = ab.length() * ac.length();
        if scale <= EPSILON || ab.perp_dot(ac).abs() <= EPSILON * scale {
            return Err(GeometryError::DegenerateTriangle);
        }
        if b.distance(c) <= EPSILON {
            return Err(GeometryError::DegenerateTriangle);
        }
        Ok(Self {
            vertices: [a, b, c],
            style: Style::default(),
        })
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn vertices(&self) -> &[Vec2; 3] {
        &self.vertices
    }

    pub fn centroid(&self) -> Vec2 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// The centroid.
    pub fn position(&self) -> Vec2 {
        self.centroid()
    }

    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.centroid();
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.bounds().half_extents()
    }

    /// Positive when the vertices wind counter-clockwise.
    pub fn area(&self) -> f32 {
        let [a, b, c] = self.vertices;
        (b - a).perp_dot(c - a) * 0.5
    }

    pub fn sides(&self) -> [Line; 3] {
        let [a, b, c] = self.vertices;
        [Line::new(a, b), Line::new(b, c), Line::new(c, a)]
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices)
    }

    /// Edge cross-product test. Points on an edge or vertex are inside.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let [a, b, c] = self.vertices;
        let p = math::lift(point);
        let d1 = math::cross_z(math::lift(b - a), p - math::lift(a));
        let d2 = math::cross_z(math::lift(c - b), p - math::lift(b));
        let d3 = math::cross_z(math::lift(a - c), p - math::lift(c));

        let has_negative = d1 < -EPSILON || d2 < -EPSILON || d3 < -EPSILON;
        let has_positive = d1 > EPSILON || d2 > EPSILON || d3 > EPSILON;
        !(has_negative && has_positive)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    fn right_triangle() -> Triangle {
        Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)).unwrap()
    }

    #[test]
    fn test_point_inside_and_outside() {
        let t = right_triangle();
        assert!(t.contains_point(Vec2::new(1.0, 1.0)));
        assert!(!t.contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_boundary_points_are_inside() {
        let t = right_triangle();
        assert!(t.contains_point(Vec2::new(2.0, 0.0)));
        assert!(t.contains_point(Vec2::new(2.0, 2.0)));
        assert!(t.contains_point(Vec2::new(0.0, 4.0)));
        // just past the edge is outside
        assert!(!t.contains_point(Vec2::new(2.0, -0.01)));
        assert!(!t.contains_point(Vec2::new(2.01, 2.01)));
    }

    #[test]
    fn test_winding_does_not_change_containment() {
        let cw = Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 4.0), Vec2::new(4.0, 0.0)).unwrap();
        assert!(cw.area() < 0.0);
        assert!(cw.contains_point(Vec2::new(1.0, 1.0)));
        assert!(!cw.contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_degenerate_rejected() {
        assert_eq!(
            Triangle::new(Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)),
            Err(GeometryError::DegenerateTriangle)
        );
        assert_eq!(
            Triangle::new(Vec2::ZERO, Vec2::ZERO, Vec2::new(2.0, 0.0)),
            Err(GeometryError::DegenerateTriangle)
        );
        assert_eq!(
            Triangle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(f32::NAN, 0.0)),
            Err(GeometryError::NonFiniteCoordinate)
        );
    }

    #[test]
    fn test_area_and_centroid() {
        let t = right_triangle();
        assert!(approx_eq(t.area(), 8.0));
        assert!(approx_eq(t.centroid().x, 4.0 / 3.0));
        assert!(approx_eq(t.centroid().y, 4.0 / 3.0));
    }
}
