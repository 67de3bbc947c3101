use glam::Vec2;

use super::{Aabb, Style};
use crate::math::vec_approx_eq;

/// A single location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    position: Vec2,
    style: Style,
}

impl Point {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            style: Style::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::ZERO
    }

    pub fn area(&self) -> f32 {
        0.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.position)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        vec_approx_eq(self.position, point)
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
    use crate::geometry::{Circle, Line, Rectangle, Shape};

    #[test]
    fn test_measurements() {
        let mut p = Point::new(Vec2::new(2.0, -1.0));
        assert_eq!(p.area(), 0.0);
        assert_eq!(p.half_extents(), Vec2::ZERO);
        let bounds = p.bounds();
        assert_eq!(bounds.min, Vec2::new(2.0, -1.0));
        assert_eq!(bounds.max, Vec2::new(2.0, -1.0));

        p.translate(Vec2::new(1.0, 1.0));
        assert_eq!(p.position(), Vec2::new(3.0, 0.0));
        assert_eq!(p.bounds().center(), Vec2::new(3.0, 0.0));
        assert_eq!(p.area(), 0.0);
    }

    #[test]
    fn test_contains_point_within_tolerance() {
        let p = Point::new(Vec2::ONE);
        assert!(p.contains_point(Vec2::ONE));
        assert!(p.contains_point(Vec2::new(1.0 + 5e-5, 1.0)));
        assert!(!p.contains_point(Vec2::new(1.01, 1.0)));
    }

    #[test]
    fn test_point_intersects_other_shapes() {
        let p: Shape = Point::new(Vec2::new(1.0, 0.0)).into();
        let line: Shape = Line::new(Vec2::ZERO, Vec2::new(2.0, 0.0)).into();
        let rect: Shape = Rectangle::new(Vec2::ZERO, Vec2::splat(1.0)).into();
        let far: Shape = Circle::new(Vec2::new(5.0, 5.0), 1.0).into();

        assert!(p.intersects(&line));
        assert!(line.intersects(&p));
        // on the rectangle's edge counts
        assert!(p.intersects(&rect));
        assert!(rect.contains(&p));
        assert!(!p.intersects(&far));
        assert!(!far.intersects(&p));

        let same: Shape = Point::new(Vec2::new(1.0, 0.0)).into();
        assert!(p.intersects(&same));
        assert!(p.contains(&same));
    }
}
