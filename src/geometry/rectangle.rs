use glam::Vec2;

use super::{Aabb, Line, Style};

/// Axis-aligned rectangle stored as centre and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    center: Vec2,
    half_extents: Vec2,
    style: Style,
}

impl Rectangle {
    /// Negative half-extents are clamped to zero.
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.max(Vec2::ZERO),
            style: Style::default(),
        }
    }

    /// Rectangle spanning two opposite corners, in any order.
    pub fn from_min_max(a: Vec2, b: Vec2) -> Self {
        Aabb::new(a, b).into()
    }

    /// Rectangle with its top-left (minimum) corner at `(x, y)`.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        let size = Vec2::new(width, height).max(Vec2::ZERO);
        Self::new(Vec2::new(x, y) + size * 0.5, size * 0.5)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.center
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.center = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    pub fn set_half_extents(&mut self, half_extents: Vec2) {
        self.half_extents = half_extents.max(Vec2::ZERO);
    }

    pub fn x(&self) -> f32 {
        self.min().x
    }

    pub fn y(&self) -> f32 {
        self.min().y
    }

    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Corners in counter-clockwise order starting at the minimum corner.
    pub fn corners(&self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }

    /// Edges following [`Rectangle::corners`].
    pub fn sides(&self) -> [Line; 4] {
        let c = self.corners();
        [
            Line::new(c[0], c[1]),
            Line::new(c[1], c[2]),
            Line::new(c[2], c[3]),
            Line::new(c[3], c[0]),
        ]
    }

    /// Closest point inside or on the rectangle.
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.bounds().contains_point(point)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}

impl From<Aabb> for Rectangle {
    fn from(aabb: Aabb) -> Self {
        Rectangle::new(aabb.center(), aabb.half_extents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let r = Rectangle::from_xywh(1.0, 2.0, 4.0, 6.0);
        assert_eq!(r.position(), Vec2::new(3.0, 5.0));
        assert_eq!(r.half_extents(), Vec2::new(2.0, 3.0));
        assert_eq!(r.x(), 1.0);
        assert_eq!(r.y(), 2.0);
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 6.0);
        assert_eq!(r.area(), 24.0);
    }

    #[test]
    fn test_corners_counter_clockwise() {
        let r = Rectangle::new(Vec2::ZERO, Vec2::new(1.0, 2.0));
        let c = r.corners();
        assert_eq!(c[0], Vec2::new(-1.0, -2.0));
        assert_eq!(c[2], Vec2::new(1.0, 2.0));
        let sides = r.sides();
        assert_eq!(sides[0].end(), sides[1].start());
        assert_eq!(sides[3].end(), c[0]);
    }

    #[test]
    fn test_from_min_max_any_order() {
        let r = Rectangle::from_min_max(Vec2::new(4.0, 4.0), Vec2::new(0.0, 2.0));
        assert_eq!(r.min(), Vec2::new(0.0, 2.0));
        assert_eq!(r.max(), Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let r = Rectangle::new(Vec2::ZERO, Vec2::splat(2.0));
        assert!(r.contains_point(Vec2::new(2.0, 0.0)));
        assert!(r.contains_point(Vec2::ZERO));
        assert!(!r.contains_point(Vec2::new(2.1, 0.0)));
    }
}
