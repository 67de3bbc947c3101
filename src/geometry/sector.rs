use glam::Vec2;

use super::arc::arc_bounds;
use super::{Aabb, AngularSpan, Arc, Line, Style};
use crate::math::{self, EPSILON};

/// Pie slice: the region between two radii and the arc joining them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    center: Vec2,
    radius: f32,
    span: AngularSpan,
    style: Style,
}

impl Sector {
    /// Same angle conventions as [`Arc::new`].
    pub fn new(center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            span: AngularSpan::between(start_angle, end_angle),
            style: Style::default(),
        }
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

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn span(&self) -> &AngularSpan {
        &self.span
    }

    pub fn start_angle(&self) -> f32 {
        self.span.start()
    }

    pub fn end_angle(&self) -> f32 {
        self.span.end()
    }

    pub fn sweep(&self) -> f32 {
        self.span.sweep()
    }

    /// The curved part of the boundary.
    pub fn arc(&self) -> Arc {
        Arc::from_span(self.center, self.radius, self.span)
    }

    /// The two straight edges, start radius first.
    pub fn radii(&self) -> [Line; 2] {
        let on_circle = |angle: f32| self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius;
        [
            Line::new(self.center, on_circle(self.span.start())),
            Line::new(self.center, on_circle(self.span.start() + self.span.sweep())),
        ]
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::splat(self.radius)
    }

    /// `θ r² / 2`.
    pub fn area(&self) -> f32 {
        self.span.sweep() * self.radius * self.radius * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        let arc = arc_bounds(self.center, self.radius, &self.span);
        arc.union(&Aabb::new(self.center, self.center))
    }

    /// Inside the radius and within half the sweep of the bisector.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let offset = point - self.center;
        let dist = offset.length();
        if dist > self.radius + EPSILON {
            return false;
        }
        if dist <= EPSILON {
            return true;
        }
        let bisector = self.span.bisector();
        let bisector_dir = Vec2::new(bisector.cos(), bisector.sin());
        let angle = (offset / dist).dot(bisector_dir).clamp(-1.0, 1.0).acos();
        if angle <= self.span.sweep() * 0.5 + EPSILON {
            return true;
        }
        // Points on the straight edges can miss the angular test by rounding.
        self.radii()
            .iter()
            .any(|edge| math::point_segment_distance(point, edge.start(), edge.end()) <= EPSILON)
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
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_quarter_sector_membership() {
        let s = Sector::new(Vec2::ZERO, 2.0, 0.0, FRAC_PI_2);
        assert!(s.contains_point(Vec2::new(1.0, 1.0)));
        assert!(s.contains_point(Vec2::new(1.5, 0.0)));
        assert!(s.contains_point(Vec2::ZERO));
        assert!(!s.contains_point(Vec2::new(-1.0, 1.0)));
        assert!(!s.contains_point(Vec2::new(1.0, -0.1)));
        assert!(!s.contains_point(Vec2::new(1.8, 1.8)));
    }

    #[test]
    fn test_reflex_sector_membership() {
        // Three quarters of a disk, missing the fourth quadrant.
        let s = Sector::new(Vec2::ZERO, 2.0, 0.0, -FRAC_PI_2);
        assert!((s.sweep() - 3.0 * FRAC_PI_2).abs() < 1e-4);
        assert!(s.contains_point(Vec2::new(-1.0, -1.0)));
        assert!(s.contains_point(Vec2::new(-1.0, 1.0)));
        assert!(!s.contains_point(Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn test_area() {
        let half = Sector::new(Vec2::ZERO, 2.0, 0.0, PI);
        assert!((half.area() - 2.0 * PI).abs() < 1e-4);
    }
}
