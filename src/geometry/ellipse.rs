use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::{Aabb, Style};
use crate::math::{self, EPSILON};

/// Axis-aligned ellipse: `half_extents.x` is the horizontal semi-axis,
/// `half_extents.y` the vertical one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    center: Vec2,
    half_extents: Vec2,
    style: Style,
}

impl Ellipse {
    /// Negative semi-axes are clamped to zero.
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.max(Vec2::ZERO),
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

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    pub fn set_half_extents(&mut self, half_extents: Vec2) {
        self.half_extents = half_extents.max(Vec2::ZERO);
    }

    /// True when either semi-axis has collapsed, leaving a segment or point.
    pub fn is_degenerate(&self) -> bool {
        self.half_extents.x <= EPSILON || self.half_extents.y <= EPSILON
    }

    pub fn area(&self) -> f32 {
        PI * self.half_extents.x * self.half_extents.y
    }

    /// Ramanujan's approximation.
    pub fn perimeter(&self) -> f32 {
        let a = self.half_extents.x;
        let b = self.half_extents.y;
        PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
    }

    /// The two foci, placed along the longer axis.
    pub fn foci(&self) -> (Vec2, Vec2) {
        let a = self.half_extents.x;
        let b = self.half_extents.y;
        let c = (a * a - b * b).abs().sqrt();
        let offset = if a >= b {
            Vec2::new(c, 0.0)
        } else {
            Vec2::new(0.0, c)
        };
        (self.center - offset, self.center + offset)
    }

    pub fn eccentricity(&self) -> f32 {
        let major = self.half_extents.max_element();
        if major <= EPSILON {
            return 0.0;
        }
        let minor = self.half_extents.min_element();
        (1.0 - (minor * minor) / (major * major)).max(0.0).sqrt()
    }

    /// Point on the boundary at parametric angle `t`.
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.center + Vec2::new(t.cos(), t.sin()) * self.half_extents
    }

    /// `count` points evenly spaced in parametric angle.
    pub fn boundary_points(&self, count: usize) -> Vec<Vec2> {
        let count = count.max(3);
        (0..count)
            .map(|i| self.point_at(TAU * i as f32 / count as f32))
            .collect()
    }

    /// Map a point into the space where this ellipse is the unit circle.
    pub(crate) fn to_unit_space(&self, point: Vec2) -> Vec2 {
        (point - self.center) / self.half_extents
    }

    /// Boundary tolerance after mapping to unit space.
    pub(crate) fn unit_tolerance(&self) -> f32 {
        EPSILON / self.half_extents.min_element().max(EPSILON)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.is_degenerate() {
            // Collapsed onto the longer axis.
            let h = self.half_extents;
            return math::point_segment_distance(point, self.center - h, self.center + h)
                <= EPSILON;
        }
        self.to_unit_space(point).length() <= 1.0 + self.unit_tolerance()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}
