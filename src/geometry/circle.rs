use std::f32::consts::PI;

use glam::Vec2;

use super::{Aabb, Style};
use crate::math::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Vec2,
    radius: f32,
    style: Style,
}

impl Circle {
    /// Negative radii are clamped to zero.
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
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

    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    pub fn circumference(&self) -> f32 {
        2.0 * PI * self.radius
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::splat(self.radius)
    }

    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents())
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius + EPSILON
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}
