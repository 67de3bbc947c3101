use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::{Aabb, Style};
use crate::math::{self, EPSILON};

/// Counter-clockwise angular interval starting at `start` and covering
/// `sweep` radians.
///
/// Angles are normalized into `(-PI, PI]`. When the end angle is behind the
/// start it is remapped one turn ahead, so the sweep is always in `[0, TAU]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSpan {
    start: f32,
    sweep: f32,
}

impl AngularSpan {
    pub const FULL: AngularSpan = AngularSpan {
        start: 0.0,
        sweep: TAU,
    };

    pub fn between(start: f32, end: f32) -> Self {
        let start = math::normalize_angle(start);
        let mut end = math::normalize_angle(end);
        if end < start {
            end += TAU;
        }
        Self {
            start,
            sweep: (end - start).abs(),
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        math::normalize_angle(self.start + self.sweep)
    }

    pub fn sweep(&self) -> f32 {
        self.sweep
    }

    pub fn is_full(&self) -> bool {
        self.sweep >= TAU - EPSILON
    }

    /// Direction halfway through the span.
    pub fn bisector(&self) -> f32 {
        math::normalize_angle(self.start + self.sweep * 0.5)
    }

    pub fn contains_angle(&self, angle: f32) -> bool {
        if self.is_full() {
            return true;
        }
        let offset = (angle - self.start).rem_euclid(TAU);
        offset <= self.sweep + EPSILON || offset >= TAU - EPSILON
    }

    /// Whether two spans share any direction.
    pub fn overlaps(&self, other: &AngularSpan) -> bool {
        self.contains_angle(other.start) || other.contains_angle(self.start)
    }

    /// `count + 1` evenly spaced angles from start to end inclusive.
    pub(crate) fn sample_angles(&self, count: usize) -> impl Iterator<Item = f32> + '_ {
        let count = count.max(1);
        (0..=count).map(move |i| self.start + self.sweep * i as f32 / count as f32)
    }
}

/// Bounding box of the circular arc described by `center`, `radius` and
/// `span`: the two endpoints plus every axis extreme the arc passes.
pub(crate) fn arc_bounds(center: Vec2, radius: f32, span: &AngularSpan) -> Aabb {
    let on_circle = |angle: f32| center + Vec2::new(angle.cos(), angle.sin()) * radius;
    let extremes = [0.0, FRAC_PI_2, PI, -FRAC_PI_2]
        .into_iter()
        .filter(|a| span.contains_angle(*a))
        .map(on_circle);
    Aabb::from_points(
        [on_circle(span.start()), on_circle(span.start() + span.sweep())]
            .into_iter()
            .chain(extremes),
    )
}

/// A piece of a circle's circumference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    center: Vec2,
    radius: f32,
    span: AngularSpan,
    style: Style,
}

impl Arc {
    /// Angles in radians; the arc runs counter-clockwise from `start_angle`
    /// to `end_angle`. A negative radius is clamped to zero.
    pub fn new(center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            span: AngularSpan::between(start_angle, end_angle),
            style: Style::default(),
        }
    }

    /// Arc over an existing span; the only way to build a full circle.
    pub fn from_span(center: Vec2, radius: f32, span: AngularSpan) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            span,
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

    /// The swept angle θ in `[0, TAU]`.
    pub fn sweep(&self) -> f32 {
        self.span.sweep()
    }

    pub fn point_at_angle(&self, angle: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
    }

    pub fn start_point(&self) -> Vec2 {
        self.point_at_angle(self.span.start())
    }

    pub fn end_point(&self) -> Vec2 {
        self.point_at_angle(self.span.start() + self.span.sweep())
    }

    pub fn length(&self) -> f32 {
        self.radius * self.span.sweep()
    }

    pub fn contains_angle(&self, angle: f32) -> bool {
        self.span.contains_angle(angle)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::splat(self.radius)
    }

    /// Arcs are curves and enclose no area.
    pub fn area(&self) -> f32 {
        0.0
    }

    pub fn bounds(&self) -> Aabb {
        arc_bounds(self.center, self.radius, &self.span)
    }

    /// Whether `point` lies on the arc's curve.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let offset = point - self.center;
        let dist = offset.length();
        if !math::approx_eq(dist, self.radius) {
            return false;
        }
        // A zero-radius arc is its centre.
        dist <= EPSILON || self.span.contains_angle(math::angle_of(offset))
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}
