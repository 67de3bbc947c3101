use glam::Vec2;

use super::{Aabb, Style};
use crate::error::GeometryError;
use crate::math::{self, EPSILON};

/// Samples taken per control-point interval when the curve is flattened.
pub const SAMPLES_PER_SEGMENT: usize = 16;

/// Uniform Catmull-Rom spline passing through every control point.
///
/// Predicates work on the curve flattened to [`SAMPLES_PER_SEGMENT`]
/// samples per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    control_points: Vec<Vec2>,
    style: Style,
}

impl Spline {
    /// Needs at least two control points.
    pub fn new(control_points: Vec<Vec2>) -> Result<Self, GeometryError> {
        if control_points.len() < 2 {
            return Err(GeometryError::TooFewControlPoints {
                expected: 2,
                found: control_points.len(),
            });
        }
        if control_points.iter().any(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        Ok(Self {
            control_points,
            style: Style::default(),
        })
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn control_points(&self) -> &[Vec2] {
        &self.control_points
    }

    /// Point on the curve for `t` in `[0, 1]` over the whole spline.
    pub fn evaluate(&self, t: f32) -> Vec2 {
        let points = &self.control_points;
        let intervals = points.len() - 1;
        let scaled = t.clamp(0.0, 1.0) * intervals as f32;
        let i = (scaled.floor() as usize).min(intervals - 1);
        let u = scaled - i as f32;

        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(intervals)];

        let u2 = u * u;
        let u3 = u2 * u;
        0.5 * (2.0 * p1
            + (p2 - p0) * u
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3)
    }

    /// Flatten into a polyline with `per_segment` samples per interval.
    pub fn sample(&self, per_segment: usize) -> Vec<Vec2> {
        let total = (self.control_points.len() - 1) * per_segment.max(1);
        (0..=total)
            .map(|i| self.evaluate(i as f32 / total as f32))
            .collect()
    }

    pub(crate) fn polyline(&self) -> Vec<Vec2> {
        self.sample(SAMPLES_PER_SEGMENT)
    }

    /// Length of the flattened curve.
    pub fn length(&self) -> f32 {
        self.polyline().windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Mean of the control points.
    pub fn position(&self) -> Vec2 {
        self.control_points.iter().copied().sum::<Vec2>() / self.control_points.len() as f32
    }

    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position();
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.control_points {
            *p += delta;
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Aabb::from_points(self.control_points.iter().copied()).half_extents()
    }

    pub fn area(&self) -> f32 {
        0.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.polyline())
    }

    /// Whether `point` lies on the flattened curve.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.polyline()
            .windows(2)
            .any(|w| math::point_segment_distance(point, w[0], w[1]) <= EPSILON)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}
