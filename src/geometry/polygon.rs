use std::f32::consts::TAU;

use glam::Vec2;

use super::{Aabb, Line, Style};
use crate::error::GeometryError;
use crate::math::{self, EPSILON};

/// Shoelace sum `½ Σ (xᵢ yᵢ₊₁ − xᵢ₊₁ yᵢ)`.
pub(crate) fn signed_area(vertices: &[Vec2]) -> f32 {
    edges(vertices).map(|(a, b)| a.perp_dot(b)).sum::<f32>() * 0.5
}

/// Closing edges `(vᵢ, vᵢ₊₁)`, last one wraps back to the first vertex.
pub(crate) fn edges(vertices: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
}

/// Boundary-inclusive even-odd test.
pub(crate) fn polygon_contains_point(vertices: &[Vec2], point: Vec2) -> bool {
    if edges(vertices).any(|(a, b)| math::point_segment_distance(point, a, b) <= EPSILON) {
        return true;
    }
    let mut inside = false;
    for (a, b) in edges(vertices) {
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Simple polygon given by its vertices in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    style: Style,
}

impl Polygon {
    /// Needs at least three vertices.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                expected: 3,
                found: vertices.len(),
            });
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        Ok(Self {
            vertices,
            style: Style::default(),
        })
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`, the
    /// first vertex at angle zero.
    pub fn regular(center: Vec2, radius: f32, sides: usize) -> Result<Self, GeometryError> {
        let radius = radius.max(0.0);
        let vertices = (0..sides)
            .map(|i| {
                let angle = TAU * i as f32 / sides as f32;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::new(vertices)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        edges(&self.vertices)
    }

    pub fn sides(&self) -> Vec<Line> {
        self.edges().map(|(a, b)| Line::new(a, b)).collect()
    }

    /// Positive when the vertices wind counter-clockwise.
    pub fn area(&self) -> f32 {
        signed_area(&self.vertices)
    }

    /// Area centroid `(1/6A) Σ (pᵢ + pᵢ₊₁)(xᵢ yᵢ₊₁ − xᵢ₊₁ yᵢ)`. Falls back
    /// to the vertex average when the area vanishes.
    pub fn centroid(&self) -> Vec2 {
        let area = self.area();
        if area.abs() <= EPSILON {
            return self.vertices.iter().copied().sum::<Vec2>() / self.vertices.len() as f32;
        }
        let sum: Vec2 = self.edges().map(|(a, b)| (a + b) * a.perp_dot(b)).sum();
        sum / (6.0 * area)
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

    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let mut sign = 0.0f32;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let turn = (b - a).perp_dot(c - b);
            if turn.abs() <= EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = turn.signum();
            } else if turn.signum() != sign {
                return false;
            }
        }
        true
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        polygon_contains_point(&self.vertices, point)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}
