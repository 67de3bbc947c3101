//! Boundary decomposition used by the generic predicates.
//!
//! Every shape's outline is a list of straight segments and circular arcs.
//! Ellipses are the only shape that gets approximated.

use glam::Vec2;

use super::line::segments_intersect;
use super::{polygon, AngularSpan, Shape};
use crate::math::{self, EPSILON};

/// Segments used to approximate a non-degenerate ellipse outline.
pub(crate) const ELLIPSE_SEGMENTS: usize = 64;

/// Samples taken along a single boundary piece by [`boundary_samples`].
const SAMPLES_PER_EDGE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Edge {
    Segment { a: Vec2, b: Vec2 },
    Arc { center: Vec2, radius: f32, span: AngularSpan },
}

impl Edge {
    fn arc(center: Vec2, radius: f32, span: AngularSpan) -> Self {
        if radius <= EPSILON {
            Edge::Segment { a: center, b: center }
        } else {
            Edge::Arc { center, radius, span }
        }
    }

    fn start(&self) -> Vec2 {
        match *self {
            Edge::Segment { a, .. } => a,
            Edge::Arc { center, radius, span } => on_circle(center, radius, span.start()),
        }
    }

    fn samples(&self, out: &mut Vec<Vec2>) {
        match *self {
            Edge::Segment { a, b } => {
                let step = 1.0 / SAMPLES_PER_EDGE as f32;
                out.extend((0..=SAMPLES_PER_EDGE).map(|i| a.lerp(b, i as f32 * step)));
            }
            Edge::Arc { center, radius, span } => {
                let points = span.sample_angles(SAMPLES_PER_EDGE);
                out.extend(points.map(|t| on_circle(center, radius, t)));
            }
        }
    }

    /// Ordering key so arc pairs are always solved the same way round.
    fn key(&self) -> (f32, f32, f32) {
        match *self {
            Edge::Segment { a, .. } => (a.x, a.y, 0.0),
            Edge::Arc { center, radius, .. } => (center.x, center.y, radius),
        }
    }
}

fn on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

fn closed(vertices: &[Vec2]) -> Vec<Edge> {
    polygon::edges(vertices)
        .map(|(a, b)| Edge::Segment { a, b })
        .collect()
}

fn open(points: &[Vec2]) -> Vec<Edge> {
    points
        .windows(2)
        .map(|w| Edge::Segment { a: w[0], b: w[1] })
        .collect()
}

/// Boundary pieces of `shape`.
pub(crate) fn edges(shape: &Shape) -> Vec<Edge> {
    match shape {
        Shape::Point(p) => vec![Edge::Segment {
            a: p.position(),
            b: p.position(),
        }],
        Shape::Line(l) => vec![Edge::Segment {
            a: l.start(),
            b: l.end(),
        }],
        Shape::Rectangle(r) => closed(&r.corners()),
        Shape::Circle(c) => vec![Edge::arc(c.position(), c.radius(), AngularSpan::FULL)],
        Shape::Ellipse(e) => {
            if e.is_degenerate() {
                let h = e.half_extents();
                vec![Edge::Segment {
                    a: e.position() - h,
                    b: e.position() + h,
                }]
            } else {
                closed(&e.boundary_points(ELLIPSE_SEGMENTS))
            }
        }
        Shape::Triangle(t) => closed(t.vertices()),
        Shape::Arc(a) => vec![Edge::arc(a.position(), a.radius(), *a.span())],
        Shape::Sector(s) => {
            let [first, second] = s.radii();
            vec![
                Edge::Segment {
                    a: first.start(),
                    b: first.end(),
                },
                Edge::arc(s.position(), s.radius(), *s.span()),
                Edge::Segment {
                    a: second.start(),
                    b: second.end(),
                },
            ]
        }
        Shape::Polygon(p) => closed(p.vertices()),
        Shape::Spline(s) => open(&s.polyline()),
    }
}

/// A point known to belong to `shape`.
pub(crate) fn anchor(shape: &Shape) -> Vec2 {
    edges(shape)
        .first()
        .map_or_else(|| shape.position(), Edge::start)
}

/// Points spread along the outline of `shape`, vertices included.
pub(crate) fn boundary_samples(shape: &Shape) -> Vec<Vec2> {
    let mut out = Vec::new();
    for edge in edges(shape) {
        edge.samples(&mut out);
    }
    out
}

/// Whether two boundary pieces touch. Symmetric in its arguments.
pub(crate) fn edges_intersect(first: &Edge, second: &Edge) -> bool {
    match (*first, *second) {
        (Edge::Segment { a: a1, b: a2 }, Edge::Segment { a: b1, b: b2 }) => {
            segments_intersect(a1, a2, b1, b2)
        }
        (Edge::Segment { a, b }, Edge::Arc { center, radius, span })
        | (Edge::Arc { center, radius, span }, Edge::Segment { a, b }) => {
            segment_arc_intersect(a, b, center, radius, &span)
        }
        (Edge::Arc { .. }, Edge::Arc { .. }) => {
            let (one, two) = if first.key() <= second.key() {
                (first, second)
            } else {
                (second, first)
            };
            match (*one, *two) {
                (
                    Edge::Arc {
                        center: c1,
                        radius: r1,
                        span: s1,
                    },
                    Edge::Arc {
                        center: c2,
                        radius: r2,
                        span: s2,
                    },
                ) => arcs_intersect(c1, r1, &s1, c2, r2, &s2),
                _ => false,
            }
        }
    }
}

fn point_on_arc(point: Vec2, center: Vec2, radius: f32, span: &AngularSpan) -> bool {
    let offset = point - center;
    math::approx_eq(offset.length(), radius) && span.contains_angle(math::angle_of(offset))
}

/// Roots of `|a + t (b - a) - c|² = r²` on `t ∈ [0, 1]`, checked against the
/// arc's span. Near-tangent lines use the closest point instead.
pub(crate) fn segment_arc_intersect(
    a: Vec2,
    b: Vec2,
    center: Vec2,
    radius: f32,
    span: &AngularSpan,
) -> bool {
    if point_on_arc(a, center, radius, span) || point_on_arc(b, center, radius, span) {
        return true;
    }
    let d = b - a;
    let len_sq = d.length_squared();
    if len_sq <= EPSILON * EPSILON {
        return false;
    }

    let closest = math::closest_point_on_segment(center, a, b);
    let gap = closest.distance(center);
    if gap > radius + EPSILON {
        return false;
    }
    if math::approx_eq(gap, radius) {
        return span.contains_angle(math::angle_of(closest - center));
    }

    let f = a - center;
    let qb = 2.0 * f.dot(d);
    let qc = f.length_squared() - radius * radius;
    let disc = qb * qb - 4.0 * len_sq * qc;
    if disc < 0.0 {
        return false;
    }
    let root = disc.sqrt();
    let tol = EPSILON / len_sq.sqrt();
    [(-qb - root) / (2.0 * len_sq), (-qb + root) / (2.0 * len_sq)]
        .into_iter()
        .filter(|t| (-tol..=1.0 + tol).contains(t))
        .any(|t| span.contains_angle(math::angle_of(a + d * t - center)))
}

fn arcs_intersect(
    c1: Vec2,
    r1: f32,
    s1: &AngularSpan,
    c2: Vec2,
    r2: f32,
    s2: &AngularSpan,
) -> bool {
    let dist = c1.distance(c2);
    if dist <= EPSILON {
        // Concentric: only coincident circles can meet.
        return math::approx_eq(r1, r2) && s1.overlaps(s2);
    }
    if dist > r1 + r2 + EPSILON || dist < (r1 - r2).abs() - EPSILON {
        return false;
    }
    let axis = (c2 - c1) / dist;
    let along = (dist * dist + r1 * r1 - r2 * r2) / (2.0 * dist);
    let h = (r1 * r1 - along * along).max(0.0).sqrt();
    let base = c1 + axis * along;
    [base + axis.perp() * h, base - axis.perp() * h]
        .into_iter()
        .any(|p| {
            s1.contains_angle(math::angle_of(p - c1)) && s2.contains_angle(math::angle_of(p - c2))
        })
}
