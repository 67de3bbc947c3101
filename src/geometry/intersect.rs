//! Pairwise shape predicates.
//!
//! [`intersects`] orders its operands by [`ShapeKind`] before dispatching,
//! so each unordered pair of kinds has one arm and the relation is symmetric.
//! Pairs without a closed-form test go through the outline decomposition:
//! the shapes meet when their boundaries cross or one lies inside the other.

use std::cmp::Ordering;

use glam::Vec2;

use super::line::segments_intersect;
use super::outline::{self, edges_intersect};
use super::polygon::{self, polygon_contains_point};
use super::{Arc, Circle, Ellipse, Line, Shape};
use crate::math::{self, EPSILON};

/// Whether `a` and `b` share at least one point. Touching counts.
pub fn intersects(a: &Shape, b: &Shape) -> bool {
    if canonical_order(a, b) == Ordering::Greater {
        return intersects(b, a);
    }
    if !a.bounds().overlaps(&b.bounds()) {
        return false;
    }

    match (a, b) {
        (Shape::Point(p), other) => other.contains_point(p.position()),

        (Shape::Line(l), Shape::Line(m)) => l.intersects_line(m),
        (Shape::Line(l), Shape::Rectangle(r)) => segment_polygon(l, &r.corners()),
        (Shape::Line(l), Shape::Circle(c)) => segment_circle(l, c),
        (Shape::Line(l), Shape::Ellipse(e)) => segment_ellipse(l.start(), l.end(), e),
        (Shape::Line(l), Shape::Triangle(t)) => segment_polygon(l, t.vertices()),
        (Shape::Line(l), Shape::Polygon(p)) => segment_polygon(l, p.vertices()),

        // Bounds already overlap.
        (Shape::Rectangle(_), Shape::Rectangle(_)) => true,
        (Shape::Rectangle(r), Shape::Circle(c)) => {
            c.position().distance(r.clamp_point(c.position())) <= c.radius() + EPSILON
        }
        (Shape::Rectangle(r), Shape::Ellipse(e)) => polygon_ellipse(&r.corners(), e),
        (Shape::Rectangle(r), Shape::Triangle(t)) => polygons_intersect(&r.corners(), t.vertices()),
        (Shape::Rectangle(r), Shape::Polygon(p)) => polygons_intersect(&r.corners(), p.vertices()),

        (Shape::Circle(c), Shape::Circle(d)) => {
            c.position().distance(d.position()) <= c.radius() + d.radius() + EPSILON
        }
        (Shape::Circle(c), Shape::Triangle(t)) => circle_polygon(c, t.vertices()),
        (Shape::Circle(c), Shape::Polygon(p)) => circle_polygon(c, p.vertices()),

        (Shape::Ellipse(e), Shape::Triangle(t)) => polygon_ellipse(t.vertices(), e),
        (Shape::Ellipse(e), Shape::Polygon(p)) => polygon_ellipse(p.vertices(), e),

        (Shape::Triangle(t), Shape::Triangle(u)) => polygons_intersect(t.vertices(), u.vertices()),
        (Shape::Triangle(t), Shape::Polygon(p)) => polygons_intersect(t.vertices(), p.vertices()),
        (Shape::Polygon(p), Shape::Polygon(q)) => polygons_intersect(p.vertices(), q.vertices()),

        _ => outlines_meet(a, b),
    }
}

/// Whether every point of `inner` lies inside or on `outer`.
///
/// Exact for rectangle and polygon containers and for circles holding
/// circles, polygons, arcs or sectors. The remaining pairs test sampled
/// points of `inner`'s boundary, so a curve bulging out between two samples
/// by less than the sampling step can be reported as contained.
pub fn contains(outer: &Shape, inner: &Shape) -> bool {
    if let Shape::Point(p) = inner {
        return outer.contains_point(p.position());
    }
    if !outer.bounds().contains(&inner.bounds()) {
        return false;
    }

    let outer_vertices = polygonal_vertices(outer);
    let inner_vertices = polygonal_vertices(inner);
    match (outer, inner, outer_vertices.as_deref(), inner_vertices.as_deref()) {
        (Shape::Rectangle(_), ..) => true,

        (Shape::Circle(c), Shape::Circle(d), ..) => {
            c.position().distance(d.position()) + d.radius() <= c.radius() + EPSILON
        }
        (Shape::Circle(c), Shape::Arc(a), ..) => arc_reach(a, c.position()) <= c.radius() + EPSILON,
        (Shape::Circle(c), Shape::Sector(s), ..) => {
            c.contains_point(s.position()) && arc_reach(&s.arc(), c.position()) <= c.radius() + EPSILON
        }
        (Shape::Circle(c), _, _, Some(vertices)) => vertices.iter().all(|v| c.contains_point(*v)),
        (Shape::Ellipse(e), _, _, Some(vertices)) if !e.is_degenerate() => {
            vertices.iter().all(|v| e.contains_point(*v))
        }

        (Shape::Triangle(_) | Shape::Polygon(_), Shape::Circle(c), Some(vertices), _) => {
            polygon_contains_circle(vertices, c)
        }
        (Shape::Triangle(_) | Shape::Polygon(_), _, Some(hull), Some(chain)) => {
            polygon_contains_polygon(hull, chain)
        }

        _ => outline::boundary_samples(inner)
            .into_iter()
            .all(|p| outer.contains_point(p)),
    }
}

/// Greatest distance from `from` to a point of `arc`: the far side of the
/// arc's circle when the arc reaches it, an end point otherwise.
fn arc_reach(arc: &Arc, from: Vec2) -> f32 {
    let offset = arc.position() - from;
    let distance = offset.length();
    if distance <= EPSILON || arc.contains_angle(offset.y.atan2(offset.x)) {
        distance + arc.radius()
    } else {
        from.distance(arc.start_point())
            .max(from.distance(arc.end_point()))
    }
}

/// Same-kind pairs are ordered by their bounds so both call orders run the
/// same computation.
fn canonical_order(a: &Shape, b: &Shape) -> Ordering {
    a.kind().cmp(&b.kind()).then_with(|| {
        let (ka, kb) = (a.bounds(), b.bounds());
        let key = |min: Vec2, max: Vec2| [min.x, min.y, max.x, max.y];
        key(ka.min, ka.max)
            .partial_cmp(&key(kb.min, kb.max))
            .unwrap_or(Ordering::Equal)
    })
}

/// Vertex chain for shapes made only of straight edges.
fn polygonal_vertices(shape: &Shape) -> Option<Vec<Vec2>> {
    match shape {
        Shape::Line(l) => Some(vec![l.start(), l.end()]),
        Shape::Rectangle(r) => Some(r.corners().to_vec()),
        Shape::Triangle(t) => Some(t.vertices().to_vec()),
        Shape::Polygon(p) => Some(p.vertices().to_vec()),
        _ => None,
    }
}

fn outlines_meet(a: &Shape, b: &Shape) -> bool {
    let edges_a = outline::edges(a);
    let edges_b = outline::edges(b);
    let crossing = edges_a
        .iter()
        .any(|ea| edges_b.iter().any(|eb| edges_intersect(ea, eb)));
    crossing
        || b.contains_point(outline::anchor(a))
        || a.contains_point(outline::anchor(b))
}

fn segment_circle(line: &Line, circle: &Circle) -> bool {
    line.distance_to_point(circle.position()) <= circle.radius() + EPSILON
}

fn segment_polygon(line: &Line, vertices: &[Vec2]) -> bool {
    polygon_contains_point(vertices, line.start())
        || polygon::edges(vertices).any(|(a, b)| segments_intersect(line.start(), line.end(), a, b))
}

/// Distance test after scaling the ellipse to the unit circle.
fn segment_ellipse(a: Vec2, b: Vec2, ellipse: &Ellipse) -> bool {
    if ellipse.is_degenerate() {
        let h = ellipse.half_extents();
        let c = ellipse.position();
        return segments_intersect(a, b, c - h, c + h);
    }
    let ua = ellipse.to_unit_space(a);
    let ub = ellipse.to_unit_space(b);
    math::point_segment_distance(Vec2::ZERO, ua, ub) <= 1.0 + ellipse.unit_tolerance()
}

fn polygon_ellipse(vertices: &[Vec2], ellipse: &Ellipse) -> bool {
    if ellipse.is_degenerate() {
        let h = ellipse.half_extents();
        let c = ellipse.position();
        return polygon_contains_point(vertices, c - h)
            || polygon::edges(vertices).any(|(a, b)| segments_intersect(a, b, c - h, c + h));
    }
    polygon_contains_point(vertices, ellipse.position())
        || polygon::edges(vertices).any(|(a, b)| segment_ellipse(a, b, ellipse))
}

fn circle_polygon(circle: &Circle, vertices: &[Vec2]) -> bool {
    let center = circle.position();
    polygon_contains_point(vertices, center)
        || polygon::edges(vertices)
            .any(|(a, b)| math::point_segment_distance(center, a, b) <= circle.radius() + EPSILON)
}

fn polygons_intersect(a: &[Vec2], b: &[Vec2]) -> bool {
    let crossing = polygon::edges(a)
        .any(|(a1, a2)| polygon::edges(b).any(|(b1, b2)| segments_intersect(a1, a2, b1, b2)));
    crossing || polygon_contains_point(a, b[0]) || polygon_contains_point(b, a[0])
}

fn polygon_contains_circle(vertices: &[Vec2], circle: &Circle) -> bool {
    let center = circle.position();
    polygon_contains_point(vertices, center)
        && polygon::edges(vertices)
            .all(|(a, b)| math::point_segment_distance(center, a, b) >= circle.radius() - EPSILON)
}

/// Every vertex and edge midpoint of `inner` inside `outer`, and no edge of
/// `inner` properly crossing an edge of `outer`.
fn polygon_contains_polygon(outer: &[Vec2], inner: &[Vec2]) -> bool {
    let inside = polygon::edges(inner).all(|(a, b)| {
        polygon_contains_point(outer, a) && polygon_contains_point(outer, (a + b) * 0.5)
    });
    inside
        && !polygon::edges(inner)
            .any(|(a1, a2)| polygon::edges(outer).any(|(b1, b2)| properly_cross(a1, a2, b1, b2)))
}

/// Crossing at a single interior point of both segments.
fn properly_cross(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let side = |p: Vec2, q: Vec2, r: Vec2| (q - p).perp_dot(r - p);
    let d1 = side(a1, a2, b1);
    let d2 = side(a1, a2, b2);
    let d3 = side(b1, b2, a1);
    let d4 = side(b1, b2, a2);
    d1 * d2 < -EPSILON && d3 * d4 < -EPSILON
}
