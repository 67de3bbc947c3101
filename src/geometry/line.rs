use glam::Vec2;

use super::{Aabb, Style};
use crate::math::{self, EPSILON};

/// Classification of two line segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection {
    /// The segments do not meet.
    None,
    /// The segments cross at exactly one point.
    One(Vec2),
    /// The segments are parallel and lie on distinct lines.
    Parallel,
    /// The segments lie on the same infinite line (they may or may not overlap).
    Colinear,
}

/// Classify the segments `a1..a2` and `b1..b2` with the parametric
/// `ua`/`ub` formulation.
///
/// A zero-length segment is treated as a point: it either lies on the other
/// segment (`One`) or not (`None`).
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> LineIntersection {
    let da = a2 - a1;
    let db = b2 - b1;
    let len_a = da.length();
    let len_b = db.length();

    if len_a <= EPSILON || len_b <= EPSILON {
        let (p, s1, s2) = if len_a <= EPSILON {
            (a1, b1, b2)
        } else {
            (b1, a1, a2)
        };
        return if math::point_segment_distance(p, s1, s2) <= EPSILON {
            LineIntersection::One(p)
        } else {
            LineIntersection::None
        };
    }

    let denom = db.y * da.x - db.x * da.y;
    let num_a = db.x * (a1.y - b1.y) - db.y * (a1.x - b1.x);
    let num_b = da.x * (a1.y - b1.y) - da.y * (a1.x - b1.x);

    // |denom| = |da||db| sin(angle between them)
    if denom.abs() <= EPSILON * len_a * len_b {
        let offset = da.perp_dot(b1 - a1).abs() / len_a;
        return if offset <= EPSILON {
            LineIntersection::Colinear
        } else {
            LineIntersection::Parallel
        };
    }

    let ua = num_a / denom;
    let ub = num_b / denom;
    let tol_a = EPSILON / len_a;
    let tol_b = EPSILON / len_b;

    if (-tol_a..=1.0 + tol_a).contains(&ua) && (-tol_b..=1.0 + tol_b).contains(&ub) {
        LineIntersection::One(a1 + da * ua.clamp(0.0, 1.0))
    } else {
        LineIntersection::None
    }
}

/// Signed distance of `p` from the infinite line through `a` and `b`.
fn side(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return 0.0;
    }
    ab.perp_dot(p - a) / len
}

fn sign(value: f32) -> i8 {
    if value > EPSILON {
        1
    } else if value < -EPSILON {
        -1
    } else {
        0
    }
}

/// Boolean segment test, touching counts.
///
/// Built from the four orientation tests so the result does not depend on
/// operand order.
pub(crate) fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let len_a = a1.distance(a2);
    let len_b = b1.distance(b2);
    if len_a <= EPSILON {
        return math::point_segment_distance(a1, b1, b2) <= EPSILON;
    }
    if len_b <= EPSILON {
        return math::point_segment_distance(b1, a1, a2) <= EPSILON;
    }

    let o1 = sign(side(a1, a2, b1));
    let o2 = sign(side(a1, a2, b2));
    let o3 = sign(side(b1, b2, a1));
    let o4 = sign(side(b1, b2, a2));

    if o1 == 0 && o2 == 0 && o3 == 0 && o4 == 0 {
        return colinear_overlap(a1, a2, b1, b2);
    }

    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }

    // Any remaining contact has an endpoint resting on the other segment.
    math::point_segment_distance(b1, a1, a2) <= EPSILON
        || math::point_segment_distance(b2, a1, a2) <= EPSILON
        || math::point_segment_distance(a1, b1, b2) <= EPSILON
        || math::point_segment_distance(a2, b1, b2) <= EPSILON
}

/// Interval overlap of two segments on a common line.
fn colinear_overlap(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    // Project onto the longer segment so the result is order independent.
    let (p1, p2, q1, q2) = if a1.distance_squared(a2) >= b1.distance_squared(b2) {
        (a1, a2, b1, b2)
    } else {
        (b1, b2, a1, a2)
    };
    let axis = p2 - p1;
    let len = axis.length();
    let dir = axis / len;
    let t1 = (q1 - p1).dot(dir);
    let t2 = (q2 - p1).dot(dir);
    let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    hi >= -EPSILON && lo <= len + EPSILON
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: Vec2,
    end: Vec2,
    style: Style,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            style: Style::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn set_start(&mut self, start: Vec2) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: Vec2) {
        self.end = end;
    }

    /// Midpoint of the segment.
    pub fn position(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position();
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.end - self.start).abs() * 0.5
    }

    pub fn area(&self) -> f32 {
        0.0
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit vector from start to end, zero for a degenerate segment.
    pub fn direction(&self) -> Vec2 {
        math::try_normalize(self.end - self.start).unwrap_or(Vec2::ZERO)
    }

    /// Left-hand unit normal, zero for a degenerate segment.
    pub fn normal(&self) -> Vec2 {
        self.direction().perp()
    }

    /// `dy / dx`, `None` for vertical segments.
    pub fn slope(&self) -> Option<f32> {
        let d = self.end - self.start;
        if math::approx_zero(d.x) {
            None
        } else {
            Some(d.y / d.x)
        }
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        math::closest_point_on_segment(point, self.start, self.end)
    }

    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        math::point_segment_distance(point, self.start, self.end)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.start, self.end)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.distance_to_point(point) <= EPSILON
    }

    pub fn intersection(&self, other: &Line) -> LineIntersection {
        segment_intersection(self.start, self.end, other.start, other.end)
    }

    pub fn intersects_line(&self, other: &Line) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
}
