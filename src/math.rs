//! Scalar and vector helpers shared by geometry and physics.
//!
//! `glam::Vec2` and `glam::Vec3` are the vector types throughout the crate.
//! Every floating point comparison goes through [`approx_eq`] so boundary
//! cases behave the same in every predicate.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Tolerance used for all geometric equality tests.
pub const EPSILON: f32 = 1e-4;

/// `|a - b| <= EPSILON`.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() <= EPSILON
}

/// Component-wise [`approx_eq`].
#[inline]
pub fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// Normalize `v`, or `None` when it is too short to have a direction.
#[inline]
pub fn try_normalize(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    if len <= EPSILON || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}

/// Closest point to `p` on the segment `a..b`.
///
/// The projection scalar is clamped to `[0, 1]`; a zero-length segment
/// collapses to `a`.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Euclidean distance from `p` to the segment `a..b`.
#[inline]
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Wrap an angle in radians into `(-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Direction angle of `v` in `(-PI, PI]`.
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    normalize_angle(v.y.atan2(v.x))
}

/// Z component of the 3D cross product `a x b`.
#[inline]
pub fn cross_z(a: Vec3, b: Vec3) -> f32 {
    a.cross(b).z
}

/// Lift a 2D vector onto the z = 0 plane.
#[inline]
pub fn lift(v: Vec2) -> Vec3 {
    v.extend(0.0)
}
