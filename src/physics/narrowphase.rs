//! Narrowphase collision detection: dedicated tests for circles, lines and
//! rectangles, the shape predicates for everything else.
//!
//! Rectangles resting on a face report a contact at each end of the touching
//! span, so one pair can yield two contacts. They share a normal and depth.

use glam::Vec2;
use tracing::{debug, trace};

use crate::geometry::{Aabb, Circle, Line, Rectangle, Shape};
use crate::math::{self, EPSILON};

use super::contact::{ContactData, ContactGeometry, ContactPair};
use super::rigid_body::RigidBody;

/// Circle-circle test. Coincident centres get an arbitrary upward normal.
pub fn circle_circle(one: &Circle, two: &Circle) -> Option<ContactGeometry> {
    let diff = one.position() - two.position();
    let radii = one.radius() + two.radius();
    let dist = diff.length();
    if dist > radii + EPSILON {
        return None;
    }

    let normal = math::try_normalize(diff).unwrap_or(Vec2::Y);
    Some(ContactGeometry {
        normal,
        penetration: (radii - dist).max(0.0),
        point: two.position() + normal * two.radius(),
    })
}

/// Circle against a line segment; the normal points from the segment to the
/// circle.
pub fn circle_line(circle: &Circle, line: &Line) -> Option<ContactGeometry> {
    let closest = line.closest_point(circle.position());
    let diff = circle.position() - closest;
    let dist = diff.length();
    if dist > circle.radius() + EPSILON {
        return None;
    }

    let normal = math::try_normalize(diff)
        .or_else(|| math::try_normalize(line.normal()))
        .unwrap_or(Vec2::Y);
    Some(ContactGeometry {
        normal,
        penetration: (circle.radius() - dist).max(0.0),
        point: closest,
    })
}

/// Circle against a rectangle; the normal points from the rectangle to the
/// circle.
pub fn circle_rectangle(circle: &Circle, rect: &Rectangle) -> Option<ContactGeometry> {
    let half = rect.half_extents();
    let diff = circle.position() - rect.position();
    let mut closest = diff.clamp(-half, half);

    let inside = closest == diff;
    if inside {
        // Centre is inside: push out through the nearest face.
        let gap = half - diff.abs();
        if gap.x < gap.y {
            closest.x = if diff.x >= 0.0 { half.x } else { -half.x };
        } else {
            closest.y = if diff.y >= 0.0 { half.y } else { -half.y };
        }
    }

    let offset = diff - closest;
    let dist = offset.length();
    if !inside && dist > circle.radius() + EPSILON {
        return None;
    }

    let (normal, penetration) = if inside {
        let outward = math::try_normalize(-offset).unwrap_or(Vec2::Y);
        (outward, circle.radius() + dist)
    } else {
        let normal = math::try_normalize(offset).unwrap_or(Vec2::Y);
        (normal, (circle.radius() - dist).max(0.0))
    };
    Some(ContactGeometry {
        normal,
        penetration,
        point: rect.position() + closest,
    })
}

/// Separating axis test on x, y and the segment normal. The normal points
/// from the segment to the rectangle.
///
/// The contacts are the ends of the part of the segment inside the
/// rectangle; a segment that only grazes it gives a single contact.
pub fn rectangle_line(rect: &Rectangle, line: &Line) -> Vec<ContactGeometry> {
    let center = rect.position();
    let half = rect.half_extents();
    let mut axes = vec![Vec2::X, Vec2::Y];
    if let Some(n) = math::try_normalize(line.normal()) {
        axes.push(n);
    }

    // Smallest push of the rectangle along any axis, with its direction.
    let mut best: Option<(f32, Vec2)> = None;
    for axis in axes {
        let radius = half.x * axis.x.abs() + half.y * axis.y.abs();
        let c = center.dot(axis);
        let (s, e) = (line.start().dot(axis), line.end().dot(axis));
        let (seg_min, seg_max) = (s.min(e), s.max(e));
        let (rect_min, rect_max) = (c - radius, c + radius);
        if rect_max < seg_min - EPSILON || seg_max < rect_min - EPSILON {
            return Vec::new();
        }
        let push_back = rect_max - seg_min;
        let push_forward = seg_max - rect_min;
        let candidate = if push_forward <= push_back {
            (push_forward, axis)
        } else {
            (push_back, -axis)
        };
        if best.map_or(true, |(depth, _)| candidate.0 < depth) {
            best = Some(candidate);
        }
    }

    let Some((depth, normal)) = best else {
        return Vec::new();
    };
    let contact = ContactGeometry {
        normal,
        penetration: depth.max(0.0),
        point: rect.clamp_point(line.closest_point(center)),
    };
    match clip_segment(&rect.bounds(), line.start(), line.end()) {
        Some((start, end)) => manifold(contact, start, end),
        None => vec![contact],
    }
}

/// Least-penetration axis of two boxes, with a contact at each end of the
/// overlap along the face of `two` that `one` is pushed out of.
pub fn rectangle_rectangle(one: &Rectangle, two: &Rectangle) -> Vec<ContactGeometry> {
    let (a, b) = (one.bounds(), two.bounds());
    let Some(contact) = aabb_contact(&a, &b) else {
        return Vec::new();
    };
    let Some(region) = a.intersection(&b) else {
        return vec![contact];
    };

    let (start, end) = if contact.normal.x == 0.0 {
        let y = if contact.normal.y > 0.0 { b.max.y } else { b.min.y };
        (Vec2::new(region.min.x, y), Vec2::new(region.max.x, y))
    } else {
        let x = if contact.normal.x > 0.0 { b.max.x } else { b.min.x };
        (Vec2::new(x, region.min.y), Vec2::new(x, region.max.y))
    };
    manifold(contact, start, end)
}

/// One contact per end of `start`-`end`, or a single one at its middle when
/// the span is a point.
fn manifold(contact: ContactGeometry, start: Vec2, end: Vec2) -> Vec<ContactGeometry> {
    if start.distance(end) <= EPSILON {
        return vec![ContactGeometry {
            point: (start + end) * 0.5,
            ..contact
        }];
    }
    vec![
        ContactGeometry {
            point: start,
            ..contact
        },
        ContactGeometry {
            point: end,
            ..contact
        },
    ]
}

/// Part of the segment `a`-`b` inside `bounds` (Liang-Barsky).
fn clip_segment(bounds: &Aabb, a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let (mut enter, mut exit) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-d.x, a.x - bounds.min.x),
        (d.x, bounds.max.x - a.x),
        (-d.y, a.y - bounds.min.y),
        (d.y, bounds.max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            enter = enter.max(q / p);
        } else {
            exit = exit.min(q / p);
        }
    }
    (enter <= exit).then(|| (a + d * enter, a + d * exit))
}

/// Contact from the minimum-overlap axis of two boxes, normal from `two`
/// toward `one`.
fn aabb_contact(one: &Aabb, two: &Aabb) -> Option<ContactGeometry> {
    let diff = one.center() - two.center();
    let overlap = one.half_extents() + two.half_extents() - diff.abs();
    if overlap.x < -EPSILON || overlap.y < -EPSILON {
        return None;
    }

    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(if diff.x < 0.0 { -1.0 } else { 1.0 }, 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, if diff.y < 0.0 { -1.0 } else { 1.0 }), overlap.y)
    };
    let point = one
        .intersection(two)
        .map_or_else(|| (one.center() + two.center()) * 0.5, |region| region.center());
    Some(ContactGeometry {
        normal,
        penetration: penetration.max(0.0),
        point,
    })
}

/// Contacts between two shapes, normals pointing from `two` toward `one`.
///
/// Pairs without a dedicated routine use the exact intersection predicate
/// and take the contact from their bounding boxes.
pub fn detect_contacts(one: &Shape, two: &Shape) -> Vec<ContactGeometry> {
    let flip = |contacts: Vec<ContactGeometry>| -> Vec<ContactGeometry> {
        contacts.into_iter().map(ContactGeometry::flipped).collect()
    };
    match (one, two) {
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle(a, b).into_iter().collect(),
        (Shape::Circle(c), Shape::Line(l)) => circle_line(c, l).into_iter().collect(),
        (Shape::Line(l), Shape::Circle(c)) => flip(circle_line(c, l).into_iter().collect()),
        (Shape::Circle(c), Shape::Rectangle(r)) => circle_rectangle(c, r).into_iter().collect(),
        (Shape::Rectangle(r), Shape::Circle(c)) => {
            flip(circle_rectangle(c, r).into_iter().collect())
        }
        (Shape::Rectangle(r), Shape::Line(l)) => rectangle_line(r, l),
        (Shape::Line(l), Shape::Rectangle(r)) => flip(rectangle_line(r, l)),
        (Shape::Rectangle(a), Shape::Rectangle(b)) => rectangle_rectangle(a, b),
        _ => {
            if one.intersects(two) {
                aabb_contact(&one.bounds(), &two.bounds()).into_iter().collect()
            } else {
                Vec::new()
            }
        }
    }
}

/// Run [`detect_contacts`] on every candidate pair.
///
/// The pair's first entity is body one. Contacts from the same pair are
/// adjacent in the result. Pairs that no longer refer to two
/// live bodies are skipped.
pub fn narrow_phase(pairs: &[ContactPair], bodies: &hecs::World) -> Vec<ContactData> {
    let mut contacts = Vec::new();
    for pair in pairs {
        let (one, two) = (pair.first(), pair.second());
        let (Ok(body_one), Ok(body_two)) = (
            bodies.get::<&RigidBody>(one),
            bodies.get::<&RigidBody>(two),
        ) else {
            debug!(?pair, "skipping pair without two rigid bodies");
            continue;
        };
        contacts.extend(
            detect_contacts(body_one.collision_shape(), body_two.collision_shape())
                .into_iter()
                .map(|geometry| ContactData::new(one, two, geometry)),
        );
    }
    trace!(contacts = contacts.len(), "narrowphase");
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Polygon, Triangle};
    use crate::math::{approx_eq, vec_approx_eq};

    #[test]
    fn test_circle_circle_intersection() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(1.5, 0.0), 1.0);
        let c = circle_circle(&a, &b).unwrap();
        assert!(approx_eq(c.penetration, 0.5));
        // from b toward a
        assert!(vec_approx_eq(c.normal, Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_circle_circle_no_intersection() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(5.0, 0.0), 1.0);
        assert!(circle_circle(&a, &b).is_none());
    }

    #[test]
    fn test_coincident_circles_have_a_normal() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let c = circle_circle(&a, &a).unwrap();
        assert_eq!(c.normal, Vec2::Y);
        assert!(approx_eq(c.penetration, 2.0));
    }

    #[test]
    fn test_circle_line() {
        let ground = Line::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        let ball = Circle::new(Vec2::new(2.0, 0.75), 1.0);
        let c = circle_line(&ball, &ground).unwrap();
        assert!(vec_approx_eq(c.normal, Vec2::Y));
        assert!(approx_eq(c.penetration, 0.25));
        assert!(vec_approx_eq(c.point, Vec2::new(2.0, 0.0)));

        let high = Circle::new(Vec2::new(2.0, 3.0), 1.0);
        assert!(circle_line(&high, &ground).is_none());
    }

    #[test]
    fn test_circle_rectangle_outside_and_inside() {
        let rect = Rectangle::new(Vec2::ZERO, Vec2::new(2.0, 1.0));
        let above = Circle::new(Vec2::new(0.5, 1.5), 1.0);
        let c = circle_rectangle(&above, &rect).unwrap();
        assert!(vec_approx_eq(c.normal, Vec2::Y));
        assert!(approx_eq(c.penetration, 0.5));

        // centre just inside the right face
        let deep = Circle::new(Vec2::new(1.8, 0.0), 0.5);
        let c = circle_rectangle(&deep, &rect).unwrap();
        assert!(vec_approx_eq(c.normal, Vec2::X));
        assert!(approx_eq(c.penetration, 0.7));

        let far = Circle::new(Vec2::new(5.0, 0.0), 1.0);
        assert!(circle_rectangle(&far, &rect).is_none());
    }

    #[test]
    fn test_rectangle_line_sat() {
        let rect = Rectangle::new(Vec2::new(0.0, 0.4), Vec2::splat(0.5));
        let floor = Line::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        let contacts = rectangle_line(&rect, &floor);
        assert_eq!(contacts.len(), 2);
        for c in &contacts {
            assert!(vec_approx_eq(c.normal, Vec2::Y));
            assert!(approx_eq(c.penetration, 0.1));
        }

        let slope = Line::new(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0));
        let clear = Rectangle::new(Vec2::new(3.0, -3.0), Vec2::splat(0.5));
        assert!(rectangle_line(&clear, &slope).is_empty());
    }

    #[test]
    fn test_box_flat_on_line_touches_at_both_corners() {
        let rect = Rectangle::new(Vec2::new(0.0, 0.45), Vec2::splat(0.5));
        let floor = Line::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        let contacts = rectangle_line(&rect, &floor);
        assert_eq!(contacts.len(), 2);
        assert!(vec_approx_eq(contacts[0].point, Vec2::new(-0.5, 0.0)));
        assert!(vec_approx_eq(contacts[1].point, Vec2::new(0.5, 0.0)));

        // a post whose tip meets the bottom face touches at one spot
        let post = Line::new(Vec2::new(0.2, -1.0), Vec2::new(0.2, -0.05));
        let contacts = rectangle_line(&rect, &post);
        assert_eq!(contacts.len(), 1);
        assert!(vec_approx_eq(contacts[0].normal, Vec2::Y));
        assert!(approx_eq(contacts[0].penetration, 0.0));
    }

    #[test]
    fn test_rectangle_rectangle_least_axis() {
        let a = Rectangle::new(Vec2::new(0.0, 1.8), Vec2::splat(1.0));
        let b = Rectangle::new(Vec2::ZERO, Vec2::new(5.0, 1.0));
        let contacts = rectangle_rectangle(&a, &b);
        assert_eq!(contacts.len(), 2);
        for c in &contacts {
            assert!(vec_approx_eq(c.normal, Vec2::Y));
            assert!(approx_eq(c.penetration, 0.2));
        }
        let far = Rectangle::new(Vec2::new(10.0, 0.0), Vec2::splat(1.0));
        assert!(rectangle_rectangle(&far, &b).is_empty());
    }

    #[test]
    fn test_box_resting_on_ground_has_two_contacts() {
        let ground = Rectangle::new(Vec2::new(0.0, -0.5), Vec2::new(5.0, 0.5));
        let crate_box = Rectangle::new(Vec2::new(1.0, 0.45), Vec2::splat(0.5));
        let contacts = rectangle_rectangle(&crate_box, &ground);
        assert_eq!(contacts.len(), 2);
        assert!(vec_approx_eq(contacts[0].point, Vec2::new(0.5, 0.0)));
        assert!(vec_approx_eq(contacts[1].point, Vec2::new(1.5, 0.0)));

        // seen from the ground, the normals flip
        let reversed = detect_contacts(&Shape::from(ground), &Shape::from(crate_box));
        assert_eq!(reversed.len(), 2);
        assert!(vec_approx_eq(reversed[0].normal, -Vec2::Y));

        // pushed out sideways through the ground's right face
        let side = Rectangle::new(Vec2::new(5.45, -0.5), Vec2::new(0.5, 0.25));
        let contacts = rectangle_rectangle(&side, &ground);
        assert_eq!(contacts.len(), 2);
        assert!(vec_approx_eq(contacts[0].normal, Vec2::X));
        assert!(vec_approx_eq(contacts[0].point, Vec2::new(5.0, -0.75)));
        assert!(vec_approx_eq(contacts[1].point, Vec2::new(5.0, -0.25)));
    }

    #[test]
    fn test_detect_contacts_flips_reversed_pairs() {
        let ball: Shape = Circle::new(Vec2::new(0.0, 0.75), 1.0).into();
        let floor: Shape = Line::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)).into();
        let forward = detect_contacts(&ball, &floor);
        let reversed = detect_contacts(&floor, &ball);
        assert_eq!(forward.len(), 1);
        assert_eq!(reversed.len(), 1);
        assert!(vec_approx_eq(forward[0].normal, -reversed[0].normal));
    }

    #[test]
    fn test_fallback_uses_shape_predicate() {
        let tri: Shape = Triangle::new(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0))
            .unwrap()
            .into();
        // Bounding boxes overlap but the shapes do not touch.
        let corner: Shape = Polygon::regular(Vec2::new(3.8, 3.8), 0.5, 4).unwrap().into();
        assert!(detect_contacts(&corner, &tri).is_empty());

        let inside: Shape = Polygon::regular(Vec2::new(1.0, 1.0), 0.5, 4).unwrap().into();
        let contacts = detect_contacts(&inside, &tri);
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].penetration > 0.0);
        assert!(approx_eq(contacts[0].normal.length(), 1.0));
    }
}
