//! Two-pass contact solver: positional correction, then velocity impulses.

use glam::Vec2;
use hecs::Entity;

use super::contact::ContactData;
use super::rigid_body::RigidBody;

/// How the material coefficients of two bodies are merged for one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineRule {
    #[default]
    Average,
    Min,
    Max,
    Multiply,
}

impl CombineRule {
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Average => (a + b) * 0.5,
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Multiply => a * b,
        }
    }
}

/// Copy of the body state the solvers read, taken before any write.
struct BodySnapshot {
    inv_mass: f32,
    velocity: Vec2,
    restitution: f32,
    static_friction: f32,
    kinetic_friction: f32,
}

impl BodySnapshot {
    fn from_rb(rb: &RigidBody) -> Self {
        Self {
            inv_mass: rb.effective_inverse_mass(),
            velocity: rb.velocity(),
            restitution: rb.restitution(),
            static_friction: rb.static_friction(),
            kinetic_friction: rb.kinetic_friction(),
        }
    }
}

fn snapshot(bodies: &hecs::World, entity: Entity) -> Option<BodySnapshot> {
    bodies
        .get::<&RigidBody>(entity)
        .ok()
        .map(|rb| BodySnapshot::from_rb(&rb))
}

fn snapshots(bodies: &hecs::World, contact: &ContactData) -> Option<(BodySnapshot, BodySnapshot)> {
    let one = snapshot(bodies, contact.body_one)?;
    let two = snapshot(bodies, contact.body_two)?;
    // Both immovable
    if one.inv_mass + two.inv_mass <= 0.0 {
        return None;
    }
    Some((one, two))
}

fn add_velocity(bodies: &mut hecs::World, entity: Entity, delta: Vec2) {
    if let Ok(mut rb) = bodies.get::<&mut RigidBody>(entity) {
        let velocity = rb.velocity() + delta;
        rb.set_velocity(velocity);
    }
}

/// Push the bodies apart along the contact normal.
///
/// `correction` of the penetration beyond `slop` is removed, shared in
/// proportion to each body's inverse mass. Static and sleeping bodies never
/// move.
pub fn solve_position(bodies: &mut hecs::World, contact: &ContactData, correction: f32, slop: f32) {
    let Some((one, two)) = snapshots(bodies, contact) else {
        return;
    };
    let depth = (contact.penetration - slop).max(0.0) * correction;
    if depth <= 0.0 {
        return;
    }

    let total = one.inv_mass + two.inv_mass;
    let push = contact.normal * depth / total;
    if let Ok(mut rb) = bodies.get::<&mut RigidBody>(contact.body_one) {
        if one.inv_mass > 0.0 {
            rb.translate(push * one.inv_mass);
        }
    }
    if let Ok(mut rb) = bodies.get::<&mut RigidBody>(contact.body_two) {
        if two.inv_mass > 0.0 {
            rb.translate(-push * two.inv_mass);
        }
    }
}

/// Push apart the bodies of every pair once.
///
/// `contacts` is narrow-phase output, where the contacts of one pair are
/// adjacent. Each pair is corrected by its deepest contact only, so a box
/// touching at two corners is not pushed out twice.
pub fn solve_positions(
    bodies: &mut hecs::World,
    contacts: &[ContactData],
    correction: f32,
    slop: f32,
) {
    let same_pair =
        |a: &ContactData, b: &ContactData| a.body_one == b.body_one && a.body_two == b.body_two;
    for manifold in contacts.chunk_by(same_pair) {
        let deepest = manifold
            .iter()
            .max_by(|a, b| a.penetration.total_cmp(&b.penetration));
        if let Some(contact) = deepest {
            solve_position(bodies, contact, correction, slop);
        }
    }
}

/// Apply the normal impulse and Coulomb friction for one contact.
///
/// Separating bodies are left alone. The friction impulse stays inside the
/// static cone when it can; otherwise kinetic friction opposes the sliding.
pub fn solve_velocity(
    bodies: &mut hecs::World,
    contact: &ContactData,
    restitution_rule: CombineRule,
    friction_rule: CombineRule,
) {
    let Some((one, two)) = snapshots(bodies, contact) else {
        return;
    };
    let normal = contact.normal;
    let inv_mass_sum = one.inv_mass + two.inv_mass;

    let relative = one.velocity - two.velocity;
    let closing = relative.dot(normal);
    if closing > 0.0 {
        return;
    }

    let restitution = restitution_rule.combine(one.restitution, two.restitution);
    let j = -(1.0 + restitution) * closing / inv_mass_sum;
    let impulse = normal * j;
    let mut v1 = one.velocity + impulse * one.inv_mass;
    let mut v2 = two.velocity - impulse * two.inv_mass;

    let relative = v1 - v2;
    let tangent = relative - normal * relative.dot(normal);
    if let Some(tangent) = crate::math::try_normalize(tangent) {
        let jt = -relative.dot(tangent) / inv_mass_sum;
        let mu_static = friction_rule.combine(one.static_friction, two.static_friction);
        let friction = if jt.abs() <= j * mu_static {
            tangent * jt
        } else {
            let mu_kinetic = friction_rule.combine(one.kinetic_friction, two.kinetic_friction);
            tangent * (-j * mu_kinetic)
        };
        v1 += friction * one.inv_mass;
        v2 -= friction * two.inv_mass;
    }

    add_velocity(bodies, contact.body_one, v1 - one.velocity);
    add_velocity(bodies, contact.body_two, v2 - two.velocity);
}
