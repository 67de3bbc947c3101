//! Force generators acting on rigid bodies.
//!
//! Gravity and drag act on a set of registered bodies. Springs, rods and
//! cables join exactly two bodies fixed at construction and refuse
//! registration.

mod cable;
mod drag;
mod gravity;
mod rod;
mod spring;

pub use cable::Cable;
pub use drag::Drag;
pub use gravity::Gravity;
pub use rod::Rod;
pub use spring::Spring;

use glam::Vec2;
use hecs::Entity;
use tracing::debug;

use crate::error::ForceError;

use super::rigid_body::RigidBody;

/// Something that pushes bodies around once per tick.
pub trait ForceGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Apply this generator's effect for one tick of `dt` seconds.
    fn update(&mut self, bodies: &mut hecs::World, dt: f32);

    /// Start acting on `entity`. Returns `Ok(false)` if it was already
    /// registered.
    fn register(&mut self, entity: Entity) -> Result<bool, ForceError>;

    /// Stop acting on `entity`. Returns `Ok(false)` if it was not registered.
    fn unregister(&mut self, entity: Entity) -> Result<bool, ForceError>;

    fn is_attached_to(&self, entity: Entity) -> bool;

    /// Drop every reference to a body that left the world.
    fn forget(&mut self, entity: Entity);
}

/// State of one end of a two-body generator, read before anything is
/// written back.
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    position: Vec2,
    velocity: Vec2,
    inv_mass: f32,
}

impl Endpoint {
    fn from_rb(rb: &RigidBody) -> Self {
        Self {
            position: rb.position(),
            velocity: rb.velocity(),
            inv_mass: rb.effective_inverse_mass(),
        }
    }
}

fn endpoints(
    bodies: &hecs::World,
    generator: &'static str,
    one: Entity,
    two: Entity,
) -> Option<(Endpoint, Endpoint)> {
    let read = |e: Entity| {
        bodies
            .get::<&RigidBody>(e)
            .ok()
            .map(|rb| Endpoint::from_rb(&rb))
    };
    match (read(one), read(two)) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => {
            debug!(generator, ?one, ?two, "endpoint has no rigid body");
            None
        }
    }
}

/// Pull two endpoints back to `length` apart, shared by inverse mass.
///
/// `bounce` scales the velocity correction along the constraint axis; zero
/// only cancels the stretching velocity.
fn enforce_length(
    bodies: &mut hecs::World,
    (one, two): (Entity, Entity),
    (a, b): (Endpoint, Endpoint),
    length: f32,
    bounce: f32,
) {
    let total = a.inv_mass + b.inv_mass;
    let delta = a.position - b.position;
    let Some(normal) = crate::math::try_normalize(delta) else {
        return;
    };
    if total <= 0.0 {
        return;
    }

    let error = delta.length() - length;
    let relative = (a.velocity - b.velocity).dot(normal);
    // Only cancel motion that makes the error worse.
    let j = if relative * error > 0.0 {
        -(1.0 + bounce) * relative / total
    } else {
        0.0
    };

    if let Ok(mut rb) = bodies.get::<&mut RigidBody>(one) {
        if a.inv_mass > 0.0 {
            rb.translate(-normal * error * a.inv_mass / total);
            rb.set_velocity(a.velocity + normal * j * a.inv_mass);
        }
    }
    if let Ok(mut rb) = bodies.get::<&mut RigidBody>(two) {
        if b.inv_mass > 0.0 {
            rb.translate(normal * error * b.inv_mass / total);
            rb.set_velocity(b.velocity - normal * j * b.inv_mass);
        }
    }
}
