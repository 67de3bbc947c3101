//! Rigid body component and its integrator.

use glam::Vec2;
use tracing::warn;

use crate::geometry::{Aabb, Rectangle, Shape};

/// A force that stays applied for `remaining` more seconds.
///
/// A force added with a duration of zero is applied on the next tick only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedForce {
    pub force: Vec2,
    pub remaining: f32,
}

/// Rigid body component.
///
/// A mass of zero marks the body as static: it never integrates and the
/// contact solvers treat it as immovable. The collision shape is kept
/// centred on [`RigidBody::position`].
#[derive(Debug, Clone)]
pub struct RigidBody {
    mass: f32,
    inverse_mass: f32,
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    /// Per-axis gravity scale (default: (1, 1)).
    gravity_modifier: Vec2,
    /// Coefficient of restitution (0.0 - 1.0).
    restitution: f32,
    static_friction: f32,
    kinetic_friction: f32,
    /// Fraction of velocity removed per tick (0.0 - 1.0).
    damping: f32,
    active: bool,
    forces: Vec<TimedForce>,
    impulse: Vec2,
    shape: Shape,
}

impl RigidBody {
    /// Create a dynamic body. A mass that is not a positive finite number
    /// yields a static body instead.
    pub fn new_dynamic(shape: impl Into<Shape>, mass: f32) -> Self {
        let mut body = Self::new_static(shape);
        if mass.is_finite() && mass > 0.0 {
            body.mass = mass;
            body.inverse_mass = 1.0 / mass;
        } else {
            warn!(mass, "non-positive mass, creating a static body");
        }
        body
    }

    /// Create an immovable body.
    pub fn new_static(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Self {
            mass: 0.0,
            inverse_mass: 0.0,
            position: shape.position(),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravity_modifier: Vec2::ONE,
            restitution: 0.3,
            static_friction: 0.5,
            kinetic_friction: 0.3,
            damping: 0.0,
            active: true,
            forces: Vec::new(),
            impulse: Vec2::ZERO,
            shape,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.set_velocity(velocity);
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    pub fn with_friction(mut self, static_friction: f32, kinetic_friction: f32) -> Self {
        self.set_friction(static_friction, kinetic_friction);
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.set_damping(damping);
        self
    }

    pub fn with_gravity_modifier(mut self, modifier: Vec2) -> Self {
        self.gravity_modifier = modifier;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Zero or negative makes the body static.
    pub fn set_mass(&mut self, mass: f32) {
        if mass.is_finite() && mass > 0.0 {
            self.mass = mass;
            self.inverse_mass = 1.0 / mass;
        } else {
            self.mass = 0.0;
            self.inverse_mass = 0.0;
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    /// Inverse mass as seen by the contact solvers: zero for static and
    /// sleeping bodies.
    pub fn effective_inverse_mass(&self) -> f32 {
        if self.active {
            self.inverse_mass
        } else {
            0.0
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the body and its collision shape.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.shape.set_position(position);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        if self.is_dynamic() {
            self.velocity = velocity;
        }
    }

    /// Acceleration computed by the last [`RigidBody::integrate`].
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn gravity_modifier(&self) -> Vec2 {
        self.gravity_modifier
    }

    pub fn set_gravity_modifier(&mut self, modifier: Vec2) {
        self.gravity_modifier = modifier;
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = restitution.clamp(0.0, 1.0);
    }

    pub fn static_friction(&self) -> f32 {
        self.static_friction
    }

    pub fn kinetic_friction(&self) -> f32 {
        self.kinetic_friction
    }

    pub fn set_friction(&mut self, static_friction: f32, kinetic_friction: f32) {
        self.static_friction = static_friction.max(0.0);
        self.kinetic_friction = kinetic_friction.max(0.0);
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop integrating this body. It stays in the world as an obstacle.
    pub fn sleep(&mut self) {
        self.active = false;
        self.velocity = Vec2::ZERO;
    }

    pub fn wake(&mut self) {
        self.active = true;
    }

    /// Queue `force` for `duration` seconds.
    pub fn apply_force(&mut self, force: Vec2, duration: f32) {
        if !force.is_finite() {
            warn!(?force, "ignoring non-finite force");
            return;
        }
        self.forces.push(TimedForce {
            force,
            remaining: duration.max(0.0),
        });
    }

    /// Accumulate an instantaneous velocity change, applied on the next tick.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if !impulse.is_finite() {
            warn!(?impulse, "ignoring non-finite impulse");
            return;
        }
        self.impulse += impulse;
    }

    pub fn forces(&self) -> &[TimedForce] {
        &self.forces
    }

    /// Sum of the currently queued forces.
    pub fn net_force(&self) -> Vec2 {
        self.forces.iter().map(|f| f.force).sum()
    }

    pub fn pending_impulse(&self) -> Vec2 {
        self.impulse
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
        self.impulse = Vec2::ZERO;
    }

    pub fn collision_shape(&self) -> &Shape {
        &self.shape
    }

    /// Replace the collision shape, recentred on the body.
    pub fn set_collision_shape(&mut self, shape: impl Into<Shape>) {
        let mut shape = shape.into();
        shape.set_position(self.position);
        self.shape = shape;
    }

    /// Axis-aligned box around the collision shape.
    pub fn bounds(&self) -> Aabb {
        self.shape.bounds()
    }

    pub fn bounding_rectangle(&self) -> Rectangle {
        Rectangle::from(self.bounds())
    }

    /// Advance one tick with semi-implicit Euler.
    ///
    /// Queued forces set the acceleration, then velocity is updated and
    /// damped before moving the body. Pending impulses are applied after the
    /// move, and timed forces age by `dt`.
    pub fn integrate(&mut self, dt: f32) {
        if !self.active || self.is_static() {
            self.forces.clear();
            self.impulse = Vec2::ZERO;
            return;
        }

        self.acceleration = self.net_force() * self.inverse_mass;
        self.velocity += self.acceleration * dt;
        self.velocity *= 1.0 - self.damping;
        let position = self.position + self.velocity * dt;
        self.set_position(position);

        self.velocity += self.impulse;
        self.impulse = Vec2::ZERO;

        for force in &mut self.forces {
            force.remaining -= dt;
        }
        self.forces.retain(|f| f.remaining > 0.0);
    }
}
