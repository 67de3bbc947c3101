use std::collections::BTreeSet;

use glam::Vec2;
use hecs::Entity;
use tracing::debug;

use crate::error::ForceError;
use crate::math;
use crate::physics::rigid_body::RigidBody;

use super::ForceGenerator;

/// Velocity dependent drag, `k1 |v| + k2 |v|^2` against the motion.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    /// linear coefficient
    pub k1: f32,
    /// quadratic coefficient
    pub k2: f32,
    bodies: BTreeSet<Entity>,
}

impl Drag {
    pub fn new(k1: f32, k2: f32) -> Self {
        Self {
            k1,
            k2,
            bodies: BTreeSet::new(),
        }
    }

    pub fn attach(&mut self, entity: Entity) -> bool {
        self.bodies.insert(entity)
    }

    pub fn detach(&mut self, entity: Entity) -> bool {
        self.bodies.remove(&entity)
    }

    pub fn attached(&self) -> impl Iterator<Item = Entity> + '_ {
        self.bodies.iter().copied()
    }

    /// Drag impulse for a body moving at `velocity`, zero when at rest.
    pub fn impulse_for(&self, velocity: Vec2) -> Vec2 {
        let Some(direction) = math::try_normalize(velocity) else {
            return Vec2::ZERO;
        };
        let speed = velocity.length();
        let coeff = self.k1 * speed + self.k2 * speed * speed;
        -direction * coeff
    }
}

impl ForceGenerator for Drag {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn update(&mut self, bodies: &mut hecs::World, _dt: f32) {
        for &entity in &self.bodies {
            let Ok(mut rb) = bodies.get::<&mut RigidBody>(entity) else {
                debug!(?entity, "drag target has no rigid body");
                continue;
            };
            if !rb.is_active() || rb.is_static() {
                continue;
            }
            let impulse = self.impulse_for(rb.velocity());
            if impulse != Vec2::ZERO {
                rb.apply_impulse(impulse);
            }
        }
    }

    fn register(&mut self, entity: Entity) -> Result<bool, ForceError> {
        Ok(self.attach(entity))
    }

    fn unregister(&mut self, entity: Entity) -> Result<bool, ForceError> {
        Ok(self.detach(entity))
    }

    fn is_attached_to(&self, entity: Entity) -> bool {
        self.bodies.contains(&entity)
    }

    fn forget(&mut self, entity: Entity) {
        self.detach(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::math::vec_approx_eq;

    #[test]
    fn test_drag_coefficients() {
        let drag = Drag::new(0.5, 0.25);
        // |v| = 2: 0.5 * 2 + 0.25 * 4 = 2
        assert!(vec_approx_eq(drag.impulse_for(Vec2::new(2.0, 0.0)), Vec2::new(-2.0, 0.0)));
        assert_eq!(drag.impulse_for(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_drag_skips_resting_body() {
        let mut world = hecs::World::new();
        let moving = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 1.0)
            .with_velocity(Vec2::new(0.0, -3.0)),));
        let resting = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 1.0),));
        let mut drag = Drag::new(1.0, 0.0);
        drag.register(moving).unwrap();
        drag.register(resting).unwrap();
        drag.update(&mut world, 0.1);
        assert_eq!(
            world.get::<&RigidBody>(resting).unwrap().pending_impulse(),
            Vec2::ZERO
        );

        let mut rb = world.get::<&mut RigidBody>(moving).unwrap();
        assert!(rb.forces().is_empty());
        // |v| = 3 with k1 = 1 removes the whole velocity in one tick
        rb.integrate(1.0 / 60.0);
        assert!(vec_approx_eq(rb.velocity(), Vec2::ZERO));
    }

    #[test]
    fn test_drag_is_a_velocity_change() {
        let mut world = hecs::World::new();
        let heavy = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 5.0)
            .with_velocity(Vec2::new(4.0, 0.0)),));
        let mut drag = Drag::new(0.25, 0.0);
        drag.register(heavy).unwrap();
        drag.update(&mut world, 1.0 / 60.0);

        let mut rb = world.get::<&mut RigidBody>(heavy).unwrap();
        rb.integrate(1.0 / 60.0);
        // independent of mass and dt: 4 - 0.25 * 4
        assert!(vec_approx_eq(rb.velocity(), Vec2::new(3.0, 0.0)));
    }
}
