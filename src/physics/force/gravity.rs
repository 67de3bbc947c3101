use std::collections::BTreeSet;

use glam::Vec2;
use hecs::Entity;
use tracing::debug;

use crate::error::ForceError;
use crate::physics::rigid_body::RigidBody;

use super::ForceGenerator;

/// Constant acceleration, scaled per body by its gravity modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Gravity {
    acceleration: Vec2,
    bodies: BTreeSet<Entity>,
}

impl Gravity {
    pub fn new(acceleration: Vec2) -> Self {
        Self {
            acceleration,
            bodies: BTreeSet::new(),
        }
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
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

    /// Force this field exerts on `rb`.
    pub fn force_on(&self, rb: &RigidBody) -> Vec2 {
        self.acceleration * rb.gravity_modifier() * rb.mass()
    }
}

impl ForceGenerator for Gravity {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn update(&mut self, bodies: &mut hecs::World, _dt: f32) {
        for &entity in &self.bodies {
            let Ok(mut rb) = bodies.get::<&mut RigidBody>(entity) else {
                debug!(?entity, "gravity target has no rigid body");
                continue;
            };
            if rb.is_active() && rb.is_dynamic() {
                let force = self.force_on(&rb);
                rb.apply_force(force, 0.0);
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
    fn test_gravity_scaled_by_mass_and_modifier() {
        let mut world = hecs::World::new();
        let heavy = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 2.0),));
        let floaty = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 1.0)
            .with_gravity_modifier(Vec2::new(1.0, 0.5)),));
        let wall = world.spawn((RigidBody::new_static(Circle::new(Vec2::ZERO, 1.0)),));

        let mut gravity = Gravity::new(Vec2::new(0.0, -10.0));
        for e in [heavy, floaty, wall] {
            assert_eq!(gravity.register(e), Ok(true));
        }
        assert_eq!(gravity.register(heavy), Ok(false));
        gravity.update(&mut world, 1.0 / 60.0);

        let net = |e| world.get::<&RigidBody>(e).unwrap().net_force();
        assert!(vec_approx_eq(net(heavy), Vec2::new(0.0, -20.0)));
        assert!(vec_approx_eq(net(floaty), Vec2::new(0.0, -5.0)));
        assert!(vec_approx_eq(net(wall), Vec2::ZERO));
    }

    #[test]
    fn test_unregistered_body_untouched() {
        let mut world = hecs::World::new();
        let a = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 1.0),));
        let mut gravity = Gravity::new(Vec2::new(0.0, -10.0));
        gravity.register(a).unwrap();
        assert_eq!(gravity.unregister(a), Ok(true));
        assert_eq!(gravity.unregister(a), Ok(false));
        gravity.update(&mut world, 0.1);
        assert!(world.get::<&RigidBody>(a).unwrap().forces().is_empty());
    }

    #[test]
    fn test_despawned_body_skipped() {
        let mut world = hecs::World::new();
        let a = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 1.0),));
        let mut gravity = Gravity::new(Vec2::new(0.0, -10.0));
        gravity.attach(a);
        world.despawn(a).unwrap();
        gravity.update(&mut world, 0.1);
        gravity.forget(a);
        assert!(!gravity.is_attached_to(a));
    }
}
