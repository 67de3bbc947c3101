use glam::Vec2;
use hecs::Entity;
use tracing::debug;

use crate::error::ForceError;
use crate::math;
use crate::physics::rigid_body::RigidBody;

use super::{endpoints, ForceGenerator};

/// Hookean spring between two bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    one: Entity,
    two: Entity,
    pub stiffness: f32,
    pub rest_length: f32,
    /// How far below the rest length the spring can still push back.
    pub compression_limit: f32,
    detached: bool,
}

impl Spring {
    pub fn new(
        one: Entity,
        two: Entity,
        stiffness: f32,
        rest_length: f32,
        compression_limit: f32,
    ) -> Self {
        Self {
            one,
            two,
            stiffness,
            rest_length: rest_length.max(0.0),
            compression_limit: compression_limit.max(0.0),
            detached: false,
        }
    }

    pub fn endpoints(&self) -> (Entity, Entity) {
        (self.one, self.two)
    }

    /// Impulse on body one when the ends are `separation` apart (one minus
    /// two). Body two receives the opposite.
    pub fn impulse_for(&self, separation: Vec2) -> Vec2 {
        let Some(direction) = math::try_normalize(separation) else {
            return Vec2::ZERO;
        };
        let deviation = separation.length() - self.rest_length;
        let magnitude = self.stiffness * deviation.max(-self.compression_limit);
        -direction * magnitude
    }
}

impl ForceGenerator for Spring {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn update(&mut self, bodies: &mut hecs::World, _dt: f32) {
        if self.detached {
            return;
        }
        let Some((a, b)) = endpoints(bodies, self.name(), self.one, self.two) else {
            return;
        };
        let impulse = self.impulse_for(a.position - b.position);
        for (entity, impulse) in [(self.one, impulse), (self.two, -impulse)] {
            if let Ok(mut rb) = bodies.get::<&mut RigidBody>(entity) {
                if rb.is_active() && rb.is_dynamic() {
                    rb.apply_impulse(impulse);
                }
            }
        }
    }

    fn register(&mut self, _entity: Entity) -> Result<bool, ForceError> {
        Err(ForceError::RegistrationUnsupported {
            generator: self.name(),
        })
    }

    fn unregister(&mut self, _entity: Entity) -> Result<bool, ForceError> {
        Err(ForceError::RegistrationUnsupported {
            generator: self.name(),
        })
    }

    fn is_attached_to(&self, entity: Entity) -> bool {
        !self.detached && (entity == self.one || entity == self.two)
    }

    fn forget(&mut self, entity: Entity) {
        if self.is_attached_to(entity) {
            debug!(?entity, "spring endpoint removed");
            self.detached = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::math::vec_approx_eq;

    fn pair(distance: f32) -> (hecs::World, Entity, Entity) {
        let mut world = hecs::World::new();
        let a = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 0.5), 1.0),));
        let b = world.spawn((RigidBody::new_dynamic(
            Circle::new(Vec2::new(distance, 0.0), 0.5),
            1.0,
        ),));
        (world, a, b)
    }

    /// Velocity after one integration tick.
    fn velocity_after_tick(world: &hecs::World, e: Entity) -> Vec2 {
        let mut rb = world.get::<&mut RigidBody>(e).unwrap();
        assert!(rb.forces().is_empty());
        rb.integrate(1.0 / 60.0);
        rb.velocity()
    }

    #[test]
    fn test_spring_at_rest_length_applies_nothing() {
        let (mut world, a, b) = pair(2.0);
        let mut spring = Spring::new(a, b, 10.0, 2.0, 1.0);
        spring.update(&mut world, 1.0 / 60.0);
        assert!(vec_approx_eq(velocity_after_tick(&world, a), Vec2::ZERO));
        assert!(vec_approx_eq(velocity_after_tick(&world, b), Vec2::ZERO));
    }

    #[test]
    fn test_stretched_spring_pulls_together() {
        let (mut world, a, b) = pair(3.0);
        let mut spring = Spring::new(a, b, 10.0, 2.0, 1.0);
        spring.update(&mut world, 1.0 / 60.0);
        assert!(vec_approx_eq(velocity_after_tick(&world, a), Vec2::new(10.0, 0.0)));
        assert!(vec_approx_eq(velocity_after_tick(&world, b), Vec2::new(-10.0, 0.0)));
    }

    #[test]
    fn test_compression_is_limited() {
        let (mut world, a, b) = pair(0.5);
        // Compressed by 1.5 but only 0.5 counts.
        let mut spring = Spring::new(a, b, 10.0, 2.0, 0.5);
        spring.update(&mut world, 1.0 / 60.0);
        assert!(vec_approx_eq(velocity_after_tick(&world, a), Vec2::new(-5.0, 0.0)));
        assert!(vec_approx_eq(velocity_after_tick(&world, b), Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_registration_refused_and_forget() {
        let (mut world, a, b) = pair(3.0);
        let mut spring = Spring::new(a, b, 10.0, 2.0, 1.0);
        assert_eq!(
            spring.register(a),
            Err(ForceError::RegistrationUnsupported { generator: "spring" })
        );
        assert!(spring.unregister(b).is_err());
        assert!(spring.is_attached_to(a));

        spring.forget(b);
        assert!(!spring.is_attached_to(a));
        spring.update(&mut world, 1.0 / 60.0);
        assert_eq!(
            world.get::<&RigidBody>(a).unwrap().pending_impulse(),
            Vec2::ZERO
        );
    }
}
