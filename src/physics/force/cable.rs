use hecs::Entity;
use tracing::debug;

use crate::error::ForceError;
use crate::math::EPSILON;

use super::{endpoints, enforce_length, ForceGenerator};

/// Inextensible rope between two bodies. Slack cables do nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Cable {
    one: Entity,
    two: Entity,
    pub length: f32,
    /// Bounce when the cable snaps taut, 0.0 - 1.0.
    pub restitution: f32,
    detached: bool,
}

impl Cable {
    pub fn new(one: Entity, two: Entity, length: f32, restitution: f32) -> Self {
        Self {
            one,
            two,
            length: length.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
            detached: false,
        }
    }

    pub fn endpoints(&self) -> (Entity, Entity) {
        (self.one, self.two)
    }
}

impl ForceGenerator for Cable {
    fn name(&self) -> &'static str {
        "cable"
    }

    fn update(&mut self, bodies: &mut hecs::World, _dt: f32) {
        if self.detached {
            return;
        }
        let Some((a, b)) = endpoints(bodies, self.name(), self.one, self.two) else {
            return;
        };
        if a.position.distance(b.position) <= self.length + EPSILON {
            return;
        }
        enforce_length(
            bodies,
            (self.one, self.two),
            (a, b),
            self.length,
            self.restitution,
        );
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
            debug!(?entity, "cable endpoint removed");
            self.detached = true;
        }
    }
}
