use hecs::Entity;
use tracing::debug;

use crate::error::ForceError;
use crate::math;

use super::{endpoints, enforce_length, ForceGenerator};

/// Rigid link holding two bodies a fixed distance apart.
///
/// Each tick the bodies are moved back to `length` and their relative
/// velocity along the rod is cancelled. The heavier body moves less.
#[derive(Debug, Clone, PartialEq)]
pub struct Rod {
    one: Entity,
    two: Entity,
    pub length: f32,
    detached: bool,
}

impl Rod {
    pub fn new(one: Entity, two: Entity, length: f32) -> Self {
        Self {
            one,
            two,
            length: length.max(0.0),
            detached: false,
        }
    }

    pub fn endpoints(&self) -> (Entity, Entity) {
        (self.one, self.two)
    }
}

impl ForceGenerator for Rod {
    fn name(&self) -> &'static str {
        "rod"
    }

    fn update(&mut self, bodies: &mut hecs::World, _dt: f32) {
        if self.detached {
            return;
        }
        let Some((a, b)) = endpoints(bodies, self.name(), self.one, self.two) else {
            return;
        };
        let distance = a.position.distance(b.position);
        if math::approx_eq(distance, self.length) {
            return;
        }
        enforce_length(bodies, (self.one, self.two), (a, b), self.length, 0.0);
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
            debug!(?entity, "rod endpoint removed");
            self.detached = true;
        }
    }
}
