//! Contact data structures for collision response.

use glam::Vec2;
use hecs::Entity;

/// Geometric result of a narrow-phase test between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// Contact normal, unit length, pointing from shape two toward shape one.
    pub normal: Vec2,
    /// Penetration depth, never negative.
    pub penetration: f32,
    /// Contact point in world space.
    pub point: Vec2,
}

impl ContactGeometry {
    /// Same contact seen from the other shape.
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A single collision between two bodies, valid for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactData {
    pub point: Vec2,
    /// Unit vector pointing from `body_two` toward `body_one`.
    pub normal: Vec2,
    pub penetration: f32,
    pub body_one: Entity,
    pub body_two: Entity,
}

impl ContactData {
    pub fn new(body_one: Entity, body_two: Entity, geometry: ContactGeometry) -> Self {
        Self {
            point: geometry.point,
            normal: geometry.normal,
            penetration: geometry.penetration.max(0.0),
            body_one,
            body_two,
        }
    }
}

/// Unordered pair of bodies.
///
/// The entities are stored in ascending order, so `(a, b)` and `(b, a)`
/// build the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    first: Entity,
    second: Entity,
}

impl ContactPair {
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> Entity {
        self.first
    }

    pub fn second(&self) -> Entity {
        self.second
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.first == entity || self.second == entity
    }

    /// The partner of `entity` in this pair.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if entity == self.first {
            Some(self.second)
        } else if entity == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}
