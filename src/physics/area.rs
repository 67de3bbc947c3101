//! Regions of space with their own gravity, drag and buoyancy.

use std::collections::BTreeSet;

use glam::Vec2;
use hecs::Entity;
use tracing::debug;

use crate::geometry::Shape;

use super::force::{Drag, ForceGenerator, Gravity};
use super::rigid_body::RigidBody;

/// A region that applies its own gravity and drag to the bodies inside it.
///
/// A body is inside while its bounding rectangle intersects the area's
/// shape. Bodies are registered with the area's generators when they enter
/// and unregistered when they leave.
#[derive(Debug, Clone)]
pub struct PhysicsArea {
    shape: Shape,
    gravity: Option<Gravity>,
    drag: Option<Drag>,
    occupants: BTreeSet<Entity>,
}

impl PhysicsArea {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            gravity: None,
            drag: None,
            occupants: BTreeSet::new(),
        }
    }

    pub fn with_gravity(mut self, acceleration: Vec2) -> Self {
        self.gravity = Some(Gravity::new(acceleration));
        self
    }

    pub fn with_drag(mut self, k1: f32, k2: f32) -> Self {
        self.drag = Some(Drag::new(k1, k2));
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn gravity(&self) -> Option<&Gravity> {
        self.gravity.as_ref()
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn occupants(&self) -> impl Iterator<Item = Entity> + '_ {
        self.occupants.iter().copied()
    }

    pub fn contains_body(&self, entity: Entity) -> bool {
        self.occupants.contains(&entity)
    }

    /// Track entries and exits, then tick the area's generators.
    pub fn update(&mut self, bodies: &mut hecs::World, dt: f32) {
        self.refresh_occupants(bodies);
        if let Some(gravity) = &mut self.gravity {
            gravity.update(bodies, dt);
        }
        if let Some(drag) = &mut self.drag {
            drag.update(bodies, dt);
        }
    }

    /// Drop a body that left the world.
    pub fn forget(&mut self, entity: Entity) {
        if self.occupants.remove(&entity) {
            self.detach(entity);
        }
    }

    fn refresh_occupants(&mut self, bodies: &hecs::World) {
        let inside: BTreeSet<Entity> = bodies
            .query::<&RigidBody>()
            .iter()
            .filter(|(_, rb)| self.shape.intersects(&Shape::from(rb.bounding_rectangle())))
            .map(|(entity, _)| entity)
            .collect();

        let entered: Vec<Entity> = inside.difference(&self.occupants).copied().collect();
        let left: Vec<Entity> = self.occupants.difference(&inside).copied().collect();
        for entity in entered {
            debug!(?entity, "body entered area");
            self.attach(entity);
        }
        for entity in left {
            debug!(?entity, "body left area");
            self.detach(entity);
        }
        self.occupants = inside;
    }

    fn attach(&mut self, entity: Entity) {
        if let Some(gravity) = &mut self.gravity {
            gravity.attach(entity);
        }
        if let Some(drag) = &mut self.drag {
            drag.attach(entity);
        }
    }

    fn detach(&mut self, entity: Entity) {
        if let Some(gravity) = &mut self.gravity {
            gravity.detach(entity);
        }
        if let Some(drag) = &mut self.drag {
            drag.detach(entity);
        }
    }
}

/// A [`PhysicsArea`] filled with fluid that buoys bodies up.
#[derive(Debug, Clone)]
pub struct FluidPhysicsArea {
    area: PhysicsArea,
    /// kg/m^3, water is 1000
    density: f32,
}

impl FluidPhysicsArea {
    pub fn new(area: PhysicsArea, density: f32) -> Self {
        Self {
            area,
            density: density.max(0.0),
        }
    }

    pub fn area(&self) -> &PhysicsArea {
        &self.area
    }

    pub fn area_mut(&mut self) -> &mut PhysicsArea {
        &mut self.area
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = density.max(0.0);
    }

    /// Buoyancy impulse on a body whose bounding box covers `overlap` of the
    /// fluid and weighs `mass`, under gravity `g`.
    pub fn buoyancy(&self, overlap: f32, mass: f32, g: Vec2) -> Vec2 {
        overlap * self.density / 1000.0 * -g + mass * g
    }

    /// Tick the wrapped area, then queue a buoyancy impulse on every body
    /// overlapping the fluid's bounding box. `world_gravity` is used when the area has no
    /// gravity of its own.
    pub fn update(&mut self, bodies: &mut hecs::World, dt: f32, world_gravity: Vec2) {
        self.area.update(bodies, dt);

        let g = self
            .area
            .gravity
            .as_ref()
            .map_or(world_gravity, Gravity::acceleration);
        let bounds = self.area.shape.bounds();
        for (_, rb) in bodies.query_mut::<&mut RigidBody>() {
            if !rb.is_active() || rb.is_static() {
                continue;
            }
            let overlap = rb.bounds().overlap_area(&bounds);
            if overlap > 0.0 {
                let impulse = self.buoyancy(overlap, rb.mass(), g);
                rb.apply_impulse(impulse);
            }
        }
    }

    pub fn forget(&mut self, entity: Entity) {
        self.area.forget(entity);
    }
}
