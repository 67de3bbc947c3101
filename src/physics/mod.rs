//! 2D rigid body simulation.
//!
//! # Architecture
//!
//! The physics pipeline runs in a fixed timestep loop:
//!
//! 1. Update objects: force generators, areas, then integration
//! 2. Rebuild the quadtree from the new bounding boxes
//! 3. Broadphase: overlapping boxes become candidate pairs
//! 4. Narrowphase: exact contacts for each pair
//! 5. Position solve (penetration removal)
//! 6. Velocity solve (restitution and friction impulses)

pub mod area;
pub mod broadphase;
pub mod camera;
pub mod contact;
pub mod force;
pub mod narrowphase;
pub mod quadtree;
pub mod rigid_body;
pub mod solver;

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use hecs::Entity;
use tracing::{debug, trace, warn};

use crate::geometry::{Aabb, Shape};

use self::area::{FluidPhysicsArea, PhysicsArea};
use self::broadphase::BroadPhase;
use self::camera::Camera;
use self::contact::ContactData;
use self::force::{Drag, ForceGenerator, Gravity};
use self::narrowphase::narrow_phase;
use self::rigid_body::RigidBody;
use self::solver::CombineRule;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81).
    pub gravity: Vec2,
    /// World-wide linear drag coefficient. Default: 0.
    pub linear_drag: f32,
    /// World-wide quadratic drag coefficient. Default: 0.
    pub quadratic_drag: f32,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
    /// How two restitution coefficients are merged. Default: average.
    pub restitution_rule: CombineRule,
    /// How two friction coefficients are merged. Default: average.
    pub friction_rule: CombineRule,
    /// Fraction of the penetration removed each step. Default: 1.0.
    pub position_correction: f32,
    /// Penetration left uncorrected. Default: 0.
    pub penetration_slop: f32,
    /// Items per quadtree node before it splits. Default: 8.
    pub quadtree_max_objects: usize,
    /// Default: 8.
    pub quadtree_max_depth: u8,
    /// Only collide bodies seen by at least one camera. Default: false.
    /// Has no effect while there are no cameras.
    pub camera_culling: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            linear_drag: 0.0,
            quadratic_drag: 0.0,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            restitution_rule: CombineRule::Average,
            friction_rule: CombineRule::Average,
            position_correction: 1.0,
            penetration_slop: 0.0,
            quadtree_max_objects: 8,
            quadtree_max_depth: 8,
            camera_culling: false,
        }
    }
}

/// Handle of a generator added with [`PhysicsWorld::add_generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FluidAreaId(u32);

/// Counters from one fixed step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub candidate_pairs: usize,
    pub contacts: usize,
}

/// The physics world: every object, the generators and areas acting on
/// them, and the cameras looking at them.
///
/// Objects are `hecs` entities. An object takes part in the simulation when
/// it carries a [`RigidBody`]; other objects may carry a bare [`Shape`] and
/// are only seen by camera queries.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    dimensions: Aabb,
    objects: hecs::World,
    broadphase: BroadPhase,
    gravity: Gravity,
    drag: Drag,
    generators: BTreeMap<GeneratorId, Box<dyn ForceGenerator>>,
    areas: BTreeMap<AreaId, PhysicsArea>,
    fluid_areas: BTreeMap<FluidAreaId, FluidPhysicsArea>,
    cameras: BTreeMap<String, Camera>,
    next_id: u32,
    accumulator: f64,
    contacts: Vec<ContactData>,
}

impl PhysicsWorld {
    /// Create an empty world covering `dimensions`.
    pub fn new(dimensions: Aabb, config: PhysicsConfig) -> Self {
        if config.fixed_timestep <= 0.0 {
            warn!(
                fixed_timestep = config.fixed_timestep,
                "non-positive fixed timestep, step() will not advance"
            );
        }
        Self {
            broadphase: BroadPhase::new(
                dimensions,
                config.quadtree_max_objects,
                config.quadtree_max_depth,
            ),
            gravity: Gravity::new(config.gravity),
            drag: Drag::new(config.linear_drag, config.quadratic_drag),
            config,
            dimensions,
            objects: hecs::World::new(),
            generators: BTreeMap::new(),
            areas: BTreeMap::new(),
            fluid_areas: BTreeMap::new(),
            cameras: BTreeMap::new(),
            next_id: 0,
            accumulator: 0.0,
            contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn dimensions(&self) -> &Aabb {
        &self.dimensions
    }

    /// Spawn an object carrying only `body`.
    pub fn add_body(&mut self, body: RigidBody) -> Entity {
        self.spawn_object((body,))
    }

    /// Spawn an object from any bundle of components. Objects with a
    /// [`RigidBody`] are put under world gravity and drag.
    pub fn spawn_object(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        let entity = self.objects.spawn(components);
        let physical = self.objects.get::<&RigidBody>(entity).is_ok();
        if physical {
            self.gravity.attach(entity);
            self.drag.attach(entity);
        }
        debug!(?entity, physical, "object added");
        entity
    }

    /// Despawn an object and detach it from every generator and area.
    /// Returns `false` if it did not exist.
    pub fn remove_object(&mut self, entity: Entity) -> bool {
        if self.objects.despawn(entity).is_err() {
            debug!(?entity, "remove of unknown object");
            return false;
        }
        self.gravity.forget(entity);
        self.drag.forget(entity);
        for generator in self.generators.values_mut() {
            generator.forget(entity);
        }
        for area in self.areas.values_mut() {
            area.forget(entity);
        }
        for fluid in self.fluid_areas.values_mut() {
            fluid.forget(entity);
        }
        debug!(?entity, "object removed");
        true
    }

    pub fn body(&self, entity: Entity) -> Option<hecs::Ref<'_, RigidBody>> {
        self.objects.get::<&RigidBody>(entity).ok()
    }

    pub fn body_mut(&mut self, entity: Entity) -> Option<hecs::RefMut<'_, RigidBody>> {
        self.objects.get::<&mut RigidBody>(entity).ok()
    }

    /// Every rigid body, iterate with `.iter()`.
    pub fn bodies(&self) -> hecs::QueryBorrow<'_, &RigidBody> {
        self.objects.query::<&RigidBody>()
    }

    pub fn body_count(&self) -> usize {
        self.objects.query::<&RigidBody>().iter().count()
    }

    /// The underlying object store.
    ///
    /// Removing bodies through it bypasses [`PhysicsWorld::remove_object`];
    /// generators then skip the missing entity until it is forgotten.
    pub fn objects(&self) -> &hecs::World {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut hecs::World {
        &mut self.objects
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_generator(&mut self, generator: Box<dyn ForceGenerator>) -> GeneratorId {
        let id = GeneratorId(self.next_id());
        debug!(?id, name = generator.name(), "generator added");
        self.generators.insert(id, generator);
        id
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&dyn ForceGenerator> {
        self.generators.get(&id).map(|g| g.as_ref())
    }

    pub fn remove_generator(&mut self, id: GeneratorId) -> Option<Box<dyn ForceGenerator>> {
        let removed = self.generators.remove(&id);
        debug!(?id, found = removed.is_some(), "generator removed");
        removed
    }

    pub fn add_area(&mut self, area: PhysicsArea) -> AreaId {
        let id = AreaId(self.next_id());
        debug!(?id, "area added");
        self.areas.insert(id, area);
        id
    }

    pub fn area(&self, id: AreaId) -> Option<&PhysicsArea> {
        self.areas.get(&id)
    }

    pub fn area_mut(&mut self, id: AreaId) -> Option<&mut PhysicsArea> {
        self.areas.get_mut(&id)
    }

    pub fn remove_area(&mut self, id: AreaId) -> Option<PhysicsArea> {
        self.areas.remove(&id)
    }

    pub fn add_fluid_area(&mut self, fluid: FluidPhysicsArea) -> FluidAreaId {
        let id = FluidAreaId(self.next_id());
        debug!(?id, density = fluid.density(), "fluid area added");
        self.fluid_areas.insert(id, fluid);
        id
    }

    pub fn fluid_area(&self, id: FluidAreaId) -> Option<&FluidPhysicsArea> {
        self.fluid_areas.get(&id)
    }

    pub fn fluid_area_mut(&mut self, id: FluidAreaId) -> Option<&mut FluidPhysicsArea> {
        self.fluid_areas.get_mut(&id)
    }

    pub fn remove_fluid_area(&mut self, id: FluidAreaId) -> Option<FluidPhysicsArea> {
        self.fluid_areas.remove(&id)
    }

    /// Add or replace the camera called `name`, returning the old one.
    pub fn add_camera(&mut self, name: impl Into<String>, camera: Camera) -> Option<Camera> {
        let name = name.into();
        debug!(%name, "camera added");
        self.cameras.insert(name, camera)
    }

    pub fn camera(&self, name: &str) -> Option<&Camera> {
        self.cameras.get(name)
    }

    pub fn camera_mut(&mut self, name: &str) -> Option<&mut Camera> {
        self.cameras.get_mut(name)
    }

    pub fn remove_camera(&mut self, name: &str) -> Option<Camera> {
        self.cameras.remove(name)
    }

    /// Objects visible to the named camera, sorted. Empty for an unknown
    /// name.
    pub fn query_camera(&self, name: &str) -> Vec<Entity> {
        let Some(camera) = self.cameras.get(name) else {
            debug!(name, "query of unknown camera");
            return Vec::new();
        };
        let mut visible: Vec<Entity> = self
            .object_bounds()
            .into_iter()
            .filter(|(_, bounds)| camera.is_visible(bounds))
            .map(|(entity, _)| entity)
            .collect();
        visible.sort();
        visible
    }

    /// Objects visible to any camera.
    pub fn query_all_cameras(&self) -> BTreeSet<Entity> {
        self.object_bounds()
            .into_iter()
            .filter(|(_, bounds)| self.cameras.values().any(|c| c.is_visible(bounds)))
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Bounds of every object with a body or a bare shape.
    fn object_bounds(&self) -> Vec<(Entity, Aabb)> {
        self.objects
            .query::<(Option<&RigidBody>, Option<&Shape>)>()
            .iter()
            .filter_map(|(entity, (rb, shape))| {
                let bounds = rb.map(RigidBody::bounds).or_else(|| shape.map(Shape::bounds))?;
                Some((entity, bounds))
            })
            .collect()
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
        self.gravity.set_acceleration(gravity);
    }

    /// Contacts found by the last fixed step.
    pub fn contacts(&self) -> &[ContactData] {
        &self.contacts
    }

    /// Step the physics simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator to ensure deterministic simulation.
    /// Returns the number of fixed steps taken.
    pub fn step(&mut self, delta_time: f64) -> u32 {
        if self.config.fixed_timestep <= 0.0 {
            return 0;
        }
        self.accumulator += delta_time.max(0.0);

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.fixed_step(self.config.fixed_timestep as f32);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Run the whole pipeline once with timestep `dt`.
    pub fn fixed_step(&mut self, dt: f32) -> FrameStats {
        // 1. Forces and integration
        self.update_objects(dt);

        // 2. Spatial partition
        self.broadphase.rebuild(&self.objects);

        // 3. Broadphase collision detection
        let visible = (self.config.camera_culling && !self.cameras.is_empty())
            .then(|| self.query_all_cameras());
        let pairs = self.broadphase.find_pairs(&self.objects, visible.as_ref());

        // 4. Narrowphase collision detection
        self.contacts = narrow_phase(&pairs, &self.objects);

        // 5. Remove penetration, then 6. resolve velocities
        solver::solve_positions(
            &mut self.objects,
            &self.contacts,
            self.config.position_correction,
            self.config.penetration_slop,
        );
        for contact in &self.contacts {
            solver::solve_velocity(
                &mut self.objects,
                contact,
                self.config.restitution_rule,
                self.config.friction_rule,
            );
        }

        let stats = FrameStats {
            candidate_pairs: pairs.len(),
            contacts: self.contacts.len(),
        };
        trace!(?stats, "fixed step");
        stats
    }

    fn update_objects(&mut self, dt: f32) {
        self.gravity.update(&mut self.objects, dt);
        self.drag.update(&mut self.objects, dt);
        for generator in self.generators.values_mut() {
            generator.update(&mut self.objects, dt);
        }
        for area in self.areas.values_mut() {
            area.update(&mut self.objects, dt);
        }
        for fluid in self.fluid_areas.values_mut() {
            fluid.update(&mut self.objects, dt, self.config.gravity);
        }
        for (_, rb) in self.objects.query_mut::<&mut RigidBody>() {
            rb.integrate(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Rectangle};
    use crate::physics::force::Spring;

    fn world_with(config: PhysicsConfig) -> PhysicsWorld {
        PhysicsWorld::new(Aabb::new(Vec2::splat(-100.0), Vec2::splat(100.0)), config)
    }

    #[test]
    fn test_physics_world_free_fall() {
        let mut physics = world_with(PhysicsConfig::default());
        let entity =
            physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(0.0, 10.0), 0.5), 1.0));

        // Simulate ~1 second
        for _ in 0..60 {
            assert_eq!(physics.step(1.0 / 60.0), 1);
        }

        let y = physics.body(entity).unwrap().position().y;
        assert!(y > 4.9 && y < 5.1, "Body should have fallen ~4.9m: y = {y}");
    }

    #[test]
    fn test_physics_world_collision() {
        let mut physics = world_with(PhysicsConfig::default());

        // Dynamic ball falling
        let ball =
            physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(0.0, 2.0), 0.5), 1.0));
        // Static ground, top surface at y = 0
        let ground = physics.add_body(RigidBody::new_static(Rectangle::new(
            Vec2::new(0.0, -0.5),
            Vec2::new(50.0, 0.5),
        )));

        // Simulate 3 seconds
        for _ in 0..180 {
            physics.step(1.0 / 60.0);
        }

        let rb = physics.body(ball).unwrap();
        let y = rb.position().y;
        assert!(y > 0.4 && y < 0.6, "Ball should rest on the ground: y = {y}");
        let speed = rb.velocity().length();
        assert!(speed < 0.5, "Ball should have settled: speed = {speed}");
        assert_eq!(
            physics.body(ground).unwrap().position(),
            Vec2::new(0.0, -0.5)
        );
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, Vec2::new(0.0, -9.81));
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(config.max_substeps, 4);
        assert_eq!(config.restitution_rule, CombineRule::Average);
        assert_eq!(config.friction_rule, CombineRule::Average);
        assert_eq!(config.position_correction, 1.0);
        assert!(!config.camera_culling);
    }

    #[test]
    fn test_step_clamps_substeps() {
        let mut physics = world_with(PhysicsConfig::default());
        assert_eq!(physics.step(0.005), 0);
        // a long hitch only runs max_substeps
        assert_eq!(physics.step(1.0), 4);
        assert_eq!(physics.step(0.0), 0);
    }

    #[test]
    fn test_fixed_step_reports_contacts() {
        let mut physics = world_with(PhysicsConfig {
            gravity: Vec2::ZERO,
            ..PhysicsConfig::default()
        });
        physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 1.0), 1.0));
        physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(1.5, 0.0), 1.0), 1.0));
        physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(50.0, 0.0), 1.0), 1.0));

        let stats = physics.fixed_step(1.0 / 60.0);
        assert_eq!(stats, FrameStats { candidate_pairs: 1, contacts: 1 });
        assert_eq!(physics.contacts().len(), 1);
    }

    #[test]
    fn test_remove_object_detaches_generators() {
        let mut physics = world_with(PhysicsConfig::default());
        let a = physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 0.5), 1.0));
        let b = physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(3.0, 0.0), 0.5), 1.0));
        let spring = physics.add_generator(Box::new(Spring::new(a, b, 5.0, 2.0, 1.0)));
        assert_eq!(physics.generator(spring).unwrap().name(), "spring");
        assert!(physics.generator(spring).unwrap().is_attached_to(a));

        assert!(physics.remove_object(b));
        assert!(!physics.remove_object(b));
        assert!(!physics.generator(spring).unwrap().is_attached_to(a));
        assert_eq!(physics.body_count(), 1);

        // the orphaned spring is harmless
        physics.fixed_step(1.0 / 60.0);
        assert!(physics.remove_generator(spring).is_some());
        assert!(physics.generator(spring).is_none());
    }

    #[test]
    fn test_camera_queries() {
        let mut physics = world_with(PhysicsConfig::default());
        let near = physics.add_body(RigidBody::new_static(Circle::new(Vec2::ZERO, 1.0)));
        let far = physics.add_body(RigidBody::new_static(Circle::new(Vec2::new(60.0, 0.0), 1.0)));
        let decor = physics.spawn_object((Shape::from(Circle::new(Vec2::new(2.0, 2.0), 0.5)),));
        assert_eq!(physics.body_count(), 2);

        physics.add_camera("main", Camera::new(Rectangle::new(Vec2::ZERO, Vec2::splat(5.0))));
        physics.add_camera("far", Camera::new(Rectangle::new(Vec2::new(60.0, 0.0), Vec2::ONE)));

        let mut expected = vec![near, decor];
        expected.sort();
        assert_eq!(physics.query_camera("main"), expected);
        assert_eq!(physics.query_camera("far"), vec![far]);
        assert!(physics.query_camera("missing").is_empty());
        assert_eq!(physics.query_all_cameras().len(), 3);

        physics.camera_mut("far").unwrap().move_to(Vec2::new(-60.0, 0.0));
        assert!(physics.query_camera("far").is_empty());
        assert!(physics.remove_camera("far").is_some());
        assert!(physics.camera("far").is_none());
    }

    #[test]
    fn test_collisions_independent_of_cameras() {
        let config = PhysicsConfig {
            gravity: Vec2::ZERO,
            ..PhysicsConfig::default()
        };
        let spawn_pair = |physics: &mut PhysicsWorld| {
            physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(40.0, 0.0), 1.0), 1.0));
            physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(41.5, 0.0), 1.0), 1.0));
            physics.add_camera("main", Camera::new(Rectangle::new(Vec2::ZERO, Vec2::splat(5.0))));
        };

        let mut physics = world_with(config.clone());
        spawn_pair(&mut physics);
        assert_eq!(physics.fixed_step(1.0 / 60.0).contacts, 1);

        let mut culled = world_with(PhysicsConfig {
            camera_culling: true,
            ..config
        });
        spawn_pair(&mut culled);
        assert_eq!(culled.fixed_step(1.0 / 60.0).candidate_pairs, 0);
    }

    #[test]
    fn test_box_settles_flat_on_ground() {
        let mut physics = world_with(PhysicsConfig::default());
        let ground = physics.add_body(RigidBody::new_static(Rectangle::new(
            Vec2::new(0.0, -0.5),
            Vec2::new(50.0, 0.5),
        )));
        let block = physics.add_body(
            RigidBody::new_dynamic(Rectangle::new(Vec2::new(0.0, 0.5), Vec2::splat(0.5)), 1.0)
                .with_restitution(0.0),
        );

        let stats = physics.fixed_step(1.0 / 60.0);
        // one contact under each bottom corner
        assert_eq!(stats.contacts, 2);

        for _ in 0..120 {
            physics.step(1.0 / 60.0);
        }
        let rb = physics.body(block).unwrap();
        let y = rb.position().y;
        assert!(y > 0.45 && y < 0.55, "box should rest on the ground: y = {y}");
        assert!(rb.velocity().length() < 0.5);
        assert_eq!(
            physics.body(ground).unwrap().position(),
            Vec2::new(0.0, -0.5)
        );
    }

    #[test]
    fn test_world_drag_is_an_impulse() {
        let mut physics = world_with(PhysicsConfig {
            gravity: Vec2::ZERO,
            linear_drag: 0.5,
            ..PhysicsConfig::default()
        });
        let body = physics.add_body(
            RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 0.5), 3.0)
                .with_velocity(Vec2::new(4.0, 0.0)),
        );

        physics.fixed_step(1.0 / 60.0);
        // 4 - 0.5 * 4, whatever the mass and timestep
        let rb = physics.body(body).unwrap();
        assert!((rb.velocity().x - 2.0).abs() < 1e-4);
        assert!((rb.position().x - 4.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_areas_and_gravity_setter() {
        let mut physics = world_with(PhysicsConfig::default());
        physics.set_gravity(Vec2::ZERO);
        assert_eq!(physics.gravity(), Vec2::ZERO);

        let body = physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::ZERO, 0.5), 1.0));
        let area = physics.add_area(
            PhysicsArea::new(Rectangle::new(Vec2::ZERO, Vec2::splat(5.0)))
                .with_gravity(Vec2::new(1.0, 0.0)),
        );
        let fluid = physics.add_fluid_area(FluidPhysicsArea::new(
            PhysicsArea::new(Rectangle::new(Vec2::new(0.0, -50.0), Vec2::ONE)),
            1000.0,
        ));

        physics.fixed_step(0.5);
        assert!(physics.area(area).unwrap().contains_body(body));
        assert!(!physics.fluid_area(fluid).unwrap().area().contains_body(body));
        let vx = physics.body(body).unwrap().velocity().x;
        assert!((vx - 0.5).abs() < 1e-4);

        assert!(physics.remove_object(body));
        assert!(!physics.area(area).unwrap().contains_body(body));
    }
}
