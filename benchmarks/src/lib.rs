//! Shared setup helpers for rein2d benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use glam::Vec2;
use rein2d::geometry::{Aabb, Circle, Rectangle, Shape, Triangle};
use rein2d::physics::contact::{ContactData, ContactPair};
use rein2d::physics::rigid_body::RigidBody;
use rein2d::physics::{PhysicsConfig, PhysicsWorld};

/// Bounds large enough for every scene below.
pub fn world_bounds() -> Aabb {
    Aabb::new(Vec2::splat(-1000.0), Vec2::splat(1000.0))
}

// ---------------------------------------------------------------------------
// Basic scenes
// ---------------------------------------------------------------------------

fn grid(n: usize, spacing: f32) -> impl Iterator<Item = (usize, Vec2)> {
    let cols = (n as f32).sqrt().ceil().max(1.0) as usize;
    (0..n).map(move |i| {
        let x = (i % cols) as f32 * spacing;
        let y = (i / cols) as f32 * spacing;
        (i, Vec2::new(x, y))
    })
}

/// Spawn `n` dynamic circles in a grid layout so neighbours overlap.
pub fn setup_circle_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    for (_, pos) in grid(n, 1.5) {
        world.spawn((RigidBody::new_dynamic(Circle::new(pos, 1.0), 1.0),));
    }
    world
}

/// Mixed scene: half dynamic circles, half static boxes.
pub fn setup_mixed_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    for (i, pos) in grid(n, 1.5) {
        let body = if i % 2 == 0 {
            RigidBody::new_dynamic(Circle::new(pos, 1.0), 1.0)
        } else {
            RigidBody::new_static(Rectangle::new(pos, Vec2::splat(0.5)))
        };
        world.spawn((body,));
    }
    world
}

/// Sparse scene: bodies spread far apart (no overlaps).
pub fn setup_sparse_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    for (_, pos) in grid(n, 10.0) {
        world.spawn((RigidBody::new_dynamic(Circle::new(pos, 0.5), 1.0),));
    }
    world
}

/// Ground + `n` dynamic bodies above it (mixed circles, boxes and
/// triangles).
pub fn setup_scene(n: usize) -> PhysicsWorld {
    let mut physics = PhysicsWorld::new(world_bounds(), PhysicsConfig::default());
    physics.add_body(RigidBody::new_static(Rectangle::new(
        Vec2::new(0.0, -0.5),
        Vec2::new(500.0, 0.5),
    )));

    let cols = (n as f32).sqrt().ceil().max(1.0);
    for (i, pos) in grid(n, 2.0) {
        let pos = pos + Vec2::new(-cols, 1.0);
        let shape: Shape = match i % 3 {
            0 => Circle::new(pos, 0.5).into(),
            1 => Rectangle::new(pos, Vec2::splat(0.5)).into(),
            _ => match Triangle::new(
                pos + Vec2::new(-0.5, -0.5),
                pos + Vec2::new(0.5, -0.5),
                pos + Vec2::new(0.0, 0.5),
            ) {
                Ok(tri) => tri.into(),
                Err(_) => Circle::new(pos, 0.5).into(),
            },
        };
        physics.add_body(RigidBody::new_dynamic(shape, 1.0));
    }
    physics
}

/// `n` overlapping circle pairs with their contacts, ready for the solver.
pub fn setup_contacts(n: usize) -> (hecs::World, Vec<ContactData>) {
    let mut world = hecs::World::new();
    let mut pairs = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f32 * 5.0;
        let a = world.spawn((RigidBody::new_dynamic(Circle::new(Vec2::new(x, 0.0), 1.0), 1.0)
            .with_velocity(Vec2::new(1.0, 0.0)),));
        let b = world.spawn((RigidBody::new_dynamic(
            Circle::new(Vec2::new(x + 1.5, 0.0), 1.0),
            1.0,
        )
        .with_velocity(Vec2::new(-1.0, 0.0)),));
        pairs.push(ContactPair::new(a, b));
    }
    let contacts = rein2d::physics::narrowphase::narrow_phase(&pairs, &world);
    (world, contacts)
}

// ---------------------------------------------------------------------------
// Mass physics
// ---------------------------------------------------------------------------

/// Ground and walls with `initial` circles already dropped in.
pub fn setup_mass_scene(initial: usize) -> PhysicsWorld {
    let mut physics = PhysicsWorld::new(world_bounds(), PhysicsConfig::default());
    physics.add_body(RigidBody::new_static(Rectangle::new(
        Vec2::new(0.0, -0.5),
        Vec2::new(50.0, 0.5),
    )));
    for x in [-50.0, 50.0] {
        physics.add_body(RigidBody::new_static(Rectangle::new(
            Vec2::new(x, 25.0),
            Vec2::new(0.5, 25.0),
        )));
    }
    for i in 0..initial {
        spawn_falling(&mut physics, i);
    }
    physics
}

fn spawn_falling(physics: &mut PhysicsWorld, index: usize) {
    let x = (index % 40) as f32 * 2.0 - 40.0;
    let y = 10.0 + (index / 40) as f32 * 2.0;
    physics.add_body(RigidBody::new_dynamic(Circle::new(Vec2::new(x, y), 0.5), 1.0));
}

/// Step `frames` times, spawning `spawn_per_frame` circles before each.
pub fn run_mass_physics(
    physics: &mut PhysicsWorld,
    frames: usize,
    spawn_per_frame: usize,
    initial: usize,
) {
    let mut spawned = initial;
    for _ in 0..frames {
        for _ in 0..spawn_per_frame {
            spawn_falling(physics, spawned);
            spawned += 1;
        }
        physics.step(1.0 / 60.0);
    }
}
