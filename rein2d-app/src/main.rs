//! Headless demo: a walled box with bouncing balls, a spring-linked pair, a
//! pendulum and a pool of water.
//!
//! Run with `RUST_LOG=info cargo run -p rein2d-app`, or `RUST_LOG=debug` to
//! see the engine's own events.

use anyhow::Context;
use glam::Vec2;
use rein2d::{
    Aabb, Cable, Camera, Circle, FluidPhysicsArea, PhysicsArea, PhysicsConfig, PhysicsWorld,
    Polygon, Rectangle, RigidBody, Rod, Spring,
};

const FRAMES: usize = 600;

struct Scene {
    physics: PhysicsWorld,
    balls: Vec<hecs::Entity>,
    bob: hecs::Entity,
}

fn build_scene() -> anyhow::Result<Scene> {
    let config = PhysicsConfig {
        // drag, spring and buoyancy are per-tick velocity changes
        linear_drag: 0.002,
        penetration_slop: 0.005,
        position_correction: 0.8,
        ..PhysicsConfig::default()
    };
    let mut physics = PhysicsWorld::new(Aabb::new(Vec2::new(-30.0, -5.0), Vec2::new(30.0, 40.0)), config);

    // Ground and walls
    physics.add_body(RigidBody::new_static(Rectangle::new(
        Vec2::new(0.0, -0.5),
        Vec2::new(25.0, 0.5),
    )));
    for x in [-25.5, 25.5] {
        physics.add_body(RigidBody::new_static(Rectangle::new(
            Vec2::new(x, 15.0),
            Vec2::new(0.5, 15.0),
        )));
    }

    // Bouncing balls
    let mut balls = Vec::new();
    for i in 0..8 {
        let x = -14.0 + i as f32 * 1.5;
        let ball = RigidBody::new_dynamic(Circle::new(Vec2::new(x, 8.0 + i as f32), 0.5), 1.0)
            .with_restitution(0.7)
            .with_velocity(Vec2::new(1.0, 0.0));
        balls.push(physics.add_body(ball));
    }

    // A hexagon and a box joined by a spring
    let hexagon = Polygon::regular(Vec2::new(2.0, 6.0), 0.75, 6).context("hexagon")?;
    let a = physics.add_body(RigidBody::new_dynamic(hexagon, 2.0));
    let b = physics.add_body(RigidBody::new_dynamic(
        Rectangle::new(Vec2::new(5.0, 6.0), Vec2::splat(0.5)),
        1.0,
    ));
    physics.add_generator(Box::new(Spring::new(a, b, 0.05, 2.0, 1.0)));

    // Pendulum on a rod, with a cable dangling a second weight below it
    let pivot = physics.add_body(RigidBody::new_static(Circle::new(Vec2::new(10.0, 20.0), 0.2)));
    let bob = physics.add_body(
        RigidBody::new_dynamic(Circle::new(Vec2::new(14.0, 20.0), 0.4), 1.0)
            .with_friction(0.2, 0.1),
    );
    physics.add_generator(Box::new(Rod::new(pivot, bob, 4.0)));
    let weight = physics.add_body(RigidBody::new_dynamic(
        Circle::new(Vec2::new(14.0, 17.0), 0.3),
        0.5,
    ));
    physics.add_generator(Box::new(Cable::new(bob, weight, 3.0, 0.2)));

    // Pool on the right side; the fluid is just dense enough to float the crate
    let pool = PhysicsArea::new(Rectangle::new(Vec2::new(18.0, 2.0), Vec2::new(7.0, 2.0)))
        .with_drag(0.02, 0.01);
    physics.add_fluid_area(FluidPhysicsArea::new(pool, 490.0));
    physics.add_body(RigidBody::new_dynamic(
        Rectangle::new(Vec2::new(18.0, 6.0), Vec2::splat(0.6)),
        0.7,
    ));

    physics.add_camera(
        "main",
        Camera::new(Rectangle::new(Vec2::new(0.0, 10.0), Vec2::new(16.0, 10.0))),
    );

    Ok(Scene {
        physics,
        balls,
        bob,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Scene {
        mut physics,
        balls,
        bob,
    } = build_scene()?;
    log::info!("scene built with {} bodies", physics.body_count());

    let mut contacts = 0;
    for frame in 0..FRAMES {
        physics.step(1.0 / 60.0);
        contacts += physics.contacts().len();

        if frame % 60 == 0 {
            let visible = physics.query_camera("main").len();
            log::info!("frame {frame}: {visible} objects on camera");
            for &ball in &balls {
                if let Some(rb) = physics.body(ball) {
                    log::debug!("  ball {ball:?} at {:?}", rb.position());
                }
            }
        }
    }

    let bob = physics.body(bob).context("pendulum bob missing")?;
    log::info!(
        "done after {FRAMES} frames, {contacts} contacts, bob at {:?}",
        bob.position()
    );
    Ok(())
}
