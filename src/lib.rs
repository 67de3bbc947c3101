//! Rein 2D Physics
//!
//! Collision detection and rigid body resolution for 2D scenes.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Tolerances and vector helpers over glam
//! 2. **geometry** - Shape primitives with intersection and containment tests
//! 3. **physics** - Rigid bodies, force generators, areas, and the world pipeline
//!
//! Bodies live in a hecs world owned by [`PhysicsWorld`]; handles are plain
//! [`hecs::Entity`] values.

pub mod error;
pub mod geometry;
pub mod math;
pub mod physics;

// Re-export commonly used types
pub use error::{Error, ForceError, GeometryError, Result};

pub use geometry::{
    Aabb, AngularSpan, Arc, Circle, Color, Ellipse, Line, LineIntersection, Point, Polygon,
    Rectangle, Sector, Shape, ShapeKind, Spline, Style, Triangle,
};

pub use physics::area::{FluidPhysicsArea, PhysicsArea};
pub use physics::camera::Camera;
pub use physics::contact::{ContactData, ContactPair};
pub use physics::force::{Cable, Drag, ForceGenerator, Gravity, Rod, Spring};
pub use physics::rigid_body::RigidBody;
pub use physics::solver::CombineRule;
pub use physics::{AreaId, FluidAreaId, FrameStats, GeneratorId, PhysicsConfig, PhysicsWorld};

// Re-export glam and hecs for convenience
pub use glam;
pub use hecs;
