//! Contact and collision representation for 2D rigid bodies
//! bounded by straight and circular edges.
//!
//! Bodies live in a [`BodySet`][physics::BodySet]. A search procedure
//! (not part of this crate) pairs vertices and edges of nearby bodies and builds
//! [`RigidBodyCollision`][physics::RigidBodyCollision] records from them,
//! [`Joint`][physics::Joint]s contribute bilateral records of their own,
//! and a solver consumes the resulting list.

pub mod math;
pub use math::{uv, Angle, Pose, Rotor2, Unit, Vec2};

pub mod physics;
pub use physics::{
    body::{Mass, RigidBody, SurfaceMaterial},
    body_set::{BodyKey, BodySet},
    collision::{self, CollisionKind, RigidBodyCollision},
    edge::{Edge, EdgeContact, EdgeKey, EdgeShape},
    edge_set::{EdgeGroup, EdgeRange, EdgeSet},
    joint::{CoordType, Joint, JointBuilder},
    joint_set::{JointKey, JointSet},
    polygon::{RigidBodyBuilder, ShapeError},
    tolerances::Tolerances,
    vertex::{Vertex, VertexKey},
    CollisionError, PhysicsWorld, Velocity,
};
