use crate::math as m;

use itertools::Itertools;

//

pub mod body;
pub use body::{Mass, RigidBody, SurfaceMaterial};

pub mod body_set;
pub use body_set::{BodyKey, BodySet};

pub mod edge;
pub use edge::{Edge, EdgeContact, EdgeKey, EdgeShape};

pub mod vertex;
pub use vertex::{Vertex, VertexKey};

pub mod polygon;
pub use polygon::{RigidBodyBuilder, ShapeError};

pub mod edge_set;
pub use edge_set::{EdgeGroup, EdgeRange, EdgeSet};

pub mod collision;
pub use collision::{CollisionKind, RigidBodyCollision};

pub mod joint;
pub use joint::{CoordType, Joint, JointBuilder};

pub mod joint_set;
pub use joint_set::{JointKey, JointSet};

pub mod tolerances;
pub use tolerances::Tolerances;

#[cfg(test)]
pub(crate) mod test_scenes;

//

/// Velocity of an object.
///
// Equivalent to a Vec3 but with names for the translational and rotational part.
#[derive(Copy, Clone, Debug)]
pub struct Velocity {
    /// Linear velocity in metres per second.
    pub linear: m::Vec2,
    /// Angular velocity in radians per second.
    pub angular: f64,
}

impl Default for Velocity {
    fn default() -> Self {
        Velocity {
            linear: m::Vec2::zero(),
            angular: 0.0,
        }
    }
}

impl Velocity {
    /// Get the linear velocity of a point offset from the center of mass.
    pub fn point_velocity(&self, offset: m::Vec2) -> m::Vec2 {
        let tangent = m::left_normal(offset) * self.angular;
        self.linear + tangent
    }
}

/// Errors from building collision records, joints and edge selections.
///
/// These all indicate that the caller passed something that can never make sense,
/// such as a key to a body that was removed. Simulation code should treat them as fatal.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CollisionError {
    #[error("Body {0:?} does not exist")]
    MissingBody(BodyKey),
    #[error("Edge {0:?} does not exist")]
    MissingEdge(EdgeKey),
    #[error("Vertex {0:?} does not exist")]
    MissingVertex(VertexKey),
    #[error("Body {0:?} cannot collide with or be joined to itself")]
    SameBody(BodyKey),
    #[error("Edge range [{begin}, {end}] is invalid for a body with {edge_count} edges")]
    InvalidEdgeRange {
        begin: usize,
        end: usize,
        edge_count: usize,
    },
    #[error("Two straight edges cannot form an edge-edge collision, use their vertices instead")]
    StraightEdgePair,
    #[error("Joint normal has zero length")]
    ZeroNormal,
    #[error("Inconsistent collision: {0}")]
    Inconsistent(&'static str),
}

/// Everything the collision layer needs to know about a scene:
/// bodies with their geometry, and the joints connecting them.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    pub bodies: BodySet,
    pub joints: JointSet,
    // joint ids count up for the lifetime of the world, they're never reused
    joint_counter: usize,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world whose bodies use the given collision tolerances.
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self {
            bodies: BodySet::new().with_tolerances(tolerances),
            ..Self::default()
        }
    }

    #[inline]
    pub(crate) fn next_joint_id(&mut self) -> usize {
        let id = self.joint_counter;
        self.joint_counter += 1;
        id
    }

    /// Build a joint and add it to the world. Returns a key that can be used to remove it later.
    ///
    /// The joined bodies stop colliding with each other.
    pub fn add_joint(&mut self, builder: JointBuilder) -> Result<JointKey, CollisionError> {
        let joint = builder.build(self)?;
        Ok(self.joints.insert(joint))
    }

    /// Remove a body along with every joint attached to it,
    /// returning the body if it still existed.
    pub fn remove_body(&mut self, body: BodyKey) -> Option<RigidBody> {
        self.joints.retain(|joint| !joint.has_body(body));
        self.bodies.remove_body(body)
    }

    /// All unordered pairs of bodies that ordinary contact detection should look at.
    ///
    /// This is a brute-force enumeration, not a spatial query.
    pub fn collidable_pairs(&self) -> Vec<[BodyKey; 2]> {
        let keys: Vec<BodyKey> = self.bodies.iter().map(|(key, _)| key).collect();
        keys.iter()
            .copied()
            .tuple_combinations()
            .filter(|&(b1, b2)| self.bodies.can_collide(b1, b2))
            .map(|(b1, b2)| [b1, b2])
            .collect()
    }

    /// Put a fresh record of every joint at the front of `collisions`.
    pub fn add_joint_collisions(
        &self,
        collisions: &mut Vec<RigidBodyCollision>,
        time: f64,
    ) -> Result<(), CollisionError> {
        let accuracy = self.bodies.tolerances().accuracy;
        self.joints
            .add_collisions(collisions, &self.bodies, time, accuracy)
    }

    /// Remove all bodies and joints.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.joints.clear();
    }
}
