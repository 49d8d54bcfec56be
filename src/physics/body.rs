use super::{BodyKey, Edge, EdgeKey, EdgeSet, Velocity, Vertex};
use crate::math::{self as m, Angle};

use std::rc::Rc;

/// A rigid body bounded by one or more closed paths of edges.
///
/// The body's local coordinate origin is its center of mass,
/// so the translation of its pose is the world position of the center of mass.
///
/// Create these with [`RigidBodyBuilder`][super::RigidBodyBuilder].
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub(crate) name: String,
    pub(crate) pose: m::Pose,
    pub(crate) velocity: Velocity,
    pub(crate) mass: Mass,
    pub(crate) moment_of_inertia: Mass,
    pub(crate) material: SurfaceMaterial,
    pub(crate) edges: Vec<Edge>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) non_collide: Vec<BodyKey>,
    pub(crate) non_collide_edges: Option<Rc<dyn EdgeSet>>,
}

impl RigidBody {
    // accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> &m::Pose {
        &self.pose
    }

    /// World position of the center of mass.
    #[inline]
    pub fn position(&self) -> m::Vec2 {
        self.pose.translation
    }

    /// Rotation angle in radians, counterclockwise.
    #[inline]
    pub fn angle(&self) -> f64 {
        Angle::from(self.pose.rotation).rad()
    }

    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn moment_of_inertia(&self) -> Mass {
        self.moment_of_inertia
    }

    pub fn material(&self) -> &SurfaceMaterial {
        &self.material
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    // transforms

    /// Convert a point from body coordinates to world coordinates.
    #[inline]
    pub fn body_to_world(&self, p_body: m::Vec2) -> m::Vec2 {
        self.pose * p_body
    }

    /// Convert a point from world coordinates to body coordinates.
    #[inline]
    pub fn world_to_body(&self, p_world: m::Vec2) -> m::Vec2 {
        self.pose.rotation.reversed() * (p_world - self.pose.translation)
    }

    /// Rotate a direction from body coordinates to world coordinates.
    #[inline]
    pub fn rotate_body_to_world(&self, v_body: m::Vec2) -> m::Vec2 {
        self.pose.rotation * v_body
    }

    /// Rotate a direction from world coordinates to body coordinates.
    #[inline]
    pub fn rotate_world_to_body(&self, v_world: m::Vec2) -> m::Vec2 {
        self.pose.rotation.reversed() * v_world
    }

    /// Velocity of a world-space point attached to this body.
    #[inline]
    pub fn point_velocity(&self, p_world: m::Vec2) -> m::Vec2 {
        self.velocity
            .point_velocity(p_world - self.pose.translation)
    }

    // mutation

    pub fn set_pose(&mut self, pose: m::Pose) {
        self.pose = pose;
    }

    pub fn set_position(&mut self, position: m::Vec2) {
        self.pose.translation = position;
    }

    pub fn set_angle(&mut self, angle: Angle) {
        self.pose.rotation = angle.into();
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    /// Move the body so that the body-space point `p_body` lands on `p_world`
    /// with the body rotated to `angle`.
    ///
    /// Only the pose changes. Anything derived from the pose (such as integrator state)
    /// must be resynchronized by the caller.
    pub fn align_to(&mut self, p_body: m::Vec2, p_world: m::Vec2, angle: Angle) {
        let rotation: m::Rotor2 = angle.into();
        self.pose = m::Pose::new(p_world - rotation * p_body, rotation);
    }

    // collision filtering

    /// Bodies this body never has ordinary contacts with.
    pub fn non_collide_bodies(&self) -> &[BodyKey] {
        &self.non_collide
    }

    #[inline]
    pub fn does_not_collide(&self, other: BodyKey) -> bool {
        self.non_collide.contains(&other)
    }

    pub(crate) fn add_non_collide(&mut self, other: BodyKey) {
        if !self.non_collide.contains(&other) {
            self.non_collide.push(other);
        }
    }

    pub(crate) fn remove_non_collide(&mut self, other: BodyKey) {
        self.non_collide.retain(|b| *b != other);
    }

    /// Set the edges of other bodies that this body should never collide with,
    /// such as the path of a track a wheel is attached to.
    pub fn set_non_collide_edges(&mut self, edges: Option<Rc<dyn EdgeSet>>) {
        self.non_collide_edges = edges;
    }

    /// Whether contacts against `edge` are suppressed for this body.
    pub fn non_collide_edge(&self, edge: EdgeKey) -> bool {
        self.non_collide_edges
            .as_ref()
            .map(|set| set.contains(edge))
            .unwrap_or(false)
    }
}

/// Determines how the surface of a body responds to collisions.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceMaterial {
    pub restitution_coef: f64,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        SurfaceMaterial {
            restitution_coef: 1.0,
        }
    }
}

impl SurfaceMaterial {
    /// Get the restitution coefficient between this material and another.
    ///
    /// It is computed as the average between the two materials' coefficients.
    pub fn restitution_with(&self, other: &Self) -> f64 {
        (self.restitution_coef + other.restitution_coef) / 2.0
    }
}

/// Mass or moment of inertia of a body, which can be infinite.
///
/// This stores both a mass value and its inverse, because calculating inverse mass
/// is expensive and needed a lot in physics calculations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mass {
    Finite { mass: f64, inverse: f64 },
    Infinite,
}

impl From<f64> for Mass {
    #[inline]
    fn from(mass: f64) -> Self {
        if mass.is_finite() {
            Mass::Finite {
                mass,
                inverse: 1.0 / mass,
            }
        } else {
            Mass::Infinite
        }
    }
}

impl Mass {
    /// Get the inverse of the mass, which is zero if the mass is infinite.
    #[inline]
    pub fn inv(&self) -> f64 {
        match self {
            Mass::Finite { inverse, .. } => *inverse,
            Mass::Infinite => 0.0,
        }
    }

    /// Get the mass as a number, which is `f64::INFINITY` if the mass is infinite.
    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            Mass::Finite { mass, .. } => *mass,
            Mass::Infinite => f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self, Mass::Finite { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_scenes::*;
    use std::f64::consts::PI;

    #[test]
    fn transforms_round_trip() {
        let mut body = unit_box_at(2.0, -1.0);
        body.set_angle(Angle::Rad(0.7));
        let p = m::Vec2::new(0.3, -0.4);
        let back = body.world_to_body(body.body_to_world(p));
        assert!((back - p).mag() < EPSILON);

        let v = m::Vec2::new(1.0, 2.0);
        let back = body.rotate_world_to_body(body.rotate_body_to_world(v));
        assert!((back - v).mag() < EPSILON);
    }

    #[test]
    fn align_to_puts_point_on_target() {
        let mut body = unit_box_at(5.0, 5.0);
        let p_body = m::Vec2::new(0.5, 0.5);
        let target = m::Vec2::new(-1.0, 2.0);
        body.align_to(p_body, target, Angle::Rad(PI / 3.0));
        assert!((body.body_to_world(p_body) - target).mag() < EPSILON);
        assert!((body.angle() - PI / 3.0).abs() < EPSILON);
    }

    #[test]
    fn infinite_mass_from_number() {
        assert_eq!(Mass::from(f64::INFINITY), Mass::Infinite);
        assert_eq!(Mass::Infinite.inv(), 0.0);
        let m = Mass::from(4.0);
        assert!(m.is_finite());
        assert_eq!(m.inv(), 0.25);
        assert_eq!(m.value(), 4.0);
    }
}
