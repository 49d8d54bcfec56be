//! Collision records: uniform descriptions of where and how two bodies touch,
//! consumed by contact and impulse solvers.
//!
//! A record is one of three kinds:
//! a corner of one body against an edge of another ([`corner_edge`]),
//! an edge against an edge ([`edge_edge`]),
//! or the bilateral record manufactured by a [`Joint`][super::Joint].
//!
//! Records are created during a collision search, refreshed with
//! [`update_collision`][RigidBodyCollision::update_collision] whenever the bodies move,
//! and deduplicated with [`similar_to`][RigidBodyCollision::similar_to]
//! before being handed to a solver.

use super::{BodyKey, BodySet, CollisionError, EdgeKey, Joint, Tolerances, VertexKey};
use crate::math::{self as m, Unit};

use std::cell::Cell;

pub mod corner_edge;
pub mod edge_edge;
pub mod list;
pub use list::{add_collision, update_collisions};

/// The geometric features a collision record is about.
#[derive(Clone, Copy, Debug)]
pub enum CollisionKind {
    /// A vertex of the primary body against an edge of the normal body.
    CornerEdge {
        vertex: VertexKey,
        /// The edge ending at the vertex, or the edge a decorated vertex lies on.
        primary_edge: EdgeKey,
        /// The edge starting at the vertex, if it is an end point.
        primary_edge2: Option<EdgeKey>,
        normal_edge: EdgeKey,
    },
    /// An edge of the primary body against an edge of the normal body.
    /// At least one of them is curved.
    EdgeEdge {
        primary_edge: EdgeKey,
        normal_edge: EdgeKey,
    },
    /// Attachment points of a joint, to be held together.
    Joint(Joint),
}

/// Contact geometry computed by an update.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ContactGeometry {
    pub impact1: m::Vec2,
    pub impact2: Option<m::Vec2>,
    pub normal: Unit<m::Vec2>,
    pub distance: f64,
}

/// A touching pair of bodies.
///
/// The normal points from the normal body toward the primary body
/// and the distance is the signed gap along it, negative when the bodies overlap.
/// Geometry is only valid after a successful
/// [`update_collision`][Self::update_collision]; before that the distance is NaN.
#[derive(Clone, Debug)]
pub struct RigidBodyCollision {
    pub(crate) kind: CollisionKind,
    pub(crate) primary_body: BodyKey,
    pub(crate) normal_body: BodyKey,
    pub(crate) impact1: m::Vec2,
    pub(crate) impact2: Option<m::Vec2>,
    pub(crate) normal: Unit<m::Vec2>,
    pub(crate) distance: f64,
    /// Whether the primary side is a curved surface whose center U1 points to.
    pub(crate) ball_object: bool,
    /// Whether the normal side is a curved surface whose center U2 points to.
    pub(crate) ball_normal: bool,
    // radii of curvature, only used to scale nearness
    pub(crate) radius1: f64,
    pub(crate) radius2: f64,
    pub(crate) creator: &'static str,
    pub(crate) tolerances: Tolerances,
    pub(crate) elasticity: f64,
    pub(crate) detected_time: Option<f64>,
    pub(crate) update_time: Option<f64>,
    /// Set by the solver if this contact must be resolved even when it looks separating.
    pub must_handle: bool,
    /// Impulse applied by a collision solver.
    pub impulse: Option<f64>,
    /// Force applied by a contact solver.
    pub force: Option<f64>,
    u1: Cell<Option<m::Vec2>>,
    u2: Cell<Option<m::Vec2>>,
}

impl RigidBodyCollision {
    /// Shared part of every constructor. Leaves the geometry unset.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        bodies: &BodySet,
        kind: CollisionKind,
        primary_body: BodyKey,
        normal_body: BodyKey,
        ball_object: bool,
        ball_normal: bool,
        radius1: f64,
        radius2: f64,
        creator: &'static str,
    ) -> Result<Self, CollisionError> {
        if primary_body == normal_body {
            return Err(CollisionError::SameBody(primary_body));
        }
        let elasticity = bodies
            .body(primary_body)?
            .material()
            .restitution_with(bodies.body(normal_body)?.material());
        Ok(Self {
            kind,
            primary_body,
            normal_body,
            impact1: m::Vec2::zero(),
            impact2: None,
            normal: Unit::unit_y(),
            distance: f64::NAN,
            ball_object,
            ball_normal,
            radius1,
            radius2,
            creator,
            tolerances: *bodies.tolerances(),
            elasticity,
            detected_time: None,
            update_time: None,
            must_handle: false,
            impulse: None,
            force: None,
            u1: Cell::new(None),
            u2: Cell::new(None),
        })
    }

    /// Replace the provenance tag, which defaults to the kind of the record.
    pub fn with_creator(mut self, creator: &'static str) -> Self {
        self.creator = creator;
        self
    }

    // accessors

    #[inline]
    pub fn kind(&self) -> &CollisionKind {
        &self.kind
    }

    #[inline]
    pub fn primary_body(&self) -> BodyKey {
        self.primary_body
    }

    #[inline]
    pub fn normal_body(&self) -> BodyKey {
        self.normal_body
    }

    /// World point of contact on the primary body.
    #[inline]
    pub fn impact1(&self) -> m::Vec2 {
        self.impact1
    }

    /// World point of contact on the normal body, if it differs from `impact1`.
    #[inline]
    pub fn impact2(&self) -> Option<m::Vec2> {
        self.impact2
    }

    #[inline]
    pub fn normal(&self) -> Unit<m::Vec2> {
        self.normal
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn ball_object(&self) -> bool {
        self.ball_object
    }

    #[inline]
    pub fn ball_normal(&self) -> bool {
        self.ball_normal
    }

    #[inline]
    pub fn radius1(&self) -> f64 {
        self.radius1
    }

    #[inline]
    pub fn radius2(&self) -> f64 {
        self.radius2
    }

    pub fn creator(&self) -> &'static str {
        self.creator
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Restitution coefficient of the pair.
    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    pub fn detected_time(&self) -> Option<f64> {
        self.detected_time
    }

    pub fn set_detected_time(&mut self, time: f64) {
        self.detected_time = Some(time);
    }

    /// Time of the last update that produced fresh geometry.
    pub fn update_time(&self) -> Option<f64> {
        self.update_time
    }

    #[inline]
    pub fn is_joint(&self) -> bool {
        matches!(self.kind, CollisionKind::Joint(_))
    }

    pub fn joint(&self) -> Option<&Joint> {
        match &self.kind {
            CollisionKind::Joint(joint) => Some(joint),
            _ => None,
        }
    }

    pub fn vertex(&self) -> Option<VertexKey> {
        match self.kind {
            CollisionKind::CornerEdge { vertex, .. } => Some(vertex),
            _ => None,
        }
    }

    pub fn primary_edge(&self) -> Option<EdgeKey> {
        match self.kind {
            CollisionKind::CornerEdge { primary_edge, .. }
            | CollisionKind::EdgeEdge { primary_edge, .. } => Some(primary_edge),
            CollisionKind::Joint(_) => None,
        }
    }

    pub fn normal_edge(&self) -> Option<EdgeKey> {
        match self.kind {
            CollisionKind::CornerEdge { normal_edge, .. }
            | CollisionKind::EdgeEdge { normal_edge, .. } => Some(normal_edge),
            CollisionKind::Joint(_) => None,
        }
    }

    // feature queries

    pub fn has_body(&self, body: BodyKey) -> bool {
        self.primary_body == body || self.normal_body == body
    }

    /// Whether the record involves this exact edge on either side.
    pub fn has_edge(&self, edge: EdgeKey) -> bool {
        match self.kind {
            CollisionKind::CornerEdge {
                primary_edge,
                primary_edge2,
                normal_edge,
                ..
            } => primary_edge == edge || primary_edge2 == Some(edge) || normal_edge == edge,
            CollisionKind::EdgeEdge {
                primary_edge,
                normal_edge,
            } => primary_edge == edge || normal_edge == edge,
            CollisionKind::Joint(_) => false,
        }
    }

    pub fn has_vertex(&self, vertex: VertexKey) -> bool {
        self.vertex() == Some(vertex)
    }

    /// Verify the record still matches the geometry it refers to.
    ///
    /// A failure means the record was built or modified incorrectly.
    /// Constructors and updates assert this in debug builds.
    pub fn check_consistent(&self, bodies: &BodySet) -> Result<(), CollisionError> {
        use CollisionError::Inconsistent;
        if self.primary_body == self.normal_body {
            return Err(CollisionError::SameBody(self.primary_body));
        }
        bodies.body(self.primary_body)?;
        bodies.body(self.normal_body)?;

        match self.kind {
            CollisionKind::CornerEdge {
                vertex,
                primary_edge,
                primary_edge2,
                normal_edge,
            } => {
                if vertex.body != self.primary_body || normal_edge.body != self.normal_body {
                    return Err(Inconsistent("features are on the wrong bodies"));
                }
                let v = bodies.vertex(vertex)?;
                if primary_edge != v.edge1_key(vertex.body) {
                    return Err(Inconsistent("primary edge does not end at the vertex"));
                }
                if primary_edge2 != v.edge2_key(vertex.body) {
                    return Err(Inconsistent(
                        "second primary edge does not match the vertex's end point status",
                    ));
                }
                bodies.edge(primary_edge)?;
                if self.ball_object {
                    return Err(Inconsistent("a corner is never a ball"));
                }
                if self.ball_normal == bodies.edge(normal_edge)?.is_straight() {
                    return Err(Inconsistent("ball flag does not match the normal edge"));
                }
            }
            CollisionKind::EdgeEdge {
                primary_edge,
                normal_edge,
            } => {
                if primary_edge.body != self.primary_body || normal_edge.body != self.normal_body {
                    return Err(Inconsistent("features are on the wrong bodies"));
                }
                let primary_straight = bodies.edge(primary_edge)?.is_straight();
                let normal_straight = bodies.edge(normal_edge)?.is_straight();
                if primary_straight && normal_straight {
                    return Err(CollisionError::StraightEdgePair);
                }
                if self.ball_object == primary_straight || self.ball_normal == normal_straight {
                    return Err(Inconsistent("ball flags do not match the edges"));
                }
            }
            CollisionKind::Joint(joint) => {
                if joint.body1() != self.primary_body || joint.body2() != self.normal_body {
                    return Err(Inconsistent("joint bodies do not match the record"));
                }
                if self.ball_object || self.ball_normal {
                    return Err(Inconsistent("joints have no curved sides"));
                }
            }
        }
        Ok(())
    }

    // updating

    /// Recompute the contact geometry from the current poses of the bodies.
    ///
    /// Returns `Ok(false)` without changing anything but the cached U1 and U2
    /// if the features no longer have a well-defined contact, for instance when a vertex
    /// has moved past the end of a circular edge. Such a record should be dropped.
    pub fn update_collision(
        &mut self,
        bodies: &BodySet,
        time: f64,
    ) -> Result<bool, CollisionError> {
        let geometry = self.contact_geometry(bodies)?;
        Ok(self.apply(geometry, bodies, time))
    }

    /// Contact geometry at the current body poses, None if it has degenerated.
    pub(crate) fn contact_geometry(
        &self,
        bodies: &BodySet,
    ) -> Result<Option<ContactGeometry>, CollisionError> {
        match self.kind {
            CollisionKind::CornerEdge {
                vertex,
                normal_edge,
                ..
            } => corner_edge::contact_geometry(bodies, vertex, normal_edge),
            CollisionKind::EdgeEdge {
                primary_edge,
                normal_edge,
            } => edge_edge::contact_geometry(bodies, primary_edge, normal_edge),
            CollisionKind::Joint(joint) => Ok(Some(joint.contact_geometry(bodies)?)),
        }
    }

    /// Second half of an update. Returns whether the geometry was fresh.
    pub(crate) fn apply(
        &mut self,
        geometry: Option<ContactGeometry>,
        bodies: &BodySet,
        time: f64,
    ) -> bool {
        self.u1.set(None);
        self.u2.set(None);

        let Some(geometry) = geometry else {
            log::trace!(
                "{} collision between {:?} and {:?} not updated at time {}: no contact geometry",
                self.creator,
                self.primary_body,
                self.normal_body,
                time,
            );
            return false;
        };

        self.impact1 = geometry.impact1;
        self.impact2 = geometry.impact2;
        self.normal = geometry.normal;
        self.distance = geometry.distance;
        self.update_time = Some(time);
        debug_assert_eq!(self.check_consistent(bodies), Ok(()));
        true
    }

    /// True if no update has produced fresh geometry at `time`.
    pub fn is_stale(&self, time: f64) -> bool {
        self.update_time != Some(time)
    }

    // vectors for the solver

    /// Vector from the primary body's center of mass to the impact point, in world coordinates.
    pub fn r1(&self, bodies: &BodySet) -> Result<m::Vec2, CollisionError> {
        Ok(self.impact1 - bodies.body(self.primary_body)?.position())
    }

    /// Vector from the normal body's center of mass to the impact point, in world coordinates.
    pub fn r2(&self, bodies: &BodySet) -> Result<m::Vec2, CollisionError> {
        let impact = self.impact2.unwrap_or(self.impact1);
        Ok(impact - bodies.body(self.normal_body)?.position())
    }

    /// Vector from the primary body's center of mass to the center of its curved
    /// contact surface, or [`r1`][Self::r1] if that side is not curved.
    ///
    /// Memoized until the next [`update_collision`][Self::update_collision].
    pub fn u1(&self, bodies: &BodySet) -> Result<m::Vec2, CollisionError> {
        if let Some(u1) = self.u1.get() {
            return Ok(u1);
        }
        let u1 = match self.kind {
            CollisionKind::EdgeEdge { primary_edge, .. } if self.ball_object => {
                circle_center_offset(bodies, primary_edge)?
            }
            _ => self.r1(bodies)?,
        };
        self.u1.set(Some(u1));
        Ok(u1)
    }

    /// Vector from the normal body's center of mass to the center of its curved
    /// contact surface, or [`r2`][Self::r2] if that side is not curved.
    ///
    /// Memoized until the next [`update_collision`][Self::update_collision].
    pub fn u2(&self, bodies: &BodySet) -> Result<m::Vec2, CollisionError> {
        if let Some(u2) = self.u2.get() {
            return Ok(u2);
        }
        let u2 = match self.normal_edge() {
            Some(normal_edge) if self.ball_normal => circle_center_offset(bodies, normal_edge)?,
            _ => self.r2(bodies)?,
        };
        self.u2.set(Some(u2));
        Ok(u2)
    }

    // classification

    /// Relative velocity of the impact points along the normal.
    /// Negative when the bodies are approaching each other.
    pub fn velocity(&self, bodies: &BodySet) -> Result<f64, CollisionError> {
        let v1 = bodies
            .body(self.primary_body)?
            .point_velocity(self.impact1);
        let v2 = bodies
            .body(self.normal_body)?
            .point_velocity(self.impact2.unwrap_or(self.impact1));
        Ok(self.normal.dot(v1 - v2))
    }

    /// Whether the bodies overlap. Joints never count as colliding.
    pub fn is_colliding(&self) -> bool {
        !self.is_joint() && self.distance < 0.0
    }

    /// Whether the gap is within the distance tolerance. Joints are always touching.
    pub fn is_touching(&self) -> bool {
        self.is_joint() || self.distance < self.tolerances.distance_tol
    }

    /// Whether this is a resting contact to be handled with forces
    /// rather than an impact to be handled with an impulse.
    pub fn contact(&self, bodies: &BodySet) -> Result<bool, CollisionError> {
        if self.is_joint() {
            return Ok(true);
        }
        if !self.is_touching() {
            return Ok(false);
        }
        Ok(self.velocity(bodies)?.abs() < self.tolerances.velocity_tol)
    }

    /// Whether the gap is near enough to the target gap that a search
    /// for the time of collision can stop.
    ///
    /// With `allow_tiny`, any small positive gap is accepted as well.
    pub fn close_enough(&self, allow_tiny: bool) -> bool {
        if self.is_joint() {
            return true;
        }
        let tol = &self.tolerances;
        if allow_tiny && self.distance > 0.0 && self.distance <= tol.distance_tol {
            return true;
        }
        let target = tol.target_gap();
        (self.distance - target).abs() <= tol.accuracy * target
    }

    // deduplication

    /// Nearness tolerance scaled by the smaller radius of curvature.
    pub fn nearness(&self) -> f64 {
        self.tolerances.nearness(self.radius1.min(self.radius2))
    }

    /// Whether two records describe the same contact.
    ///
    /// They must be between the same primary and normal body,
    /// and either involve the same features (the same vertex, the same edge pair
    /// or the same joint) or share the normal edge.
    /// A vertex touching two edges of the normal body at once is one contact.
    /// Their impact points must also be within nearness of each other
    /// and their normals close to parallel or anti-parallel.
    ///
    /// The relation is symmetric but not transitive.
    pub fn similar_to(&self, other: &RigidBodyCollision) -> bool {
        if self.primary_body != other.primary_body || self.normal_body != other.normal_body {
            return false;
        }

        let same_features = match (self.kind, other.kind) {
            (
                CollisionKind::CornerEdge { vertex: v1, .. },
                CollisionKind::CornerEdge { vertex: v2, .. },
            ) => v1 == v2,
            (
                CollisionKind::EdgeEdge {
                    primary_edge: p1,
                    normal_edge: n1,
                },
                CollisionKind::EdgeEdge {
                    primary_edge: p2,
                    normal_edge: n2,
                },
            ) => p1 == p2 && n1 == n2,
            (CollisionKind::Joint(j1), CollisionKind::Joint(j2)) => j1.id() == j2.id(),
            _ => false,
        };

        if !same_features {
            // both normal edges are on the same body, so this is symmetric
            match self.normal_edge() {
                Some(edge) if other.has_edge(edge) => {}
                _ => return false,
            }
        }

        self.is_close_to(other)
    }

    fn is_close_to(&self, other: &RigidBodyCollision) -> bool {
        let nearness = self.nearness().min(other.nearness());
        if (self.impact1 - other.impact1).mag() > nearness {
            return false;
        }
        let min_similarity = self
            .tolerances
            .normal_similarity
            .max(other.tolerances.normal_similarity);
        self.normal.dot(*other.normal).abs() >= min_similarity
    }
}

/// World-space offset from a body's center of mass to the center of a circular edge.
fn circle_center_offset(bodies: &BodySet, edge: EdgeKey) -> Result<m::Vec2, CollisionError> {
    let center = bodies
        .edge(edge)?
        .center_body()
        .ok_or(CollisionError::Inconsistent("ball flag set for a straight edge"))?;
    Ok(bodies.body(edge.body)?.rotate_body_to_world(center))
}
