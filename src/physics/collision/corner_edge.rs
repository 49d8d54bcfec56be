//! A vertex of one body against an edge of another.

use super::{CollisionKind, ContactGeometry, RigidBodyCollision};
use crate::math::Unit;
use crate::physics::{BodySet, CollisionError, EdgeKey, VertexKey};

impl RigidBodyCollision {
    /// Create a record of `vertex` touching `normal_edge`.
    ///
    /// The vertex's adjacent edges become the primary edges. The primary side is never
    /// treated as a ball, even for a decorated vertex on a curved edge: its curvature
    /// only loosens the nearness tolerance.
    pub fn corner_edge(
        bodies: &BodySet,
        vertex: VertexKey,
        normal_edge: EdgeKey,
    ) -> Result<Self, CollisionError> {
        let v = bodies.vertex(vertex)?;
        let edge = bodies.edge(normal_edge)?;
        let kind = CollisionKind::CornerEdge {
            vertex,
            primary_edge: v.edge1_key(vertex.body),
            primary_edge2: v.edge2_key(vertex.body),
            normal_edge,
        };
        let c = Self::new(
            bodies,
            kind,
            vertex.body,
            normal_edge.body,
            false,
            !edge.is_straight(),
            v.curvature(),
            edge.curvature(),
            "CornerEdge",
        )?;
        debug_assert_eq!(c.check_consistent(bodies), Ok(()));
        Ok(c)
    }
}

/// Project the vertex onto the normal edge in the normal body's frame.
/// None if the edge has no point corresponding to the vertex.
pub(super) fn contact_geometry(
    bodies: &BodySet,
    vertex: VertexKey,
    normal_edge: EdgeKey,
) -> Result<Option<ContactGeometry>, CollisionError> {
    let primary = bodies.body(vertex.body)?;
    let other = bodies.body(normal_edge.body)?;
    let edge = bodies.edge(normal_edge)?;

    let impact1 = primary.body_to_world(bodies.vertex(vertex)?.loc_body());
    let local = other.world_to_body(impact1);
    let Some((_, normal)) = edge.point_on_edge(local) else {
        return Ok(None);
    };

    Ok(Some(ContactGeometry {
        impact1,
        impact2: None,
        normal: Unit::new_unchecked(other.rotate_body_to_world(*normal)),
        distance: edge.distance_to_line(local),
    }))
}
