//! An edge of one body against an edge of another, at least one of them curved.

use super::{CollisionKind, ContactGeometry, RigidBodyCollision};
use crate::physics::{BodySet, CollisionError, EdgeKey};

impl RigidBodyCollision {
    /// Create a record of `primary_edge` touching `normal_edge`.
    ///
    /// Two straight edges can only touch along a segment, which is represented
    /// by corner collisions of its end points instead, so that pair is an error.
    pub fn edge_edge(
        bodies: &BodySet,
        primary_edge: EdgeKey,
        normal_edge: EdgeKey,
    ) -> Result<Self, CollisionError> {
        let e1 = bodies.edge(primary_edge)?;
        let e2 = bodies.edge(normal_edge)?;
        if e1.is_straight() && e2.is_straight() {
            return Err(CollisionError::StraightEdgePair);
        }
        let c = Self::new(
            bodies,
            CollisionKind::EdgeEdge {
                primary_edge,
                normal_edge,
            },
            primary_edge.body,
            normal_edge.body,
            !e1.is_straight(),
            !e2.is_straight(),
            e1.curvature(),
            e2.curvature(),
            "EdgeEdge",
        )?;
        debug_assert_eq!(c.check_consistent(bodies), Ok(()));
        Ok(c)
    }
}

pub(super) fn contact_geometry(
    bodies: &BodySet,
    primary_edge: EdgeKey,
    normal_edge: EdgeKey,
) -> Result<Option<ContactGeometry>, CollisionError> {
    let e1 = bodies.edge(primary_edge)?;
    let e2 = bodies.edge(normal_edge)?;
    let contact = e1.improve_accuracy_edge(
        bodies.body(primary_edge.body)?,
        e2,
        bodies.body(normal_edge.body)?,
    );
    Ok(contact.map(|contact| ContactGeometry {
        impact1: contact.impact1,
        impact2: Some(contact.impact2),
        normal: contact.normal,
        distance: contact.distance,
    }))
}
