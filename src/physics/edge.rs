use super::{BodyKey, RigidBody};
use crate::math::{self as m, Unit};

/// Centers of two circles closer than this have no well-defined line between them.
const MIN_CENTER_SEPARATION: f64 = 1e-12;
/// Slack when deciding if an angle lies within an arc,
/// so that points exactly on an arc's end points count as inside.
const ARC_ANGLE_SLACK: f64 = 1e-9;

/// Key identifying an edge: the body it belongs to and its index in that body's edge list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub body: BodyKey,
    pub index: usize,
}

/// A piece of the boundary of a body, either a line segment or a circular arc.
///
/// Edges are directed from their start vertex to their end vertex
/// with the body on the left side, i.e. paths wind counterclockwise around the body.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub(crate) index: usize,
    pub(crate) start_vertex: usize,
    pub(crate) end_vertex: usize,
    pub(crate) shape: EdgeShape,
}

/// The geometry of an edge in body coordinates.
#[derive(Clone, Copy, Debug)]
pub enum EdgeShape {
    Straight {
        start: m::Vec2,
        end: m::Vec2,
        /// Normal pointing away from the body.
        outward: Unit<m::Vec2>,
    },
    Circular {
        center: m::Vec2,
        radius: f64,
        /// Convex arcs bulge out of the body and run counterclockwise around the center.
        /// Concave arcs are hollows in the body and run clockwise.
        convex: bool,
        /// Direction angle of the start point as seen from the center.
        start_angle: f64,
        /// Angle swept from start to end, `TAU` for a full circle.
        span: f64,
    },
}

/// Contact between a pair of edges, in world coordinates.
#[derive(Clone, Copy, Debug)]
pub struct EdgeContact {
    /// Point on the primary edge.
    pub impact1: m::Vec2,
    /// Point on the normal edge.
    pub impact2: m::Vec2,
    /// Points from the normal edge toward the primary edge.
    pub normal: Unit<m::Vec2>,
    /// Gap between the edges along the normal, negative if they overlap.
    pub distance: f64,
}

impl Edge {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the vertex this edge starts at.
    #[inline]
    pub fn start_vertex(&self) -> usize {
        self.start_vertex
    }

    /// Index of the vertex this edge ends at.
    #[inline]
    pub fn end_vertex(&self) -> usize {
        self.end_vertex
    }

    #[inline]
    pub fn shape(&self) -> &EdgeShape {
        &self.shape
    }

    #[inline]
    pub fn is_straight(&self) -> bool {
        matches!(self.shape, EdgeShape::Straight { .. })
    }

    /// Radius of curvature, infinite for straight edges.
    pub fn curvature(&self) -> f64 {
        match self.shape {
            EdgeShape::Straight { .. } => f64::INFINITY,
            EdgeShape::Circular { radius, .. } => radius,
        }
    }

    /// Center of the circle a curved edge lies on, in body coordinates.
    pub fn center_body(&self) -> Option<m::Vec2> {
        match self.shape {
            EdgeShape::Straight { .. } => None,
            EdgeShape::Circular { center, .. } => Some(center),
        }
    }

    /// Whether the direction from a circular edge's center to `p_body`
    /// passes through the arc. Always true for straight edges.
    pub fn is_within_arc(&self, p_body: m::Vec2) -> bool {
        match self.shape {
            EdgeShape::Straight { .. } => true,
            EdgeShape::Circular {
                center,
                convex,
                start_angle,
                span,
                ..
            } => {
                let angle = m::direction_angle(p_body - center);
                let sweep = m::sweep_between(start_angle, angle, convex);
                // the sweep wraps to almost TAU just before the start angle
                sweep <= span + ARC_ANGLE_SLACK || sweep >= std::f64::consts::TAU - ARC_ANGLE_SLACK
            }
        }
    }

    /// Find the point on this edge corresponding to a point in body coordinates,
    /// along with the outward normal there.
    ///
    /// Straight edges are treated as infinite lines, so they always have a point.
    /// For circular edges the point lies on the ray from the center through `p_body`
    /// and there is none if that ray misses the arc.
    pub fn point_on_edge(&self, p_body: m::Vec2) -> Option<(m::Vec2, Unit<m::Vec2>)> {
        match self.shape {
            EdgeShape::Straight { start, outward, .. } => {
                let offset = (p_body - start).dot(*outward);
                Some((p_body - *outward * offset, outward))
            }
            EdgeShape::Circular {
                center,
                radius,
                convex,
                ..
            } => {
                let dir = Unit::try_new(p_body - center, MIN_CENTER_SEPARATION)?;
                if !self.is_within_arc(p_body) {
                    return None;
                }
                let normal = if convex { dir } else { -dir };
                Some((center + *dir * radius, normal))
            }
        }
    }

    /// Signed distance from a point in body coordinates to the line or circle
    /// this edge lies on. Positive outside the body.
    pub fn distance_to_line(&self, p_body: m::Vec2) -> f64 {
        match self.shape {
            EdgeShape::Straight { start, outward, .. } => (p_body - start).dot(*outward),
            EdgeShape::Circular {
                center,
                radius,
                convex,
                ..
            } => {
                let dist = (p_body - center).mag();
                if convex {
                    dist - radius
                } else {
                    radius - dist
                }
            }
        }
    }

    /// Compute the contact between this edge (on `body`) and `other` (on `other_body`),
    /// with this edge on the primary side.
    ///
    /// At least one of the edges must be curved, the closest points are then found
    /// along the line through the circle center(s). Returns None if there is no such pair
    /// of points: a concave arc facing a straight edge or another concave arc,
    /// coincident centers, or a contact point outside the extent of an arc.
    pub fn improve_accuracy_edge(
        &self,
        body: &RigidBody,
        other: &Edge,
        other_body: &RigidBody,
    ) -> Option<EdgeContact> {
        use EdgeShape::*;
        let contact = match (self.shape, other.shape) {
            (Straight { .. }, Straight { .. }) => return None,
            (
                Circular {
                    center: c1,
                    radius: r1,
                    convex: convex1,
                    ..
                },
                Circular {
                    center: c2,
                    radius: r2,
                    convex: convex2,
                    ..
                },
            ) => {
                let c1 = body.body_to_world(c1);
                let c2 = other_body.body_to_world(c2);
                let u = Unit::try_new(c1 - c2, MIN_CENTER_SEPARATION)?;
                let center_dist = (c1 - c2).mag();
                match (convex1, convex2) {
                    (true, true) => EdgeContact {
                        impact1: c1 - *u * r1,
                        impact2: c2 + *u * r2,
                        normal: u,
                        distance: center_dist - r1 - r2,
                    },
                    // primary ball resting in a hollow of the normal body
                    (true, false) => EdgeContact {
                        impact1: c1 + *u * r1,
                        impact2: c2 + *u * r2,
                        normal: -u,
                        distance: r2 - r1 - center_dist,
                    },
                    // normal body's ball in a hollow of the primary body
                    (false, true) => EdgeContact {
                        impact1: c1 - *u * r1,
                        impact2: c2 - *u * r2,
                        normal: -u,
                        distance: r1 - r2 - center_dist,
                    },
                    (false, false) => return None,
                }
            }
            (
                Circular {
                    center,
                    radius,
                    convex,
                    ..
                },
                Straight { .. },
            ) => {
                if !convex {
                    return None;
                }
                let center = body.body_to_world(center);
                let center_other = other_body.world_to_body(center);
                let (point, normal) = other.point_on_edge(center_other)?;
                let normal = Unit::new_unchecked(other_body.rotate_body_to_world(*normal));
                EdgeContact {
                    impact1: center - *normal * radius,
                    impact2: other_body.body_to_world(point),
                    normal,
                    distance: other.distance_to_line(center_other) - radius,
                }
            }
            (
                Straight { .. },
                Circular {
                    center,
                    radius,
                    convex,
                    ..
                },
            ) => {
                if !convex {
                    return None;
                }
                let center = other_body.body_to_world(center);
                let center_self = body.world_to_body(center);
                let (point, outward) = self.point_on_edge(center_self)?;
                let normal = -Unit::new_unchecked(body.rotate_body_to_world(*outward));
                EdgeContact {
                    impact1: body.body_to_world(point),
                    impact2: center + *normal * radius,
                    normal,
                    distance: self.distance_to_line(center_self) - radius,
                }
            }
        };

        if self.is_within_arc(body.world_to_body(contact.impact1))
            && other.is_within_arc(other_body.world_to_body(contact.impact2))
        {
            Some(contact)
        } else {
            None
        }
    }
}
