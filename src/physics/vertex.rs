use super::{BodyKey, EdgeKey};
use crate::math as m;

/// Key identifying a vertex: the body it belongs to and its index in that body's vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey {
    pub body: BodyKey,
    pub index: usize,
}

/// A point on the boundary of a body.
///
/// End points join two edges of a path. Decorated vertices sit in the middle
/// of a single (usually curved) edge so that the point-like parts
/// of curved surfaces can be found by vertex-edge collision checks.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub(crate) id: usize,
    pub(crate) loc_body: m::Vec2,
    pub(crate) edge1: usize,
    pub(crate) edge2: Option<usize>,
    pub(crate) curvature: f64,
}

impl Vertex {
    /// Index of the vertex in its body's vertex list.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Position in body coordinates.
    #[inline]
    pub fn loc_body(&self) -> m::Vec2 {
        self.loc_body
    }

    /// The edge that ends at this vertex, or the edge a decorated vertex lies on.
    #[inline]
    pub fn edge1(&self) -> usize {
        self.edge1
    }

    /// The edge that starts at this vertex. Only end points have one.
    #[inline]
    pub fn edge2(&self) -> Option<usize> {
        self.edge2
    }

    /// Whether this vertex joins two edges (as opposed to decorating the middle of one).
    #[inline]
    pub fn is_end_point(&self) -> bool {
        self.edge2.is_some()
    }

    /// Radius of curvature at this vertex: infinite for sharp corners
    /// and points on straight edges, the arc radius for points on circular edges.
    #[inline]
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    pub(crate) fn edge1_key(&self, body: BodyKey) -> EdgeKey {
        body.edge(self.edge1)
    }

    pub(crate) fn edge2_key(&self, body: BodyKey) -> Option<EdgeKey> {
        self.edge2.map(|e| body.edge(e))
    }
}
