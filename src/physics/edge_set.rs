//! Selections of edges, used to mark paths of edges that should be treated specially
//! (for example, the track a wheel rides on must not collide with the wheel's axle).

use super::{BodyKey, BodySet, CollisionError, EdgeKey, RigidBody};

use std::rc::Rc;

/// A set of edges that can answer membership queries.
pub trait EdgeSet: std::fmt::Debug {
    fn contains(&self, edge: EdgeKey) -> bool;
}

/// A contiguous span of one body's edge list, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRange {
    body: BodyKey,
    begin: usize,
    end: usize,
}

impl EdgeRange {
    /// Create a range covering edges `begin..=end` of `body`.
    pub fn new(
        bodies: &BodySet,
        body: BodyKey,
        begin: usize,
        end: usize,
    ) -> Result<Self, CollisionError> {
        let edge_count = bodies.body(body)?.edge_count();
        if end < begin || end >= edge_count {
            return Err(CollisionError::InvalidEdgeRange {
                begin,
                end,
                edge_count,
            });
        }
        Ok(Self { body, begin, end })
    }

    /// Find the range covering the whole path of edges that `edge` belongs to.
    ///
    /// Relies on edge indices increasing along each path, which is how
    /// [`RigidBodyBuilder`][super::RigidBodyBuilder] numbers them.
    /// The walk backward stops at the first edge whose predecessor has a larger index
    /// and the walk forward at the first edge whose successor has a smaller one.
    pub fn from_edge(bodies: &BodySet, edge: EdgeKey) -> Result<Self, CollisionError> {
        let body = bodies.body(edge.body)?;
        bodies.edge(edge)?;

        let mut begin = edge.index;
        while let Some(prev) = previous_edge(body, begin).filter(|&prev| prev < begin) {
            begin = prev;
        }
        let mut end = edge.index;
        while let Some(next) = next_edge(body, end).filter(|&next| next > end) {
            end = next;
        }

        debug_assert!(
            (begin..end).all(|i| next_edge(body, i) == Some(i + 1)),
            "edges {}..={} of {} are not a contiguous path",
            begin,
            end,
            body.name(),
        );

        Ok(Self {
            body: edge.body,
            begin,
            end,
        })
    }

    /// Create a range covering every edge of `body`.
    pub fn from_rigid_body(bodies: &BodySet, body: BodyKey) -> Result<Self, CollisionError> {
        let edge_count = bodies.body(body)?.edge_count();
        Self::new(bodies, body, 0, edge_count.saturating_sub(1))
    }

    #[inline]
    pub fn body(&self) -> BodyKey {
        self.body
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }
}

fn previous_edge(body: &RigidBody, edge: usize) -> Option<usize> {
    let start = body.edge(edge)?.start_vertex();
    Some(body.vertex(start)?.edge1())
}

fn next_edge(body: &RigidBody, edge: usize) -> Option<usize> {
    let end = body.edge(edge)?.end_vertex();
    body.vertex(end)?.edge2()
}

impl EdgeSet for EdgeRange {
    #[inline]
    fn contains(&self, edge: EdgeKey) -> bool {
        edge.body == self.body && edge.index >= self.begin && edge.index <= self.end
    }
}

/// A union of edge ranges, possibly on several bodies.
///
/// Ranges are held by shared handle and compared by identity,
/// so two distinct ranges with equal bounds are separate members.
#[derive(Clone, Debug, Default)]
pub struct EdgeGroup {
    ranges: Vec<Rc<EdgeRange>>,
}

impl EdgeGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range unless this exact range is already a member.
    pub fn add(&mut self, range: Rc<EdgeRange>) {
        if !self.ranges.iter().any(|r| Rc::ptr_eq(r, &range)) {
            self.ranges.push(range);
        }
    }

    /// Remove a range, returning whether it was a member.
    pub fn remove(&mut self, range: &Rc<EdgeRange>) -> bool {
        let len_before = self.ranges.len();
        self.ranges.retain(|r| !Rc::ptr_eq(r, range));
        self.ranges.len() != len_before
    }

    pub fn ranges(&self) -> &[Rc<EdgeRange>] {
        &self.ranges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl EdgeSet for EdgeGroup {
    fn contains(&self, edge: EdgeKey) -> bool {
        self.ranges.iter().any(|r| r.contains(edge))
    }
}
