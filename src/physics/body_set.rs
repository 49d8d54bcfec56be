use super::{CollisionError, Edge, EdgeKey, RigidBody, Tolerances, Vertex, VertexKey};

use thunderdome as td;

/// Key type to look up a body stored in a [`BodySet`][self::BodySet].
///
/// Keys are compared by identity: a key to a removed body never matches
/// a body inserted later into the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyKey(pub(crate) td::Index);

impl BodyKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    /// Useful for creating your own mappings from bodies to other things.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }

    /// Key to the edge with the given index on this body.
    #[inline]
    pub fn edge(self, index: usize) -> EdgeKey {
        EdgeKey { body: self, index }
    }

    /// Key to the vertex with the given index on this body.
    #[inline]
    pub fn vertex(self, index: usize) -> VertexKey {
        VertexKey { body: self, index }
    }
}

/// Storage for rigid bodies and the collision tolerances they share.
#[derive(Debug, Default)]
pub struct BodySet {
    bodies: td::Arena<RigidBody>,
    tolerances: Tolerances,
}

impl BodySet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default tolerances in a builder-like chain.
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    #[inline]
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Change the tolerances. Collision records already built keep the ones
    /// that were in force when they were created.
    pub fn set_tolerances(&mut self, tolerances: Tolerances) {
        self.tolerances = tolerances;
    }

    /// Access a [`RigidBody`][super::RigidBody], if it still exists.
    #[inline]
    pub fn get_body(&self, body: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(body.0)
    }

    /// Mutably access a [`RigidBody`][super::RigidBody], if it still exists.
    #[inline]
    pub fn get_body_mut(&mut self, body: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(body.0)
    }

    /// Like [`get_body`][Self::get_body], but a missing body is an error.
    #[inline]
    pub fn body(&self, body: BodyKey) -> Result<&RigidBody, CollisionError> {
        self.get_body(body).ok_or(CollisionError::MissingBody(body))
    }

    #[inline]
    pub fn body_mut(&mut self, body: BodyKey) -> Result<&mut RigidBody, CollisionError> {
        self.get_body_mut(body)
            .ok_or(CollisionError::MissingBody(body))
    }

    /// Look up an edge. Fails if the body is gone or has no edge at that index.
    pub fn edge(&self, edge: EdgeKey) -> Result<&Edge, CollisionError> {
        self.body(edge.body)?
            .edge(edge.index)
            .ok_or(CollisionError::MissingEdge(edge))
    }

    /// Look up a vertex. Fails if the body is gone or has no vertex at that index.
    pub fn vertex(&self, vertex: VertexKey) -> Result<&Vertex, CollisionError> {
        self.body(vertex.body)?
            .vertex(vertex.index)
            .ok_or(CollisionError::MissingVertex(vertex))
    }

    /// Insert a body.
    pub fn insert_body(&mut self, body: RigidBody) -> BodyKey {
        BodyKey(self.bodies.insert(body))
    }

    /// Remove a body, returning it if it still existed.
    ///
    /// Other bodies forget any non-collide relationship with it.
    pub fn remove_body(&mut self, body: BodyKey) -> Option<RigidBody> {
        let removed = self.bodies.remove(body.0)?;
        for (_, other) in self.bodies.iter_mut() {
            other.remove_non_collide(body);
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> + '_ {
        self.bodies.iter().map(|(idx, body)| (BodyKey(idx), body))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.len() == 0
    }

    /// Mark two bodies as never having ordinary contacts with each other.
    pub fn add_non_collide(&mut self, b1: BodyKey, b2: BodyKey) -> Result<(), CollisionError> {
        if b1 == b2 {
            return Err(CollisionError::SameBody(b1));
        }
        match self.bodies.get2_mut(b1.0, b2.0) {
            (Some(body1), Some(body2)) => {
                body1.add_non_collide(b2);
                body2.add_non_collide(b1);
                Ok(())
            }
            (None, _) => Err(CollisionError::MissingBody(b1)),
            (_, None) => Err(CollisionError::MissingBody(b2)),
        }
    }

    /// Whether ordinary contact detection should consider this pair of bodies.
    ///
    /// False for a body paired with itself, for missing bodies,
    /// for pairs marked non-colliding and for pairs where neither body can move.
    pub fn can_collide(&self, b1: BodyKey, b2: BodyKey) -> bool {
        if b1 == b2 {
            return false;
        }
        match (self.get_body(b1), self.get_body(b2)) {
            (Some(body1), Some(body2)) => {
                (body1.mass.is_finite() || body2.mass.is_finite())
                    && !body1.does_not_collide(b2)
                    && !body2.does_not_collide(b1)
            }
            _ => false,
        }
    }

    /// Whether two edges of different bodies may generate contacts,
    /// taking both body-level and edge-level filtering into account.
    pub fn edges_may_collide(&self, e1: EdgeKey, e2: EdgeKey) -> bool {
        if !self.can_collide(e1.body, e2.body) {
            return false;
        }
        match (self.get_body(e1.body), self.get_body(e2.body)) {
            (Some(body1), Some(body2)) => {
                !body1.non_collide_edge(e2) && !body2.non_collide_edge(e1)
            }
            _ => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bodies.clear();
    }
}
