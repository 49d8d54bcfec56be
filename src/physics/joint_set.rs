use super::{BodySet, CollisionError, Joint, RigidBodyCollision};

use thunderdome as td;

/// Key type to look up a joint stored in the physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointKey(pub(crate) td::Index);

/// Manager struct holding joints inside of a physics world.
#[derive(Clone, Debug, Default)]
pub struct JointSet {
    joints: td::Arena<Joint>,
}

impl JointSet {
    /// Add a joint to the physics world.
    /// Returns a key that can be used to remove it later.
    ///
    /// Prefer [`PhysicsWorld::add_joint`][super::PhysicsWorld::add_joint],
    /// which also builds the joint.
    #[inline]
    pub fn insert(&mut self, joint: Joint) -> JointKey {
        JointKey(self.joints.insert(joint))
    }

    /// Access a Joint in the physics world, if it still exists.
    #[inline]
    pub fn get(&self, key: JointKey) -> Option<&Joint> {
        self.joints.get(key.0)
    }

    /// Remove a joint from the physics world, returning it if it still existed.
    ///
    /// Joints also disappear when either of their bodies is removed
    /// through [`PhysicsWorld::remove_body`][super::PhysicsWorld::remove_body],
    /// so it's not guaranteed the joint will exist
    /// even if it hasn't been explicitly removed before.
    #[inline]
    pub fn remove(&mut self, key: JointKey) -> Option<Joint> {
        self.joints.remove(key.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointKey, &Joint)> + '_ {
        self.joints.iter().map(|(idx, joint)| (JointKey(idx), joint))
    }

    /// Keep only the joints for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Joint) -> bool) {
        self.joints.retain(|_, joint| keep(joint));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.len() == 0
    }

    /// Put a fresh record of every joint at the front of `collisions`.
    pub fn add_collisions(
        &self,
        collisions: &mut Vec<RigidBodyCollision>,
        bodies: &BodySet,
        time: f64,
        accuracy: f64,
    ) -> Result<(), CollisionError> {
        for (_, joint) in self.joints.iter() {
            joint.add_collision(collisions, bodies, time, accuracy)?;
        }
        Ok(())
    }

    /// [`Align`][super::Joint::align] every joint once, in storage order.
    ///
    /// Bodies connected by several joints end up satisfying the last one aligned.
    pub fn align_all(&self, bodies: &mut BodySet) -> Result<(), CollisionError> {
        for (_, joint) in self.joints.iter() {
            joint.align(bodies)?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.joints.clear();
    }
}
