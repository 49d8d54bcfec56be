//! Joints holding a point of one body against a point of another.

use super::{
    collision::ContactGeometry, BodyKey, BodySet, CollisionError, CollisionKind, PhysicsWorld,
    RigidBodyCollision,
};
use crate::math::{self as m, Angle, Unit};

const MIN_NORMAL_LENGTH: f64 = 1e-12;

/// Which frame a joint's normal is fixed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum CoordType {
    /// Fixed in world coordinates.
    World,
    /// Fixed in the second body's coordinates, rotating along with it.
    Body,
}

/// A bilateral connection keeping an attachment point on each of two bodies
/// at zero separation along a normal.
///
/// A joint is not a collision itself, it produces a fresh
/// [`RigidBodyCollision`][super::RigidBodyCollision] whenever asked,
/// with the first body on the primary side.
///
/// Create these with [`JointBuilder`][self::JointBuilder].
/// Joints can't be changed after they're built.
#[derive(Clone, Copy, Debug)]
pub struct Joint {
    id: usize,
    body1: BodyKey,
    body2: BodyKey,
    attach1_body: m::Vec2,
    attach2_body: m::Vec2,
    normal: Unit<m::Vec2>,
    normal_type: CoordType,
}

impl Joint {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> String {
        format!("JOINT{}", self.id)
    }

    #[inline]
    pub fn body1(&self) -> BodyKey {
        self.body1
    }

    #[inline]
    pub fn body2(&self) -> BodyKey {
        self.body2
    }

    pub fn has_body(&self, body: BodyKey) -> bool {
        self.body1 == body || self.body2 == body
    }

    /// Attachment point on the first body, in its body coordinates.
    pub fn attach1_body(&self) -> m::Vec2 {
        self.attach1_body
    }

    /// Attachment point on the second body, in its body coordinates.
    pub fn attach2_body(&self) -> m::Vec2 {
        self.attach2_body
    }

    pub fn normal_type(&self) -> CoordType {
        self.normal_type
    }

    /// World position of the attachment point on the first body.
    pub fn position1(&self, bodies: &BodySet) -> Result<m::Vec2, CollisionError> {
        Ok(bodies.body(self.body1)?.body_to_world(self.attach1_body))
    }

    /// World position of the attachment point on the second body.
    pub fn position2(&self, bodies: &BodySet) -> Result<m::Vec2, CollisionError> {
        Ok(bodies.body(self.body2)?.body_to_world(self.attach2_body))
    }

    /// The normal in world coordinates.
    pub fn normal_world(&self, bodies: &BodySet) -> Result<Unit<m::Vec2>, CollisionError> {
        match self.normal_type {
            CoordType::World => Ok(self.normal),
            CoordType::Body => Ok(bodies.body(self.body2)?.pose().rotation * self.normal),
        }
    }

    /// Separation of the attachment points along the normal. Zero when the joint is tight.
    pub fn normal_distance(&self, bodies: &BodySet) -> Result<f64, CollisionError> {
        let c = self.make_collision(bodies, 0.0, bodies.tolerances().accuracy)?;
        Ok(c.distance())
    }

    fn make_collision(
        &self,
        bodies: &BodySet,
        time: f64,
        accuracy: f64,
    ) -> Result<RigidBodyCollision, CollisionError> {
        let mut c = RigidBodyCollision::new(
            bodies,
            CollisionKind::Joint(*self),
            self.body1,
            self.body2,
            false,
            false,
            f64::INFINITY,
            f64::INFINITY,
            "Joint",
        )?;
        c.tolerances = c.tolerances.with_accuracy(accuracy);
        c.update_collision(bodies, time)?;
        c.set_detected_time(time);
        Ok(c)
    }

    /// Create an up-to-date record for this joint and put it at the front of `collisions`,
    /// ahead of any contacts found by the collision search.
    pub fn add_collision(
        &self,
        collisions: &mut Vec<RigidBodyCollision>,
        bodies: &BodySet,
        time: f64,
        accuracy: f64,
    ) -> Result<(), CollisionError> {
        let c = self.make_collision(bodies, time, accuracy)?;
        collisions.insert(0, c);
        Ok(())
    }

    /// Recompute a record of this joint from the current body poses.
    ///
    /// Each impact point comes from its own body's attachment point,
    /// so the two can drift apart when the joint is violated.
    /// Fails with [`CollisionError::Inconsistent`] if the record belongs to something else.
    pub fn update_collision(
        &self,
        c: &mut RigidBodyCollision,
        bodies: &BodySet,
        time: f64,
    ) -> Result<(), CollisionError> {
        if c.joint().map(|joint| joint.id()) != Some(self.id) {
            return Err(CollisionError::Inconsistent("record does not belong to this joint"));
        }
        c.update_collision(bodies, time)?;
        Ok(())
    }

    pub(crate) fn contact_geometry(
        &self,
        bodies: &BodySet,
    ) -> Result<ContactGeometry, CollisionError> {
        let impact1 = self.position1(bodies)?;
        let impact2 = self.position2(bodies)?;
        let normal = self.normal_world(bodies)?;
        Ok(ContactGeometry {
            impact1,
            impact2: Some(impact2),
            normal,
            distance: normal.dot(impact1 - impact2),
        })
    }

    /// Move one body so that the attachment points coincide,
    /// keeping its current rotation.
    ///
    /// The second body moves if it has finite mass, otherwise the first body does.
    /// If neither can move nothing happens.
    /// Only the pose changes, velocities are left as they were.
    pub fn align(&self, bodies: &mut BodySet) -> Result<(), CollisionError> {
        let b1 = bodies.body(self.body1)?;
        let b2 = bodies.body(self.body2)?;
        if b2.mass().is_finite() {
            let target = b1.body_to_world(self.attach1_body);
            let angle = Angle::Rad(b2.angle());
            bodies
                .body_mut(self.body2)?
                .align_to(self.attach2_body, target, angle);
            log::debug!("{} moved {:?} to {:?}", self.name(), self.body2, target);
        } else if b1.mass().is_finite() {
            let target = b2.body_to_world(self.attach2_body);
            let angle = Angle::Rad(b1.angle());
            bodies
                .body_mut(self.body1)?
                .align_to(self.attach1_body, target, angle);
            log::debug!("{} moved {:?} to {:?}", self.name(), self.body1, target);
        }
        Ok(())
    }
}

/// A builder for [`Joint`][self::Joint]s.
///
/// Attachment points default to each body's center of mass
/// and the normal to the world x axis.
#[derive(Clone, Copy, Debug)]
pub struct JointBuilder {
    body1: BodyKey,
    body2: BodyKey,
    attach1: m::Vec2,
    attach2: m::Vec2,
    normal: m::Vec2,
    normal_type: CoordType,
}

impl JointBuilder {
    pub fn new(body1: BodyKey, body2: BodyKey) -> Self {
        Self {
            body1,
            body2,
            attach1: m::Vec2::zero(),
            attach2: m::Vec2::zero(),
            normal: m::Vec2::unit_x(),
            normal_type: CoordType::World,
        }
    }

    /// Set the attachment point on the first body, in its body coordinates.
    pub fn with_attach1(mut self, point: m::Vec2) -> Self {
        self.attach1 = point;
        self
    }

    /// Set the attachment point on the second body, in its body coordinates.
    pub fn with_attach2(mut self, point: m::Vec2) -> Self {
        self.attach2 = point;
        self
    }

    /// Set the direction along which the attachment points are held together.
    /// With [`CoordType::Body`] the direction is in the second body's coordinates.
    pub fn with_normal(mut self, normal: m::Vec2, normal_type: CoordType) -> Self {
        self.normal = normal;
        self.normal_type = normal_type;
        self
    }

    /// Create the joint, taking its id from the world.
    ///
    /// The joined bodies are marked as not colliding with each other.
    /// Use [`PhysicsWorld::add_joint`][super::PhysicsWorld::add_joint]
    /// to also store the joint in the world.
    pub fn build(self, world: &mut PhysicsWorld) -> Result<Joint, CollisionError> {
        if self.body1 == self.body2 {
            return Err(CollisionError::SameBody(self.body1));
        }
        let normal =
            Unit::try_new(self.normal, MIN_NORMAL_LENGTH).ok_or(CollisionError::ZeroNormal)?;
        world.bodies.add_non_collide(self.body1, self.body2)?;
        Ok(Joint {
            id: world.next_joint_id(),
            body1: self.body1,
            body2: self.body2,
            attach1_body: self.attach1,
            attach2_body: self.attach2,
            normal,
            normal_type: self.normal_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_scenes::*;

    #[test]
    fn align_moves_the_finite_body() {
        let mut world = PhysicsWorld::new();
        let anchor = world.bodies.insert_body(floor_body());
        world
            .bodies
            .get_body_mut(anchor)
            .unwrap()
            .set_position(m::Vec2::zero());
        let swing = world.bodies.insert_body(unit_box_at(3.0, 2.0));
        world
            .bodies
            .get_body_mut(swing)
            .unwrap()
            .set_angle(Angle::Rad(0.4));
        let joint = JointBuilder::new(anchor, swing)
            .with_normal(m::Vec2::new(1.0, 0.0), CoordType::World)
            .build(&mut world)
            .unwrap();

        let before = joint.normal_distance(&world.bodies).unwrap();
        assert!((before + 3.0).abs() < EPSILON);
        joint.align(&mut world.bodies).unwrap();
        assert!(joint.normal_distance(&world.bodies).unwrap().abs() < 1e-10);

        let b1 = world.bodies.get_body(anchor).unwrap();
        let b2 = world.bodies.get_body(swing).unwrap();
        let pivot = b1.body_to_world(m::Vec2::zero());
        assert!((b2.position() - pivot).mag() < 1e-10);
        assert!((b2.angle() - 0.4).abs() < EPSILON);
        assert_eq!(b1.position(), m::Vec2::zero());
    }

    #[test]
    fn align_falls_back_to_first_body() {
        let mut world = PhysicsWorld::new();
        let free = world.bodies.insert_body(unit_box_at(-1.0, 4.0));
        let fixed = world.bodies.insert_body(floor_body());
        let joint = JointBuilder::new(free, fixed)
            .with_attach1(m::Vec2::new(0.5, 0.5))
            .with_attach2(m::Vec2::new(2.0, 0.5))
            .build(&mut world)
            .unwrap();
        joint.align(&mut world.bodies).unwrap();
        let p1 = joint.position1(&world.bodies).unwrap();
        let p2 = joint.position2(&world.bodies).unwrap();
        assert!((p1 - p2).mag() < EPSILON);
        assert!((p2 - m::Vec2::new(2.0, 0.0)).mag() < EPSILON);

        // nothing can move between two fixed bodies
        let other_fixed = world.bodies.insert_body(floor_body());
        world
            .bodies
            .get_body_mut(other_fixed)
            .unwrap()
            .set_position(m::Vec2::new(0.0, 5.0));
        let stuck = JointBuilder::new(fixed, other_fixed)
            .build(&mut world)
            .unwrap();
        stuck.align(&mut world.bodies).unwrap();
        assert_eq!(
            world.bodies.get_body(other_fixed).unwrap().position(),
            m::Vec2::new(0.0, 5.0)
        );
    }

    #[test]
    fn joint_record_goes_to_the_front() {
        let mut world = PhysicsWorld::new();
        let floor = world.bodies.insert_body(floor_body());
        let block = world.bodies.insert_body(unit_box_at(0.0, 0.502));
        let b1 = world.bodies.insert_body(unit_box_at(4.0, 3.0));
        let b2 = world.bodies.insert_body(unit_box_at(4.5, 3.0));

        let mut collisions = Vec::new();
        for v in [0, 1] {
            let mut c = RigidBodyCollision::corner_edge(
                &world.bodies,
                block.vertex(v),
                floor.edge(FLOOR_TOP_EDGE),
            )
            .unwrap();
            assert!(c.update_collision(&world.bodies, 0.0).unwrap());
            collisions.push(c);
        }

        let joint = JointBuilder::new(b1, b2)
            .with_attach1(m::Vec2::new(0.25, 0.0))
            .with_attach2(m::Vec2::new(-0.25, 0.0))
            .build(&mut world)
            .unwrap();
        joint
            .add_collision(&mut collisions, &world.bodies, 2.5, 0.3)
            .unwrap();

        assert_eq!(collisions.len(), 3);
        let c = &collisions[0];
        assert!(c.is_joint());
        assert_eq!(c.joint().map(|j| j.id()), Some(joint.id()));
        assert_eq!(c.primary_body(), b1);
        assert_eq!(c.normal_body(), b2);
        assert_eq!(c.detected_time(), Some(2.5));
        assert_eq!(c.update_time(), Some(2.5));
        assert_eq!(c.tolerances().accuracy, 0.3);
        assert_eq!(c.creator(), "Joint");
        assert!(c.distance().abs() < EPSILON);
        assert!(c.is_touching());
        assert!(!c.is_colliding());
        assert!(c.close_enough(false));
        assert_eq!(c.check_consistent(&world.bodies), Ok(()));

        assert!(collisions[1].has_vertex(block.vertex(0)));
        assert!(collisions[2].has_vertex(block.vertex(1)));
    }

    #[test]
    fn body_normal_rotates_with_second_body() {
        let mut world = PhysicsWorld::new();
        let b1 = world.bodies.insert_body(unit_box_at(0.0, 0.0));
        let b2 = world.bodies.insert_body(unit_box_at(0.0, 1.0));
        let joint = JointBuilder::new(b1, b2)
            .with_normal(m::Vec2::new(2.0, 0.0), CoordType::Body)
            .build(&mut world)
            .unwrap();
        let n = joint.normal_world(&world.bodies).unwrap();
        assert!((*n - m::Vec2::unit_x()).mag() < EPSILON);

        world
            .bodies
            .get_body_mut(b2)
            .unwrap()
            .set_angle(Angle::Deg(90.0));
        let n = joint.normal_world(&world.bodies).unwrap();
        assert!((*n - m::Vec2::unit_y()).mag() < EPSILON);
        // attachment points are one unit apart vertically, all of it along the new normal
        let distance = joint.normal_distance(&world.bodies).unwrap();
        assert!((distance + 1.0).abs() < EPSILON);

        let mut list = Vec::new();
        joint.add_collision(&mut list, &world.bodies, 0.0, 0.6).unwrap();
        let mut c = list.remove(0);
        world
            .bodies
            .get_body_mut(b2)
            .unwrap()
            .set_angle(Angle::Deg(0.0));
        assert!(c.is_stale(1.0));
        joint.update_collision(&mut c, &world.bodies, 1.0).unwrap();
        assert!(!c.is_stale(1.0));
        assert!((*c.normal() - m::Vec2::unit_x()).mag() < EPSILON);
        assert!(c.distance().abs() < EPSILON);
    }

    #[test]
    fn joint_only_updates_its_own_records() {
        let mut world = PhysicsWorld::new();
        let floor = world.bodies.insert_body(floor_body());
        let b1 = world.bodies.insert_body(unit_box_at(0.0, 0.502));
        let b2 = world.bodies.insert_body(unit_box_at(0.0, 2.0));
        let j1 = JointBuilder::new(b1, b2).build(&mut world).unwrap();
        let j2 = JointBuilder::new(b1, b2)
            .with_normal(m::Vec2::unit_y(), CoordType::World)
            .build(&mut world)
            .unwrap();

        let mut list = Vec::new();
        j2.add_collision(&mut list, &world.bodies, 0.0, 0.6).unwrap();
        let mut foreign = list.remove(0);
        let before = foreign.normal();
        assert_eq!(
            j1.update_collision(&mut foreign, &world.bodies, 1.0),
            Err(CollisionError::Inconsistent("record does not belong to this joint"))
        );
        assert_eq!(foreign.normal(), before);
        assert_eq!(foreign.update_time(), Some(0.0));

        let top = floor.edge(FLOOR_TOP_EDGE);
        let mut corner = RigidBodyCollision::corner_edge(&world.bodies, b1.vertex(0), top).unwrap();
        let result = j1.update_collision(&mut corner, &world.bodies, 1.0);
        assert!(result.is_err());
        assert!(corner.distance().is_nan());
    }

    #[test]
    fn invalid_joints_are_rejected() {
        let mut world = PhysicsWorld::new();
        let b1 = world.bodies.insert_body(unit_box_at(0.0, 0.0));
        let b2 = world.bodies.insert_body(unit_box_at(0.0, 1.0));
        assert_eq!(
            JointBuilder::new(b1, b1).build(&mut world).unwrap_err(),
            CollisionError::SameBody(b1)
        );
        assert_eq!(
            JointBuilder::new(b1, b2)
                .with_normal(m::Vec2::zero(), CoordType::World)
                .build(&mut world)
                .unwrap_err(),
            CollisionError::ZeroNormal
        );
        world.bodies.remove_body(b2);
        assert_eq!(
            JointBuilder::new(b1, b2).build(&mut world).unwrap_err(),
            CollisionError::MissingBody(b2)
        );
    }
}
