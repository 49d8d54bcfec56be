//! Bodies and scenes shared by the unit tests.

use super::{edge::EdgeContact, BodyKey, BodySet, EdgeKey, RigidBody, RigidBodyBuilder, VertexKey};
use crate::math as m;

pub const EPSILON: f64 = 1e-9;

/// Index of the upward-facing edge of [`floor_body`].
pub const FLOOR_TOP_EDGE: usize = 2;
/// Index of the hollow of [`bowl_body`].
pub const BOWL_ARC_EDGE: usize = 2;
pub const BOWL_RADIUS: f64 = 2.0;

/// An immovable 10x1 block whose top surface is the line y = 0.
pub fn floor_body() -> RigidBody {
    RigidBodyBuilder::block(10.0, 1.0)
        .unwrap()
        .with_name("floor")
        .with_mass(f64::INFINITY)
        .with_moment_of_inertia(f64::INFINITY)
        .with_position(m::Vec2::new(0.0, -0.5))
        .build()
        .unwrap()
}

pub fn unit_box_at(x: f64, y: f64) -> RigidBody {
    RigidBodyBuilder::block(1.0, 1.0)
        .unwrap()
        .with_position(m::Vec2::new(x, y))
        .build()
        .unwrap()
}

pub fn ball_at(x: f64, y: f64, radius: f64) -> RigidBody {
    RigidBodyBuilder::ball(radius)
        .unwrap()
        .with_position(m::Vec2::new(x, y))
        .build()
        .unwrap()
}

/// A ball of radius 0.5 whose center is offset by (1, 0) from the center of mass.
pub fn offset_ball_at(x: f64, y: f64) -> RigidBody {
    let center = m::Vec2::new(1.0, 0.0);
    let start = m::Vec2::new(1.5, 0.0);
    RigidBodyBuilder::new()
        .with_name("offset ball")
        .with_position(m::Vec2::new(x, y))
        .start_path(start)
        .and_then(|b| b.add_circular_edge(start, center, true))
        .and_then(|b| b.build())
        .unwrap()
}

/// The decorated vertex of a body closest to the bottom in world coordinates.
pub fn lowest_decoration(bodies: &BodySet, body: BodyKey) -> VertexKey {
    let b = bodies.get_body(body).unwrap();
    let lowest = b
        .vertices()
        .iter()
        .filter(|v| !v.is_end_point())
        .min_by(|v1, v2| {
            let y1 = b.body_to_world(v1.loc_body()).y;
            let y2 = b.body_to_world(v2.loc_body()).y;
            y1.partial_cmp(&y2).unwrap()
        })
        .unwrap();
    body.vertex(lowest.id())
}

/// An immovable block with a half-circle hollow of radius [`BOWL_RADIUS`]
/// cut into its top. The hollow's center is the body origin.
pub fn bowl_body(x: f64, y: f64) -> RigidBody {
    let r = BOWL_RADIUS;
    RigidBodyBuilder::new()
        .with_name("bowl")
        .with_mass(f64::INFINITY)
        .with_moment_of_inertia(f64::INFINITY)
        .with_position(m::Vec2::new(x, y))
        .start_path(m::Vec2::new(-r, -3.0))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(r, -3.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(r, 0.0)))
        .and_then(|b| b.add_circular_edge(m::Vec2::new(-r, 0.0), m::Vec2::zero(), false))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(-r, -3.0)))
        .and_then(|b| b.build())
        .unwrap()
}

/// Index of the right slope of [`ridge_body`], the left slope follows it.
pub const RIDGE_RIGHT_SLOPE: usize = 2;

/// An immovable 8 units wide block whose top rises to a shallow peak at (0, 0.1)
/// in body coordinates.
pub fn ridge_body() -> RigidBody {
    RigidBodyBuilder::new()
        .with_name("ridge")
        .with_mass(f64::INFINITY)
        .with_moment_of_inertia(f64::INFINITY)
        .start_path(m::Vec2::new(-4.0, -1.0))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(4.0, -1.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(4.0, 0.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(0.0, 0.1)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(-4.0, 0.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(-4.0, -1.0)))
        .and_then(|b| b.build())
        .unwrap()
}

/// A unit square (edges 0..=3) plus a separate triangle (edges 4..=6).
pub fn two_path_body() -> RigidBody {
    RigidBodyBuilder::block(1.0, 1.0)
        .and_then(|b| b.start_path(m::Vec2::new(2.0, 0.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(3.0, 0.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(3.0, 1.0)))
        .and_then(|b| b.add_straight_edge(m::Vec2::new(2.0, 0.0)))
        .and_then(|b| b.build())
        .unwrap()
}

pub fn edge_pair_contact(
    bodies: &BodySet,
    primary: EdgeKey,
    normal: EdgeKey,
) -> Option<EdgeContact> {
    let e1 = bodies.edge(primary).unwrap();
    let e2 = bodies.edge(normal).unwrap();
    e1.improve_accuracy_edge(
        bodies.get_body(primary.body).unwrap(),
        e2,
        bodies.get_body(normal.body).unwrap(),
    )
}
