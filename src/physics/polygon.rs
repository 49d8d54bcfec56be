//! Tracing the boundary of a rigid body out of straight and circular edges.

use super::{Edge, EdgeShape, Mass, RigidBody, SurfaceMaterial, Velocity, Vertex};
use crate::math::{self as m, Unit};

use std::f64::consts::TAU;

/// Points closer than this are considered the same point.
const POINT_TOLERANCE: f64 = 1e-9;
const DEFAULT_DECORATION_SPACING: f64 = 0.1;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ShapeError {
    #[error("An edge was added before starting a path")]
    NoPathStarted,
    #[error("A path was left open, or a new path was started before closing the previous one")]
    OpenPath,
    #[error("A body must have at least one edge")]
    EmptyBody,
    #[error("Start and end of a circular edge are at different distances from its center")]
    ArcRadiusMismatch,
    #[error("Edge has zero length or zero radius")]
    DegenerateEdge,
}

#[derive(Clone, Copy, Debug)]
struct OpenPathState {
    first_vertex: usize,
    start_point: m::Vec2,
    /// Vertex at the end of the last edge added.
    cursor: usize,
}

/// Builder for a [`RigidBody`][super::RigidBody].
///
/// The boundary is traced as one or more closed paths. Each path begins with
/// [`start_path`][Self::start_path] and closes automatically when an edge ends
/// at the path's starting point. Paths must go counterclockwise around the body,
/// so that the body is on the left side of every edge.
///
/// Body coordinates are relative to the center of mass.
///
/// ```
/// use edgeframe::{math as m, RigidBodyBuilder};
///
/// # fn main() -> Result<(), edgeframe::ShapeError> {
/// let wedge = RigidBodyBuilder::new()
///     .with_name("wedge")
///     .with_mass(2.0)
///     .start_path(m::Vec2::new(-1.0, 0.0))?
///     .add_straight_edge(m::Vec2::new(1.0, 0.0))?
///     .add_circular_edge(m::Vec2::new(-1.0, 0.0), m::Vec2::zero(), true)?
///     .build()?;
/// assert_eq!(wedge.edge_count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RigidBodyBuilder {
    name: String,
    pose: m::Pose,
    velocity: Velocity,
    mass: Mass,
    moment_of_inertia: Mass,
    material: SurfaceMaterial,
    decoration_spacing: f64,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    path: Option<OpenPathState>,
}

impl Default for RigidBodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodyBuilder {
    pub fn new() -> Self {
        Self {
            name: String::from("body"),
            pose: m::Pose::identity(),
            velocity: Velocity::default(),
            mass: Mass::from(1.0),
            moment_of_inertia: Mass::from(1.0),
            material: SurfaceMaterial::default(),
            decoration_spacing: DEFAULT_DECORATION_SPACING,
            edges: Vec::new(),
            vertices: Vec::new(),
            path: None,
        }
    }

    /// Start building an axis-aligned rectangle centered on the center of mass.
    ///
    /// Edges are numbered counterclockwise from the bottom:
    /// 0 bottom, 1 right, 2 top, 3 left. Vertex 0 is the bottom left corner.
    pub fn block(width: f64, height: f64) -> Result<Self, ShapeError> {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new()
            .with_name("block")
            .start_path(m::Vec2::new(-hw, -hh))?
            .add_straight_edge(m::Vec2::new(hw, -hh))?
            .add_straight_edge(m::Vec2::new(hw, hh))?
            .add_straight_edge(m::Vec2::new(-hw, hh))?
            .add_straight_edge(m::Vec2::new(-hw, -hh))
    }

    /// Start building a circle centered on the center of mass.
    ///
    /// The circle is a single convex edge 0 beginning and ending at vertex 0
    /// on the positive x axis, followed by decorated vertices along the arc.
    pub fn ball(radius: f64) -> Result<Self, ShapeError> {
        let start = m::Vec2::new(radius, 0.0);
        Self::new()
            .with_name("ball")
            .start_path(start)?
            .add_circular_edge(start, m::Vec2::zero(), true)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_pose(mut self, pose: m::Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_position(mut self, position: m::Vec2) -> Self {
        self.pose.translation = position;
        self
    }

    /// Set the mass. Infinite mass makes the body immovable.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Mass::from(mass);
        self
    }

    pub fn with_moment_of_inertia(mut self, moment: f64) -> Self {
        self.moment_of_inertia = Mass::from(moment);
        self
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_material(mut self, material: SurfaceMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set the approximate distance between decorated vertices on circular edges
    /// added after this call.
    pub fn with_decoration_spacing(mut self, spacing: f64) -> Self {
        self.decoration_spacing = spacing;
        self
    }

    /// Begin a new closed path at `point`.
    pub fn start_path(mut self, point: m::Vec2) -> Result<Self, ShapeError> {
        if self.path.is_some() {
            return Err(ShapeError::OpenPath);
        }
        let first_vertex = self.vertices.len();
        self.vertices.push(Vertex {
            id: first_vertex,
            loc_body: point,
            // fixed up when the path closes
            edge1: self.edges.len(),
            edge2: None,
            curvature: f64::INFINITY,
        });
        self.path = Some(OpenPathState {
            first_vertex,
            start_point: point,
            cursor: first_vertex,
        });
        Ok(self)
    }

    /// Add a line segment from the end of the current path to `end`.
    pub fn add_straight_edge(self, end: m::Vec2) -> Result<Self, ShapeError> {
        let path = self.path.ok_or(ShapeError::NoPathStarted)?;
        let start = self.vertices[path.cursor].loc_body;
        let outward = Unit::try_new(m::right_normal(end - start), POINT_TOLERANCE)
            .ok_or(ShapeError::DegenerateEdge)?;
        let shape = EdgeShape::Straight {
            start,
            end,
            outward,
        };
        Ok(self.push_edge(path, end, shape))
    }

    /// Add a circular arc from the end of the current path to `end`, around `center`.
    ///
    /// Convex arcs bulge out of the body and go counterclockwise around the center,
    /// concave arcs are hollows going clockwise. An arc ending where it starts
    /// is a full circle.
    pub fn add_circular_edge(
        self,
        end: m::Vec2,
        center: m::Vec2,
        convex: bool,
    ) -> Result<Self, ShapeError> {
        let path = self.path.ok_or(ShapeError::NoPathStarted)?;
        let start = self.vertices[path.cursor].loc_body;
        let radius = (start - center).mag();
        if radius < POINT_TOLERANCE {
            return Err(ShapeError::DegenerateEdge);
        }
        if ((end - center).mag() - radius).abs() > POINT_TOLERANCE * radius.max(1.0) {
            return Err(ShapeError::ArcRadiusMismatch);
        }
        let start_angle = m::direction_angle(start - center);
        let span = if (end - start).mag() < POINT_TOLERANCE {
            TAU
        } else {
            m::sweep_between(start_angle, m::direction_angle(end - center), convex)
        };

        let edge_index = self.edges.len();
        let shape = EdgeShape::Circular {
            center,
            radius,
            convex,
            start_angle,
            span,
        };
        let mut builder = self.push_edge(path, end, shape);
        builder.decorate_arc(edge_index, center, radius, convex, start_angle, span);
        Ok(builder)
    }

    fn push_edge(mut self, mut path: OpenPathState, end: m::Vec2, shape: EdgeShape) -> Self {
        let index = self.edges.len();
        self.vertices[path.cursor].edge2 = Some(index);

        let closes_path = (end - path.start_point).mag() < POINT_TOLERANCE;
        let end_vertex = if closes_path {
            self.vertices[path.first_vertex].edge1 = index;
            path.first_vertex
        } else {
            let id = self.vertices.len();
            self.vertices.push(Vertex {
                id,
                loc_body: end,
                edge1: index,
                edge2: None,
                curvature: f64::INFINITY,
            });
            id
        };

        self.edges.push(Edge {
            index,
            start_vertex: path.cursor,
            end_vertex,
            shape,
        });

        if closes_path {
            self.path = None;
        } else {
            path.cursor = end_vertex;
            self.path = Some(path);
        }
        self
    }

    fn decorate_arc(
        &mut self,
        edge: usize,
        center: m::Vec2,
        radius: f64,
        convex: bool,
        start_angle: f64,
        span: f64,
    ) {
        if self.decoration_spacing <= 0.0 {
            return;
        }
        let segments = (span * radius / self.decoration_spacing).floor() as usize;
        let direction = if convex { 1.0 } else { -1.0 };
        for i in 1..segments {
            let angle = start_angle + direction * span * (i as f64) / (segments as f64);
            let id = self.vertices.len();
            self.vertices.push(Vertex {
                id,
                loc_body: center + m::Vec2::new(angle.cos(), angle.sin()) * radius,
                edge1: edge,
                edge2: None,
                curvature: radius,
            });
        }
    }

    /// Finish the body. Every path must be closed.
    pub fn build(self) -> Result<RigidBody, ShapeError> {
        if self.path.is_some() {
            return Err(ShapeError::OpenPath);
        }
        if self.edges.is_empty() {
            return Err(ShapeError::EmptyBody);
        }
        Ok(RigidBody {
            name: self.name,
            pose: self.pose,
            velocity: self.velocity,
            mass: self.mass,
            moment_of_inertia: self.moment_of_inertia,
            material: self.material,
            edges: self.edges,
            vertices: self.vertices,
            non_collide: Vec::new(),
            non_collide_edges: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::test_scenes::EPSILON;

    #[test]
    fn block_corners_link_their_edges() {
        let body = RigidBodyBuilder::block(2.0, 1.0).unwrap().build().unwrap();
        assert_eq!(body.edge_count(), 4);
        assert_eq!(body.vertices().len(), 4);

        let v0 = body.vertex(0).unwrap();
        assert_eq!(v0.edge1(), 3);
        assert_eq!(v0.edge2(), Some(0));
        for i in 1..4 {
            let v = body.vertex(i).unwrap();
            assert_eq!(v.edge1(), i - 1);
            assert_eq!(v.edge2(), Some(i));
            assert!(v.is_end_point());
            assert!(v.curvature().is_infinite());
        }

        let normals: Vec<m::Vec2> = body
            .edges()
            .iter()
            .map(|e| match e.shape() {
                EdgeShape::Straight { outward, .. } => **outward,
                _ => panic!("block edges are straight"),
            })
            .collect();
        let expected = [
            -m::Vec2::unit_y(),
            m::Vec2::unit_x(),
            m::Vec2::unit_y(),
            -m::Vec2::unit_x(),
        ];
        for (n, e) in normals.iter().zip(expected.iter()) {
            assert!((*n - *e).mag() < EPSILON);
        }
    }

    #[test]
    fn ball_is_one_edge_with_decorations() {
        let body = RigidBodyBuilder::ball(0.5)
            .unwrap()
            .with_decoration_spacing(0.5)
            .build()
            .unwrap();
        assert_eq!(body.edge_count(), 1);
        let v0 = body.vertex(0).unwrap();
        assert_eq!(v0.edge1(), 0);
        assert_eq!(v0.edge2(), Some(0));

        // spacing is only applied to arcs added after it is set,
        // so the default spacing decorated this one
        let circumference = TAU * 0.5;
        let expected = (circumference / DEFAULT_DECORATION_SPACING).floor() as usize - 1;
        assert_eq!(body.vertices().len(), 1 + expected);
        for v in &body.vertices()[1..] {
            assert!(!v.is_end_point());
            assert_eq!(v.edge1(), 0);
            assert_eq!(v.curvature(), 0.5);
            assert!((v.loc_body().mag() - 0.5).abs() < EPSILON);
        }
    }

    #[test]
    fn concave_arc_decorations_stay_on_the_arc() {
        let body = RigidBodyBuilder::new()
            .with_decoration_spacing(0.25)
            .start_path(m::Vec2::new(-1.0, -2.0))
            .and_then(|b| b.add_straight_edge(m::Vec2::new(1.0, -2.0)))
            .and_then(|b| b.add_straight_edge(m::Vec2::new(1.0, 0.0)))
            .and_then(|b| b.add_circular_edge(m::Vec2::new(-1.0, 0.0), m::Vec2::zero(), false))
            .and_then(|b| b.add_straight_edge(m::Vec2::new(-1.0, -2.0)))
            .and_then(|b| b.build())
            .unwrap();
        let arc = body.edge(2).unwrap();
        for v in body.vertices().iter().filter(|v| !v.is_end_point()) {
            assert!(v.loc_body().y < 0.0);
            assert!(arc.is_within_arc(v.loc_body()));
        }
        // the hollow spans half a circle
        match arc.shape() {
            EdgeShape::Circular { span, .. } => {
                assert!((span - std::f64::consts::PI).abs() < EPSILON)
            }
            _ => panic!("expected an arc"),
        }
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert_eq!(
            RigidBodyBuilder::new()
                .add_straight_edge(m::Vec2::unit_x())
                .unwrap_err(),
            ShapeError::NoPathStarted
        );
        assert_eq!(
            RigidBodyBuilder::new().build().unwrap_err(),
            ShapeError::EmptyBody
        );

        let open = RigidBodyBuilder::new()
            .start_path(m::Vec2::zero())
            .and_then(|b| b.add_straight_edge(m::Vec2::unit_x()))
            .unwrap();
        assert_eq!(open.clone().build().unwrap_err(), ShapeError::OpenPath);
        assert_eq!(
            open.clone().start_path(m::Vec2::unit_y()).unwrap_err(),
            ShapeError::OpenPath
        );
        let retraced = open.clone().add_straight_edge(m::Vec2::unit_x());
        assert_eq!(retraced.unwrap_err(), ShapeError::DegenerateEdge);
        assert_eq!(
            open.add_circular_edge(m::Vec2::new(4.0, 0.0), m::Vec2::new(2.0, 0.0), true)
                .unwrap_err(),
            ShapeError::ArcRadiusMismatch
        );
        let flat = RigidBodyBuilder::block(0.0, 1.0);
        assert_eq!(flat.unwrap_err(), ShapeError::DegenerateEdge);
    }

    #[test]
    fn paths_get_contiguous_edge_indices() {
        let body = RigidBodyBuilder::block(1.0, 1.0)
            .and_then(|b| b.start_path(m::Vec2::new(2.0, 0.0)))
            .and_then(|b| b.add_straight_edge(m::Vec2::new(3.0, 0.0)))
            .and_then(|b| b.add_straight_edge(m::Vec2::new(3.0, 1.0)))
            .and_then(|b| b.add_straight_edge(m::Vec2::new(2.0, 0.0)))
            .and_then(|b| b.build())
            .unwrap();
        assert_eq!(body.edge_count(), 7);
        // first vertex of the second path closes it
        let v = body.vertex(4).unwrap();
        assert_eq!(v.edge1(), 6);
        assert_eq!(v.edge2(), Some(4));
        let last = body.edge(6).unwrap();
        assert_eq!(last.start_vertex(), 6);
        assert_eq!(last.end_vertex(), 4);
    }
}
