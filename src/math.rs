//! Types, aliases and helper operations for doing math with `ultraviolet`.
use std::f64::consts::{PI, TAU};
pub use ultraviolet as uv;

/// A Pose has a rotation and a translation, no scaling.
///
/// Bodies are positioned with Poses whose translation is the body's center of mass.
pub type Pose = uv::DIsometry2;
pub type Vec2 = uv::DVec2;
pub type Rotor2 = uv::DRotor2;

/// An angle in either degrees or radians.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum Angle {
    Rad(f64),
    Deg(f64),
}
impl Angle {
    /// Get the angle as degrees.
    #[inline]
    pub fn deg(&self) -> f64 {
        match self {
            Angle::Rad(rad) => rad * 180.0 / PI,
            Angle::Deg(deg) => *deg,
        }
    }

    /// Get the angle as radians.
    #[inline]
    pub fn rad(&self) -> f64 {
        match self {
            Angle::Rad(rad) => *rad,
            Angle::Deg(deg) => deg * PI / 180.0,
        }
    }
}
impl Default for Angle {
    fn default() -> Self {
        Angle::Rad(0.0)
    }
}
impl From<Angle> for Rotor2 {
    #[inline]
    fn from(ang: Angle) -> Rotor2 {
        Rotor2::from_angle(ang.rad())
    }
}
impl From<Rotor2> for Angle {
    #[inline]
    fn from(rotor: Rotor2) -> Self {
        Angle::Rad(-rotor.bv.xy.atan2(rotor.s) * 2.0)
    }
}

/// A wrapper type to indicate a vector should always be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit<T>(T);

impl Unit<Vec2> {
    pub fn new_normalize(v: Vec2) -> Self {
        Unit(v.normalized())
    }

    /// Normalize a vector unless it's too short to have a meaningful direction.
    pub fn try_new(v: Vec2, min_mag: f64) -> Option<Self> {
        let mag = v.mag();
        if mag > min_mag {
            Some(Unit(v / mag))
        } else {
            None
        }
    }

    pub const fn new_unchecked(v: Vec2) -> Self {
        Unit(v)
    }

    pub fn unit_x() -> Self {
        Unit(Vec2::unit_x())
    }

    pub fn unit_y() -> Self {
        Unit(Vec2::unit_y())
    }

    #[inline]
    pub fn into_inner(self) -> Vec2 {
        self.0
    }
}

impl std::ops::Mul<Unit<Vec2>> for Rotor2 {
    type Output = Unit<Vec2>;

    fn mul(self, rhs: Unit<Vec2>) -> Self::Output {
        Unit(self * rhs.0)
    }
}

impl<T> std::ops::Deref for Unit<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Neg for Unit<T>
where
    T: std::ops::Neg,
{
    type Output = Unit<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        Unit(-self.0)
    }
}

// Vec2 utils

#[inline]
pub fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
#[inline]
pub fn right_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Angle of a vector measured counterclockwise from the x axis, in `(-PI, PI]`.
#[inline]
pub fn direction_angle(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Unsigned angle traveled from `from` to `to`, going counterclockwise
/// if `ccw` is set and clockwise otherwise. Always in `[0, TAU)`.
#[inline]
pub fn sweep_between(from: f64, to: f64, ccw: bool) -> f64 {
    if ccw {
        (to - from).rem_euclid(TAU)
    } else {
        (from - to).rem_euclid(TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotor_angle_conversion_is_counterclockwise() {
        let r: Rotor2 = Angle::Deg(90.0).into();
        let v = r * Vec2::unit_x();
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
        assert!((Angle::from(r).deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn sweeps_wrap_around() {
        assert!((sweep_between(-3.0, 3.0, true) - 6.0).abs() < 1e-12);
        assert!((sweep_between(3.0, -3.0, true) - (TAU - 6.0)).abs() < 1e-12);
        assert!((sweep_between(0.5, 0.25, false) - 0.25).abs() < 1e-12);
        assert_eq!(sweep_between(1.0, 1.0, true), 0.0);
    }

    #[test]
    fn short_vectors_have_no_direction() {
        assert!(Unit::try_new(Vec2::new(1e-14, 0.0), 1e-12).is_none());
        let u = Unit::try_new(Vec2::new(3.0, 4.0), 1e-12).unwrap();
        assert!((u.x - 0.6).abs() < 1e-12 && (u.y - 0.8).abs() < 1e-12);
    }
}
