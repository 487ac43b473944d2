//! Coordinate representation of poses, twists and acceleration twists.

use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::spatial_traits::{Accumulate, Compose, Derive, Invert, SpatialAdd, TransformMotion};

/// Rigid transform from a reference frame to a target frame.
///
/// `rotation` maps reference coordinates to target coordinates, `translation` is the position of
/// the target origin expressed in the reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Pose {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Pose { rotation, translation }
    }

    pub fn identity() -> Self {
        Pose { rotation: Matrix3::identity(), translation: Vector3::zeros() }
    }

    /// Builds a pose from rotation rows and a translation.
    pub fn from_rows(rows: &[[f64; 3]; 3], translation: &[f64; 3]) -> Self {
        Pose {
            rotation: Matrix3::new(
                rows[0][0], rows[0][1], rows[0][2],
                rows[1][0], rows[1][1], rows[1][2],
                rows[2][0], rows[2][1], rows[2][2],
            ),
            translation: Vector3::new(translation[0], translation[1], translation[2]),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::identity()
    }
}

impl Compose for Pose {
    type Output = Pose;

    fn compose(&self, other: &Pose) -> Pose {
        Pose {
            rotation: self.rotation * other.rotation,
            translation: other.translation + other.rotation.transpose() * self.translation,
        }
    }
}

impl Invert for Pose {
    type Output = Pose;

    fn inverse(&self) -> Pose {
        Pose {
            rotation: self.rotation.transpose(),
            translation: -(self.rotation * self.translation),
        }
    }
}

/// Spatial velocity: angular and linear velocity about the origin of the frame it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Twist {
    pub angular: Vector3<f64>,
    pub linear: Vector3<f64>,
}

impl Twist {
    pub fn new(angular: Vector3<f64>, linear: Vector3<f64>) -> Self {
        Twist { angular, linear }
    }

    pub fn zero() -> Self {
        Twist::default()
    }
}

impl TransformMotion<Pose> for Twist {
    type Output = Twist;

    fn transform_ref_to_tgt(&self, x: &Pose) -> Twist {
        Twist {
            angular: x.rotation * self.angular,
            linear: x.rotation * (self.linear - x.translation.cross(&self.angular)),
        }
    }
}

impl Accumulate for Twist {
    type Output = Twist;

    fn accumulate(&self, other: &Twist) -> Twist {
        Twist {
            angular: self.angular + other.angular,
            linear: self.linear + other.linear,
        }
    }
}

/// Spatial cross product `self × other`, the velocity-product acceleration.
impl Derive<Twist> for Twist {
    type Output = AccTwist;

    fn derive(&self, other: &Twist) -> AccTwist {
        AccTwist {
            angular: self.angular.cross(&other.angular),
            linear: self.angular.cross(&other.linear) + self.linear.cross(&other.angular),
        }
    }
}

/// Spatial acceleration (time derivative of a twist).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccTwist {
    pub angular: Vector3<f64>,
    pub linear: Vector3<f64>,
}

impl AccTwist {
    pub fn new(angular: Vector3<f64>, linear: Vector3<f64>) -> Self {
        AccTwist { angular, linear }
    }

    pub fn zero() -> Self {
        AccTwist::default()
    }
}

impl TransformMotion<Pose> for AccTwist {
    type Output = AccTwist;

    fn transform_ref_to_tgt(&self, x: &Pose) -> AccTwist {
        AccTwist {
            angular: x.rotation * self.angular,
            linear: x.rotation * (self.linear - x.translation.cross(&self.angular)),
        }
    }
}

impl Accumulate for AccTwist {
    type Output = AccTwist;

    fn accumulate(&self, other: &AccTwist) -> AccTwist {
        AccTwist {
            angular: self.angular + other.angular,
            linear: self.linear + other.linear,
        }
    }
}

impl SpatialAdd for AccTwist {
    type Output = AccTwist;

    fn add(&self, other: &AccTwist) -> AccTwist {
        AccTwist {
            angular: self.angular + other.angular,
            linear: self.linear + other.linear,
        }
    }

    fn sub(&self, other: &AccTwist) -> AccTwist {
        AccTwist {
            angular: self.angular - other.angular,
            linear: self.linear - other.linear,
        }
    }
}

impl Invert for AccTwist {
    type Output = AccTwist;

    fn inverse(&self) -> AccTwist {
        AccTwist { angular: -self.angular, linear: -self.linear }
    }
}

pub(crate) fn fmt_vector(f: &mut fmt::Formatter, v: &Vector3<f64>) -> fmt::Result {
    write!(f, "[{:8.4} {:8.4} {:8.4}]", v.x, v.y, v.z)
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "rotation:")?;
        for r in 0..3 {
            let row = self.rotation.row(r);
            writeln!(f, "  [{:8.4} {:8.4} {:8.4}]", row[0], row[1], row[2])?;
        }
        write!(f, "translation: ")?;
        fmt_vector(f, &self.translation)
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "angular: ")?;
        fmt_vector(f, &self.angular)?;
        write!(f, " linear: ")?;
        fmt_vector(f, &self.linear)
    }
}

impl fmt::Display for AccTwist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "angular: ")?;
        fmt_vector(f, &self.angular)?;
        write!(f, " linear: ")?;
        fmt_vector(f, &self.linear)
    }
}
