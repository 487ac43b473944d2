//! Coordinate representation of wrenches, momenta and inertias.

use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::geometry::{fmt_vector, AccTwist, Pose, Twist};
use crate::spatial_traits::{Derive, Invert, MapMotion, SpatialAdd, ToArticulated, TransformForce};

/// Spatial force: torque about the origin of the frame it is expressed in, and force.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Wrench {
    pub torque: Vector3<f64>,
    pub force: Vector3<f64>,
}

impl Wrench {
    pub fn new(torque: Vector3<f64>, force: Vector3<f64>) -> Self {
        Wrench { torque, force }
    }

    pub fn zero() -> Self {
        Wrench::default()
    }
}

impl TransformForce<Pose> for Wrench {
    type Output = Wrench;

    fn transform_tgt_to_ref(&self, x: &Pose) -> Wrench {
        let force = x.rotation.transpose() * self.force;
        Wrench {
            torque: x.rotation.transpose() * self.torque + x.translation.cross(&force),
            force,
        }
    }
}

impl SpatialAdd for Wrench {
    type Output = Wrench;

    fn add(&self, other: &Wrench) -> Wrench {
        Wrench { torque: self.torque + other.torque, force: self.force + other.force }
    }

    fn sub(&self, other: &Wrench) -> Wrench {
        Wrench { torque: self.torque - other.torque, force: self.force - other.force }
    }
}

impl Invert for Wrench {
    type Output = Wrench;

    fn inverse(&self) -> Wrench {
        Wrench { torque: -self.torque, force: -self.force }
    }
}

/// Spatial momentum: angular momentum about the frame origin, and linear momentum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Momentum {
    pub angular: Vector3<f64>,
    pub linear: Vector3<f64>,
}

/// `xd ×* p`, the rate of change of momentum carried along with the body (bias force).
impl Derive<Momentum> for Twist {
    type Output = Wrench;

    fn derive(&self, p: &Momentum) -> Wrench {
        Wrench {
            torque: self.angular.cross(&p.angular) + self.linear.cross(&p.linear),
            force: self.angular.cross(&p.linear),
        }
    }
}

/// Inertia of a single rigid link about the origin of its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyInertia {
    /// Mass.
    pub zeroth_moment: f64,
    /// Mass times the position of the center of mass.
    pub first_moment: Vector3<f64>,
    /// Rotational inertia about the frame origin.
    pub second_moment: Matrix3<f64>,
}

impl RigidBodyInertia {
    pub fn new(mass: f64, first_moment: Vector3<f64>, second_moment: Matrix3<f64>) -> Self {
        RigidBodyInertia { zeroth_moment: mass, first_moment, second_moment }
    }

    /// A massless link.
    pub fn zero() -> Self {
        RigidBodyInertia::new(0.0, Vector3::zeros(), Matrix3::zeros())
    }

    /// Builds the inertia from mass, center of mass and the rotational inertia about the
    /// center of mass (parallel axis theorem).
    pub fn from_center_of_mass(mass: f64, com: Vector3<f64>, inertia_com: Matrix3<f64>) -> Self {
        let c = com.cross_matrix();
        RigidBodyInertia {
            zeroth_moment: mass,
            first_moment: mass * com,
            second_moment: inertia_com - mass * c * c,
        }
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (self.second_moment - self.second_moment.transpose()).amax() <= tolerance
    }
}

impl MapMotion<Twist> for RigidBodyInertia {
    type Output = Momentum;

    fn map(&self, xd: &Twist) -> Momentum {
        Momentum {
            angular: self.second_moment * xd.angular + self.first_moment.cross(&xd.linear),
            linear: self.zeroth_moment * xd.linear - self.first_moment.cross(&xd.angular),
        }
    }
}

impl ToArticulated for RigidBodyInertia {
    type Output = ArticulatedBodyInertia;

    fn to_articulated(&self) -> ArticulatedBodyInertia {
        ArticulatedBodyInertia {
            zeroth_moment: Matrix3::identity() * self.zeroth_moment,
            first_moment: self.first_moment.cross_matrix(),
            second_moment: self.second_moment,
        }
    }
}

/// Articulated-body inertia in block form.
///
/// Maps an acceleration twist to a wrench:
/// `torque = second·ω̇ + first·v̇`, `force = zeroth·v̇ + firstᵀ·ω̇`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArticulatedBodyInertia {
    pub zeroth_moment: Matrix3<f64>,
    pub first_moment: Matrix3<f64>,
    pub second_moment: Matrix3<f64>,
}

impl ArticulatedBodyInertia {
    pub fn zero() -> Self {
        ArticulatedBodyInertia {
            zeroth_moment: Matrix3::zeros(),
            first_moment: Matrix3::zeros(),
            second_moment: Matrix3::zeros(),
        }
    }
}

impl Default for ArticulatedBodyInertia {
    fn default() -> Self {
        ArticulatedBodyInertia::zero()
    }
}

impl TransformForce<Pose> for ArticulatedBodyInertia {
    type Output = ArticulatedBodyInertia;

    /// Congruence `Xᵀ·M·X` where `X` is the motion transform of the pose.
    fn transform_tgt_to_ref(&self, x: &Pose) -> ArticulatedBodyInertia {
        let e = &x.rotation;
        let et = e.transpose();
        let rx = x.translation.cross_matrix();

        let zeroth = et * self.zeroth_moment * e;
        let ethe = et * self.first_moment * e;
        let first = rx * zeroth + ethe;
        let second = et * self.second_moment * e + rx * ethe.transpose() - first * rx;

        ArticulatedBodyInertia { zeroth_moment: zeroth, first_moment: first, second_moment: second }
    }
}

impl SpatialAdd for ArticulatedBodyInertia {
    type Output = ArticulatedBodyInertia;

    fn add(&self, other: &ArticulatedBodyInertia) -> ArticulatedBodyInertia {
        ArticulatedBodyInertia {
            zeroth_moment: self.zeroth_moment + other.zeroth_moment,
            first_moment: self.first_moment + other.first_moment,
            second_moment: self.second_moment + other.second_moment,
        }
    }

    fn sub(&self, other: &ArticulatedBodyInertia) -> ArticulatedBodyInertia {
        ArticulatedBodyInertia {
            zeroth_moment: self.zeroth_moment - other.zeroth_moment,
            first_moment: self.first_moment - other.first_moment,
            second_moment: self.second_moment - other.second_moment,
        }
    }
}

impl MapMotion<AccTwist> for ArticulatedBodyInertia {
    type Output = Wrench;

    fn map(&self, xdd: &AccTwist) -> Wrench {
        Wrench {
            torque: self.second_moment * xdd.angular + self.first_moment * xdd.linear,
            force: self.zeroth_moment * xdd.linear + self.first_moment.transpose() * xdd.angular,
        }
    }
}

fn fmt_matrix(f: &mut fmt::Formatter, name: &str, m: &Matrix3<f64>) -> fmt::Result {
    writeln!(f, "{}:", name)?;
    for r in 0..3 {
        let row = m.row(r);
        writeln!(f, "  [{:8.4} {:8.4} {:8.4}]", row[0], row[1], row[2])?;
    }
    Ok(())
}

impl fmt::Display for Wrench {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "torque: ")?;
        fmt_vector(f, &self.torque)?;
        write!(f, " force: ")?;
        fmt_vector(f, &self.force)
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "angular: ")?;
        fmt_vector(f, &self.angular)?;
        write!(f, " linear: ")?;
        fmt_vector(f, &self.linear)
    }
}

impl fmt::Display for RigidBodyInertia {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "mass: {:.4}", self.zeroth_moment)?;
        write!(f, "first moment: ")?;
        fmt_vector(f, &self.first_moment)?;
        writeln!(f)?;
        fmt_matrix(f, "second moment", &self.second_moment)
    }
}

impl fmt::Display for ArticulatedBodyInertia {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_matrix(f, "zeroth moment", &self.zeroth_moment)?;
        fmt_matrix(f, "first moment", &self.first_moment)?;
        fmt_matrix(f, "second moment", &self.second_moment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial_traits::TransformMotion;

    const EPSILON: f64 = 1e-10;

    fn cyclic_pose() -> Pose {
        Pose::from_rows(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]], &[1.0, 2.0, 3.0])
    }

    fn sample_rbi() -> RigidBodyInertia {
        RigidBodyInertia::from_center_of_mass(
            2.5,
            Vector3::new(0.3, -0.1, 0.7),
            Matrix3::new(
                0.4, 0.01, 0.02,
                0.01, 0.5, 0.03,
                0.02, 0.03, 0.6,
            ),
        )
    }

    #[test]
    fn test_wrench_tf_tgt_to_ref() {
        let x = cyclic_pose();
        let f = [
            Wrench::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 3.0, 4.0)),
            Wrench::new(Vector3::new(2.0, 4.0, 6.0), Vector3::new(8.0, 10.0, 12.0)),
        ];
        let r: Vec<Wrench> = f.iter().map(|w| w.transform_tgt_to_ref(&x)).collect();

        assert!((r[0].torque - Vector3::new(3.0, 10.0, -4.0)).norm() < EPSILON);
        assert!((r[0].force - Vector3::new(4.0, 2.0, 3.0)).norm() < EPSILON);
        assert!((r[1].torque - Vector3::new(2.0, 28.0, -12.0)).norm() < EPSILON);
        assert!((r[1].force - Vector3::new(12.0, 8.0, 10.0)).norm() < EPSILON);
    }

    #[test]
    fn test_power_is_frame_invariant() {
        // Twist moved to the target, wrench moved back to the reference: the power matches
        let x = cyclic_pose();
        let xd = Twist::new(Vector3::new(0.2, -1.0, 0.5), Vector3::new(1.5, 0.3, -0.7));
        let f = Wrench::new(Vector3::new(-0.4, 2.0, 1.0), Vector3::new(3.0, -1.0, 0.25));

        let xd_tgt = xd.transform_ref_to_tgt(&x);
        let f_ref = f.transform_tgt_to_ref(&x);
        let power_tgt = xd_tgt.angular.dot(&f.torque) + xd_tgt.linear.dot(&f.force);
        let power_ref = xd.angular.dot(&f_ref.torque) + xd.linear.dot(&f_ref.force);
        assert!((power_tgt - power_ref).abs() < EPSILON);
    }

    #[test]
    fn test_wrench_add_sub_invert() {
        let a = Wrench::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0));
        let b = Wrench::new(Vector3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(a.add(&b), Wrench::new(Vector3::new(1.5, 2.5, 3.5), Vector3::new(5.0, 6.0, 7.0)));
        assert_eq!(a.sub(&b).add(&b), a);
        assert_eq!(a.add(&a.inverse()), Wrench::zero());
    }

    #[test]
    fn test_momentum_derive() {
        let xd = Twist::new(Vector3::new(0.0, 0.0, 2.0), Vector3::new(1.0, 0.0, 0.0));
        let p = Momentum { angular: Vector3::new(0.0, 1.0, 0.0), linear: Vector3::new(0.0, 3.0, 0.0) };
        let f = xd.derive(&p);
        // ω×n + v×f = (2z×y) + (x×3y) = -2x + 3z; ω×f = 2z×3y = -6x
        assert!((f.torque - Vector3::new(-2.0, 0.0, 3.0)).norm() < EPSILON);
        assert!((f.force - Vector3::new(-6.0, 0.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_rbi_map_matches_articulated_map() {
        let m = sample_rbi();
        let xd = Twist::new(Vector3::new(0.3, 0.2, -0.5), Vector3::new(1.0, -2.0, 0.5));
        let p = m.map(&xd);
        let f = m.to_articulated().map(&AccTwist::new(xd.angular, xd.linear));
        assert!((p.angular - f.torque).norm() < EPSILON);
        assert!((p.linear - f.force).norm() < EPSILON);
    }

    #[test]
    fn test_rbi_to_abi_blocks() {
        let m = RigidBodyInertia::new(
            2.0,
            Vector3::new(2.0, 0.0, 0.0),
            Matrix3::from_diagonal(&Vector3::new(0.0, 2.0, 2.0)),
        );
        let a = m.to_articulated();
        assert_eq!(a.zeroth_moment, Matrix3::identity() * 2.0);
        assert_eq!(a.first_moment, Matrix3::new(
            0.0, 0.0, 0.0,
            0.0, 0.0, -2.0,
            0.0, 2.0, 0.0,
        ));
        assert_eq!(a.second_moment, m.second_moment);
    }

    #[test]
    fn test_abi_transform_is_congruence() {
        // (Xᵀ M X)·a == Xᵀ·(M·(X·a)) for any acceleration twist a in the reference frame
        let x = Pose::from_rows(&[[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]], &[0.5, -0.2, 1.1]);
        let m = sample_rbi().to_articulated();
        let a = AccTwist::new(Vector3::new(0.1, 0.7, -0.3), Vector3::new(-1.0, 0.4, 2.0));

        let lhs = m.transform_tgt_to_ref(&x).map(&a);
        let rhs = m.map(&a.transform_ref_to_tgt(&x)).transform_tgt_to_ref(&x);
        assert!((lhs.torque - rhs.torque).norm() < EPSILON);
        assert!((lhs.force - rhs.force).norm() < EPSILON);
    }

    #[test]
    fn test_abi_transform_keeps_symmetry() {
        let x = cyclic_pose();
        let m = sample_rbi().to_articulated().transform_tgt_to_ref(&x);
        assert!((m.zeroth_moment - m.zeroth_moment.transpose()).amax() < EPSILON);
        assert!((m.second_moment - m.second_moment.transpose()).amax() < EPSILON);
    }

    #[test]
    fn test_parallel_axis() {
        let m = RigidBodyInertia::from_center_of_mass(2.0, Vector3::new(1.0, 0.0, 0.0), Matrix3::zeros());
        assert_eq!(m.first_moment, Vector3::new(2.0, 0.0, 0.0));
        assert!((m.second_moment - Matrix3::from_diagonal(&Vector3::new(0.0, 2.0, 2.0))).amax() < EPSILON);
        assert!(m.is_symmetric(0.0));
    }
}
