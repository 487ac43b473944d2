//! Joint capability set and the revolute joint.
//!
//! Every joint kind implements [`JointModel`]: how the joint moves (position, velocity and
//! acceleration through its motion subspace `S`), how forces are seen from the joint
//! (`Sᵀ·F`), and how articulated inertias, wrenches and accelerations are projected across it.
//! [`Joint`] is the sum type the chain stores; adding a joint kind means adding a variant and
//! implementing the trait for it. [`JointFrames`] is the symbolic counterpart that checks and
//! propagates the identities of everything that flows through the joint.

use std::fmt;

use nalgebra::{DMatrix, Matrix3, Vector3};

use crate::constraint_energy::LdltFactorization;
use crate::geometry::{AccTwist, Pose, Twist};
use crate::geometry_tags::{AccTwistTag, PoseTag, TwistTag};
use crate::identity::{require, BodyId, FrameId, TagMismatch};
use crate::mechanics::{ArticulatedBodyInertia, Wrench};
use crate::mechanics_tags::{AbiTag, WrenchTag};
use crate::spatial_traits::Derive;

/// Numeric joint operators.
pub trait JointModel {
    /// Joint pose `X_J(q)`, from the joint's reference frame to its target frame.
    fn fpk(&self, q: f64) -> Pose;

    /// `S·qd`
    fn fvk(&self, qd: f64) -> Twist;

    /// `S·qdd`
    fn fak(&self, qdd: f64) -> AccTwist;

    /// Velocity-product acceleration `Ṡ·qd + xd × S·qd` of the joint, where `xd` is the twist of
    /// the joint's target body.
    fn inertial_acceleration(&self, xd: &Twist, qd: f64) -> AccTwist;

    /// Apparent inertia `D = Sᵀ·M·S` plus the joint-space (rotor) inertia.
    fn apparent_inertia(&self, m: &ArticulatedBodyInertia) -> f64;

    /// `tau[i] = Sᵀ·f[i]`
    fn ifk(&self, f: &[Wrench], tau: &mut [f64]);

    /// `f[i] = M·S·D⁻¹·tau[i]`
    fn ffd(&self, m: &ArticulatedBodyInertia, tau: &[f64], f: &mut [Wrench]);

    /// `M − M·S·D⁻¹·Sᵀ·M`, the inertia transmitted through the joint.
    fn project_inertia(&self, m: &ArticulatedBodyInertia) -> ArticulatedBodyInertia;

    /// `r[i] = f[i] − M·S·D⁻¹·Sᵀ·f[i]`
    fn project_wrench(&self, m: &ArticulatedBodyInertia, f: &[Wrench], r: &mut [Wrench]);

    /// `xdd − S·D⁻¹·Sᵀ·M·xdd`
    fn project_acc_twist(&self, m: &ArticulatedBodyInertia, xdd: &AccTwist) -> AccTwist;

    /// `d_out = d_in + D⁻¹·(Sᵀ·f)(Sᵀ·f)ᵀ`, the joint's contribution to the constraint
    /// acceleration energy.
    fn decomp_e_cstr(&self, m: &ArticulatedBodyInertia, f: &[Wrench],
                     d_in: &LdltFactorization, d_out: &mut LdltFactorization);

    /// `e = D⁻¹·(Sᵀ·f1)(Sᵀ·f2)ᵀ`
    fn cart_force_to_eacc(&self, m: &ArticulatedBodyInertia, f1: &[Wrench], f2: &[Wrench],
                          e: &mut DMatrix<f64>);

    /// [`JointModel::ifk`] of a single wrench.
    fn ifk_single(&self, f: &Wrench) -> f64 {
        let mut tau = [0.0];
        self.ifk(std::slice::from_ref(f), &mut tau);
        tau[0]
    }

    /// [`JointModel::ffd`] of a single torque.
    fn ffd_single(&self, m: &ArticulatedBodyInertia, tau: f64) -> Wrench {
        let mut f = [Wrench::zero()];
        self.ffd(m, &[tau], &mut f);
        f[0]
    }

    /// [`JointModel::project_wrench`] of a single wrench.
    fn project_wrench_single(&self, m: &ArticulatedBodyInertia, f: &Wrench) -> Wrench {
        let mut r = [Wrench::zero()];
        self.project_wrench(m, std::slice::from_ref(f), &mut r);
        r[0]
    }
}

/// Cartesian axis of a single-axis joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointAxis {
    X,
    Y,
    Z,
}

impl JointAxis {
    pub fn index(self) -> usize {
        match self {
            JointAxis::X => 0,
            JointAxis::Y => 1,
            JointAxis::Z => 2,
        }
    }

    /// Parses "x", "y" or "z" (any case).
    pub fn from_name(name: &str) -> Option<JointAxis> {
        match name.trim().to_ascii_lowercase().as_str() {
            "x" => Some(JointAxis::X),
            "y" => Some(JointAxis::Y),
            "z" => Some(JointAxis::Z),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JointAxis::X => "x",
            JointAxis::Y => "y",
            JointAxis::Z => "z",
        }
    }
}

impl fmt::Display for JointAxis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Revolute joint about one Cartesian axis of its target frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevoluteJoint {
    pub axis: JointAxis,
    /// Joint-space inertia added to the apparent inertia (motor rotor, gearbox).
    pub inertia: f64,
}

impl RevoluteJoint {
    pub fn new(axis: JointAxis, inertia: f64) -> Self {
        RevoluteJoint { axis, inertia }
    }

    /// Apparent inertia, asserting that it is positive.
    fn d(&self, m: &ArticulatedBodyInertia) -> f64 {
        let d = self.apparent_inertia(m);
        assert!(d > 0.0, "singular apparent inertia at revolute joint about {}", self.axis);
        d
    }
}

impl JointModel for RevoluteJoint {
    fn fpk(&self, q: f64) -> Pose {
        let (s, c) = q.sin_cos();
        let rotation = match self.axis {
            JointAxis::X => Matrix3::new(
                1.0, 0.0, 0.0,
                0.0, c, s,
                0.0, -s, c,
            ),
            JointAxis::Y => Matrix3::new(
                c, 0.0, -s,
                0.0, 1.0, 0.0,
                s, 0.0, c,
            ),
            JointAxis::Z => Matrix3::new(
                c, s, 0.0,
                -s, c, 0.0,
                0.0, 0.0, 1.0,
            ),
        };
        Pose::new(rotation, Vector3::zeros())
    }

    fn fvk(&self, qd: f64) -> Twist {
        let mut angular = Vector3::zeros();
        angular[self.axis.index()] = qd;
        Twist::new(angular, Vector3::zeros())
    }

    fn fak(&self, qdd: f64) -> AccTwist {
        let mut angular = Vector3::zeros();
        angular[self.axis.index()] = qdd;
        AccTwist::new(angular, Vector3::zeros())
    }

    fn inertial_acceleration(&self, xd: &Twist, qd: f64) -> AccTwist {
        // Ṡ vanishes for a fixed axis
        xd.derive(&self.fvk(qd))
    }

    fn apparent_inertia(&self, m: &ArticulatedBodyInertia) -> f64 {
        let k = self.axis.index();
        m.second_moment[(k, k)] + self.inertia
    }

    fn ifk(&self, f: &[Wrench], tau: &mut [f64]) {
        debug_assert_eq!(f.len(), tau.len());
        let k = self.axis.index();
        for (t, w) in tau.iter_mut().zip(f) {
            *t = w.torque[k];
        }
    }

    fn ffd(&self, m: &ArticulatedBodyInertia, tau: &[f64], f: &mut [Wrench]) {
        debug_assert_eq!(f.len(), tau.len());
        let k = self.axis.index();
        let d = self.d(m);
        let i_k = m.second_moment.column(k);
        let h_k = m.first_moment.row(k).transpose();
        for (w, t) in f.iter_mut().zip(tau) {
            let qdd = t / d;
            w.torque = i_k * qdd;
            w.force = h_k * qdd;
        }
    }

    fn project_inertia(&self, m: &ArticulatedBodyInertia) -> ArticulatedBodyInertia {
        let k = self.axis.index();
        let d = self.d(m);
        let i_col = m.second_moment.column(k);
        let i_row = m.second_moment.row(k);
        let h_row = m.first_moment.row(k);

        ArticulatedBodyInertia {
            zeroth_moment: m.zeroth_moment - h_row.transpose() * h_row / d,
            first_moment: m.first_moment - i_col * h_row / d,
            second_moment: m.second_moment - i_col * i_row / d,
        }
    }

    fn project_wrench(&self, m: &ArticulatedBodyInertia, f: &[Wrench], r: &mut [Wrench]) {
        debug_assert_eq!(f.len(), r.len());
        let k = self.axis.index();
        let d = self.d(m);
        let i_k = m.second_moment.column(k);
        let h_k = m.first_moment.row(k).transpose();
        for (out, w) in r.iter_mut().zip(f) {
            let qdd = w.torque[k] / d;
            out.torque = w.torque - i_k * qdd;
            out.force = w.force - h_k * qdd;
        }
    }

    fn project_acc_twist(&self, m: &ArticulatedBodyInertia, xdd: &AccTwist) -> AccTwist {
        let k = self.axis.index();
        let d = self.d(m);
        let tau = m.second_moment.row(k).transpose().dot(&xdd.angular)
            + m.first_moment.row(k).transpose().dot(&xdd.linear);
        let mut r = *xdd;
        r.angular[k] -= tau / d;
        r
    }

    fn decomp_e_cstr(&self, m: &ArticulatedBodyInertia, f: &[Wrench],
                     d_in: &LdltFactorization, d_out: &mut LdltFactorization) {
        debug_assert_eq!(f.len(), d_in.dim());
        let k = self.axis.index();
        let d = self.d(m);
        d_out.rank_one_update_from(d_in, 1.0 / d, |i| f[i].torque[k]);
    }

    fn cart_force_to_eacc(&self, m: &ArticulatedBodyInertia, f1: &[Wrench], f2: &[Wrench],
                          e: &mut DMatrix<f64>) {
        debug_assert_eq!(e.shape(), (f1.len(), f2.len()));
        let k = self.axis.index();
        let d = self.d(m);
        for (i, a) in f1.iter().enumerate() {
            for (j, b) in f2.iter().enumerate() {
                e[(i, j)] = a.torque[k] * b.torque[k] / d;
            }
        }
    }
}

/// A joint of the chain. Only revolute joints exist; new kinds are added as variants that
/// implement [`JointModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joint {
    Revolute(RevoluteJoint),
}

impl Joint {
    pub fn revolute(axis: JointAxis, inertia: f64) -> Self {
        Joint::Revolute(RevoluteJoint::new(axis, inertia))
    }
}

impl JointModel for Joint {
    fn fpk(&self, q: f64) -> Pose {
        match self {
            Joint::Revolute(j) => j.fpk(q),
        }
    }

    fn fvk(&self, qd: f64) -> Twist {
        match self {
            Joint::Revolute(j) => j.fvk(qd),
        }
    }

    fn fak(&self, qdd: f64) -> AccTwist {
        match self {
            Joint::Revolute(j) => j.fak(qdd),
        }
    }

    fn inertial_acceleration(&self, xd: &Twist, qd: f64) -> AccTwist {
        match self {
            Joint::Revolute(j) => j.inertial_acceleration(xd, qd),
        }
    }

    fn apparent_inertia(&self, m: &ArticulatedBodyInertia) -> f64 {
        match self {
            Joint::Revolute(j) => j.apparent_inertia(m),
        }
    }

    fn ifk(&self, f: &[Wrench], tau: &mut [f64]) {
        match self {
            Joint::Revolute(j) => j.ifk(f, tau),
        }
    }

    fn ffd(&self, m: &ArticulatedBodyInertia, tau: &[f64], f: &mut [Wrench]) {
        match self {
            Joint::Revolute(j) => j.ffd(m, tau, f),
        }
    }

    fn project_inertia(&self, m: &ArticulatedBodyInertia) -> ArticulatedBodyInertia {
        match self {
            Joint::Revolute(j) => j.project_inertia(m),
        }
    }

    fn project_wrench(&self, m: &ArticulatedBodyInertia, f: &[Wrench], r: &mut [Wrench]) {
        match self {
            Joint::Revolute(j) => j.project_wrench(m, f, r),
        }
    }

    fn project_acc_twist(&self, m: &ArticulatedBodyInertia, xdd: &AccTwist) -> AccTwist {
        match self {
            Joint::Revolute(j) => j.project_acc_twist(m, xdd),
        }
    }

    fn decomp_e_cstr(&self, m: &ArticulatedBodyInertia, f: &[Wrench],
                     d_in: &LdltFactorization, d_out: &mut LdltFactorization) {
        match self {
            Joint::Revolute(j) => j.decomp_e_cstr(m, f, d_in, d_out),
        }
    }

    fn cart_force_to_eacc(&self, m: &ArticulatedBodyInertia, f1: &[Wrench], f2: &[Wrench],
                          e: &mut DMatrix<f64>) {
        match self {
            Joint::Revolute(j) => j.cart_force_to_eacc(m, f1, f2, e),
        }
    }
}

/// Identities a joint connects: it moves `target_body` (whose frame `target_frame` it drives)
/// relative to `reference_body` (at `reference_frame`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointFrames {
    pub target_body: BodyId,
    pub target_frame: FrameId,
    pub reference_body: BodyId,
    pub reference_frame: FrameId,
}

impl JointFrames {
    pub fn new(target_body: BodyId, target_frame: FrameId,
               reference_body: BodyId, reference_frame: FrameId) -> Self {
        JointFrames { target_body, target_frame, reference_body, reference_frame }
    }

    pub fn fpk(&self) -> PoseTag {
        PoseTag::new(self.target_body, self.target_frame, self.reference_body, self.reference_frame)
    }

    pub fn fvk(&self) -> TwistTag {
        TwistTag::screw(self.target_body, self.reference_body, self.target_frame)
    }

    pub fn fak(&self) -> AccTwistTag {
        AccTwistTag::screw(self.target_body, self.reference_body, self.target_frame)
    }

    pub fn inertial_acceleration(&self, xd: &TwistTag) -> Result<AccTwistTag, TagMismatch> {
        const OP: &str = "joint_inertial_acceleration";
        require(xd.is_screw(), OP, "twist must be a screw twist")?;
        require(xd.target_body == self.target_body, OP, "twist must move the target body of the joint")?;
        require(xd.frame == self.target_frame, OP, "twist must be expressed in the target frame of the joint")?;
        Ok(self.fak())
    }

    pub fn ifk(&self, f: &WrenchTag) -> Result<(), TagMismatch> {
        self.check_wrench(f, "joint_ifk")
    }

    pub fn ffd(&self, m: &AbiTag) -> Result<WrenchTag, TagMismatch> {
        self.check_inertia(m, "joint_ffd")?;
        Ok(WrenchTag::at_origin(self.reference_body, self.target_frame))
    }

    pub fn project_inertia(&self, m: &AbiTag) -> Result<AbiTag, TagMismatch> {
        self.check_inertia(m, "joint_project_inertia")?;
        Ok(AbiTag { body: self.reference_body, point: m.point, frame: m.frame })
    }

    pub fn project_wrench(&self, m: &AbiTag, f: &WrenchTag) -> Result<WrenchTag, TagMismatch> {
        const OP: &str = "joint_project_wrench";
        self.check_inertia(m, OP)?;
        self.check_wrench(f, OP)?;
        Ok(WrenchTag { body: self.reference_body, point: m.point, frame: m.frame })
    }

    pub fn project_acc_twist(&self, m: &AbiTag, xdd: &AccTwistTag) -> Result<AccTwistTag, TagMismatch> {
        const OP: &str = "joint_project_acc_twist";
        self.check_inertia(m, OP)?;
        require(xdd.is_screw(), OP, "acceleration twist must be a screw twist")?;
        require(xdd.target_body == self.target_body, OP,
                "acceleration twist must move the target body of the joint")?;
        require(xdd.frame == self.target_frame, OP,
                "acceleration twist must be expressed in the target frame of the joint")?;
        Ok(*xdd)
    }

    pub fn decomp_e_cstr(&self, m: &AbiTag, f: &WrenchTag) -> Result<(), TagMismatch> {
        const OP: &str = "joint_decomp_e_cstr";
        self.check_inertia(m, OP)?;
        self.check_wrench(f, OP)
    }

    pub fn cart_force_to_eacc(&self, m: &AbiTag, f1: &WrenchTag, f2: &WrenchTag) -> Result<(), TagMismatch> {
        const OP: &str = "joint_cart_force_to_eacc";
        self.check_inertia(m, OP)?;
        self.check_wrench(f1, OP)?;
        self.check_wrench(f2, OP)
    }

    fn check_inertia(&self, m: &AbiTag, op: &'static str) -> Result<(), TagMismatch> {
        require(m.point == m.frame.origin(), op, "inertia must be expressed about the origin of its frame")?;
        require(m.body == self.target_body, op, "inertia must belong to the target body of the joint")?;
        require(m.frame == self.target_frame, op, "inertia must be expressed in the target frame of the joint")
    }

    fn check_wrench(&self, f: &WrenchTag, op: &'static str) -> Result<(), TagMismatch> {
        require(f.is_screw(), op, "wrench must be expressed about the origin of its frame")?;
        require(f.body == self.target_body, op, "wrench must act on the target body of the joint")?;
        require(f.frame == self.target_frame, op, "wrench must be expressed in the target frame of the joint")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identities;
    use crate::mechanics::RigidBodyInertia;
    use crate::spatial_traits::{MapMotion, ToArticulated};
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-12;

    fn assert_matrix_approx_eq(a: &Matrix3<f64>, b: &Matrix3<f64>, epsilon: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert!((a[(i, j)] - b[(i, j)]).abs() < epsilon,
                        "Mismatch at ({}, {}): {} vs {}", i, j, a[(i, j)], b[(i, j)]);
            }
        }
    }

    fn sample_abi() -> ArticulatedBodyInertia {
        RigidBodyInertia::from_center_of_mass(
            3.0,
            Vector3::new(0.2, 0.5, -0.3),
            Matrix3::new(
                0.5, 0.02, 0.01,
                0.02, 0.4, 0.03,
                0.01, 0.03, 0.3,
            ),
        ).to_articulated()
    }

    #[test]
    fn test_fpk_quarter_turn() {
        let x = RevoluteJoint::new(JointAxis::X, 0.0).fpk(PI / 2.0);
        assert_matrix_approx_eq(&x.rotation, &Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, -1.0, 0.0,
        ), EPSILON);
        assert_eq!(x.translation, Vector3::zeros());

        let y = RevoluteJoint::new(JointAxis::Y, 0.0).fpk(PI / 2.0);
        assert_matrix_approx_eq(&y.rotation, &Matrix3::new(
            0.0, 0.0, -1.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,
        ), EPSILON);

        let z = RevoluteJoint::new(JointAxis::Z, 0.0).fpk(PI / 2.0);
        assert_matrix_approx_eq(&z.rotation, &Matrix3::new(
            0.0, 1.0, 0.0,
            -1.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
        ), EPSILON);
    }

    #[test]
    fn test_fvk_fak_select_axis() {
        for (axis, k) in [(JointAxis::X, 0), (JointAxis::Y, 1), (JointAxis::Z, 2)] {
            let joint = Joint::revolute(axis, 0.0);
            let xd = joint.fvk(1.5);
            let xdd = joint.fak(-2.0);
            let mut expected = Vector3::zeros();
            expected[k] = 1.5;
            assert_eq!(xd.angular, expected);
            assert_eq!(xd.linear, Vector3::zeros());
            expected[k] = -2.0;
            assert_eq!(xdd.angular, expected);
            assert_eq!(xdd.linear, Vector3::zeros());
        }
    }

    #[test]
    fn test_inertial_acceleration() {
        let xd = Twist::new(Vector3::new(2.0, 3.0, 4.0), Vector3::new(3.0, 4.0, 5.0));
        let cases = [
            (JointAxis::X, Vector3::new(0.0, 8.0, -6.0), Vector3::new(0.0, 10.0, -8.0)),
            (JointAxis::Y, Vector3::new(-8.0, 0.0, 4.0), Vector3::new(-10.0, 0.0, 6.0)),
            (JointAxis::Z, Vector3::new(6.0, -4.0, 0.0), Vector3::new(8.0, -6.0, 0.0)),
        ];
        for (axis, angular, linear) in cases {
            let r = RevoluteJoint::new(axis, 0.0).inertial_acceleration(&xd, 2.0);
            assert_eq!(r.angular, angular, "axis {}", axis);
            assert_eq!(r.linear, linear, "axis {}", axis);
        }
    }

    #[test]
    fn test_ifk_extracts_axis_torque() {
        let joint = RevoluteJoint::new(JointAxis::Y, 0.0);
        let f = [
            Wrench::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)),
            Wrench::new(Vector3::new(-1.0, -7.0, 0.0), Vector3::zeros()),
        ];
        let mut tau = [0.0; 2];
        joint.ifk(&f, &mut tau);
        assert_eq!(tau, [2.0, -7.0]);
        assert_eq!(joint.ifk_single(&f[0]), 2.0);
    }

    #[test]
    fn test_ffd_then_ifk_scales_by_apparent_inertia() {
        let m = sample_abi();
        for axis in [JointAxis::X, JointAxis::Y, JointAxis::Z] {
            let joint = RevoluteJoint::new(axis, 0.5);
            let k = axis.index();
            let d = joint.apparent_inertia(&m);
            assert!((d - (m.second_moment[(k, k)] + 0.5)).abs() < EPSILON);

            let f = joint.ffd_single(&m, 2.0);
            let tau = joint.ifk_single(&f);
            assert!((tau - 2.0 * m.second_moment[(k, k)] / d).abs() < EPSILON);
        }
    }

    #[test]
    fn test_projected_inertia_cannot_resist_joint_motion() {
        // Without joint inertia the projected inertia has no stiffness along S
        let m = sample_abi();
        for axis in [JointAxis::X, JointAxis::Y, JointAxis::Z] {
            let k = axis.index();
            let p = RevoluteJoint::new(axis, 0.0).project_inertia(&m);
            let f = p.map(&RevoluteJoint::new(axis, 0.0).fak(1.0));
            assert!(f.torque.norm() < EPSILON, "axis {}: {}", axis, f.torque);
            assert!(f.force.norm() < EPSILON, "axis {}: {}", axis, f.force);
            assert!(p.second_moment[(k, k)].abs() < EPSILON);
        }
    }

    #[test]
    fn test_projections_agree() {
        // P·(M·a) == (P·M)·a == M·(Pᵀ·a)
        let m = sample_abi();
        let a = AccTwist::new(Vector3::new(0.3, -0.4, 1.2), Vector3::new(2.0, 0.5, -1.0));
        for axis in [JointAxis::X, JointAxis::Y, JointAxis::Z] {
            let joint = RevoluteJoint::new(axis, 0.7);
            let via_inertia = joint.project_inertia(&m).map(&a);
            let via_wrench = joint.project_wrench_single(&m, &m.map(&a));
            let via_acc = m.map(&joint.project_acc_twist(&m, &a));

            assert!((via_inertia.torque - via_wrench.torque).norm() < EPSILON);
            assert!((via_inertia.force - via_wrench.force).norm() < EPSILON);
            assert!((via_inertia.torque - via_acc.torque).norm() < EPSILON);
            assert!((via_inertia.force - via_acc.force).norm() < EPSILON);
        }
    }

    #[test]
    fn test_projected_inertia_stays_symmetric() {
        let m = RevoluteJoint::new(JointAxis::Z, 1.0).project_inertia(&sample_abi());
        assert_matrix_approx_eq(&m.zeroth_moment, &m.zeroth_moment.transpose(), EPSILON);
        assert_matrix_approx_eq(&m.second_moment, &m.second_moment.transpose(), EPSILON);
    }

    #[test]
    fn test_decomp_e_cstr_matches_cart_force_to_eacc() {
        let m = sample_abi();
        let joint = Joint::revolute(JointAxis::X, 0.25);
        let f = [
            Wrench::new(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros()),
            Wrench::new(Vector3::new(-2.0, 1.0, 0.0), Vector3::zeros()),
            Wrench::new(Vector3::new(0.5, 0.0, 3.0), Vector3::zeros()),
        ];
        let d_in = LdltFactorization::zeros(3);
        let mut d_out = LdltFactorization::zeros(3);
        joint.decomp_e_cstr(&m, &f, &d_in, &mut d_out);

        let mut e = DMatrix::zeros(3, 3);
        joint.cart_force_to_eacc(&m, &f, &f, &mut e);
        let r = d_out.reconstruct();
        for i in 0..3 {
            for j in 0..3 {
                assert!((r[(i, j)] - e[(i, j)]).abs() < EPSILON);
            }
        }
    }

    #[test]
    #[should_panic(expected = "singular apparent inertia")]
    fn test_singular_apparent_inertia_panics() {
        let joint = RevoluteJoint::new(JointAxis::Z, 0.0);
        joint.project_inertia(&ArticulatedBodyInertia::zero());
    }

    #[test]
    #[should_panic(expected = "singular apparent inertia")]
    fn test_negative_apparent_inertia_panics() {
        let mut m = ArticulatedBodyInertia::zero();
        m.second_moment[(2, 2)] = -1.0;
        RevoluteJoint::new(JointAxis::Z, 0.5).project_inertia(&m);
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(JointAxis::from_name(" Z "), Some(JointAxis::Z));
        assert_eq!(JointAxis::from_name("w"), None);
        assert_eq!(JointAxis::Y.to_string(), "y");
    }

    #[test]
    fn test_joint_frames_tags() {
        let mut ids = Identities::new();
        let link_0 = ids.add_body("link_0");
        let link_1 = ids.add_body("link_1");
        let tip_0 = ids.add_frame_with_origin("link_0_tip");
        let root_1 = ids.add_frame_with_origin("link_1_root");
        let joint = JointFrames::new(link_1, root_1, link_0, tip_0);

        assert_eq!(joint.fpk(), PoseTag::new(link_1, root_1, link_0, tip_0));
        assert_eq!(joint.fvk(), TwistTag::screw(link_1, link_0, root_1));

        let m = AbiTag::at_origin(link_1, root_1);
        assert_eq!(joint.project_inertia(&m), Ok(AbiTag::at_origin(link_0, root_1)));
        assert_eq!(joint.ffd(&m), Ok(WrenchTag::at_origin(link_0, root_1)));

        let f = WrenchTag::at_origin(link_1, root_1);
        assert_eq!(joint.project_wrench(&m, &f), Ok(WrenchTag::at_origin(link_0, root_1)));
        assert!(joint.ifk(&f).is_ok());

        // A wrench already moved across the joint cannot be projected again
        let projected = WrenchTag::at_origin(link_0, root_1);
        assert!(joint.project_wrench(&m, &projected).is_err());
        assert!(joint.ifk(&projected).is_err());

        let xd = TwistTag::screw(link_1, link_0, root_1);
        assert_eq!(joint.inertial_acceleration(&xd), Ok(joint.fak()));
        let elsewhere = TwistTag::screw(link_1, link_0, tip_0);
        assert!(joint.inertial_acceleration(&elsewhere).is_err());
    }
}
