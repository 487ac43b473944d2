//! Defines the plain-number chain description

use nalgebra::{Matrix3, Vector3};

use crate::chain::{ChainBuilder, KinematicChain};
use crate::chain_error::ChainError;
use crate::geometry::{AccTwist, Pose};
use crate::joint::{Joint, JointAxis};
use crate::mechanics::RigidBodyInertia;

/// One segment of the chain: how the joint is mounted on the previous link, the joint itself, and
/// the link the joint moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentParameters {
    /// Rows of the attachment rotation, from the previous link's root frame to the frame the
    /// joint is mounted on.
    pub rotation: [[f64; 3]; 3],

    /// Attachment translation, expressed in the previous link's root frame.
    pub translation: [f64; 3],

    /// Axis of the revolute joint, in the joint's frames.
    pub axis: JointAxis,

    /// Joint-space inertia (rotor, gearbox) added to the apparent inertia of the joint.
    pub joint_inertia: f64,

    /// Mass of the link.
    pub mass: f64,

    /// Mass times the center of mass, in the link's root frame.
    pub first_moment: [f64; 3],

    /// Rotational inertia about the origin of the link's root frame (rows).
    pub second_moment: [[f64; 3]; 3],
}

/// Chain description. See [parameters_robots.rs](parameters_robots.rs) for the built-in robots.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainParameters {
    /// Segments from the base to the end effector.
    pub segments: Vec<SegmentParameters>,

    /// Gravity compensation applied as an acceleration of the base, in the base frame. Pointing up
    /// (+z) for gravity pulling down.
    pub gravity: [f64; 3],
}

impl SegmentParameters {
    pub fn attachment(&self) -> Pose {
        Pose::from_rows(&self.rotation, &self.translation)
    }

    pub fn joint(&self) -> Joint {
        Joint::revolute(self.axis, self.joint_inertia)
    }

    pub fn inertia(&self) -> RigidBodyInertia {
        RigidBodyInertia::new(
            self.mass,
            Vector3::from(self.first_moment),
            Matrix3::from_fn(|r, c| self.second_moment[r][c]),
        )
    }
}

impl ChainParameters {
    /// Builds and validates the chain. Bodies are named `link_0` (base) to `link_N`.
    pub fn to_chain(&self) -> Result<KinematicChain, ChainError> {
        self.segments
            .iter()
            .fold(ChainBuilder::new(), |builder, s| builder.segment(s.attachment(), s.joint(), s.inertia()))
            .build()
    }

    /// Base acceleration that accounts for gravity, as the solvers expect it in
    /// [`crate::solver_state::SolverState::set_base_acceleration`].
    pub fn base_acceleration(&self) -> AccTwist {
        AccTwist::new(Vector3::zeros(), Vector3::from(self.gravity))
    }

    /// Convert to string yaml representation (quick viewing, etc).
    pub fn to_yaml(&self) -> String {
        let mut yaml = format!("gravity: {}\nsegments:\n", vector(&self.gravity));
        for s in &self.segments {
            yaml.push_str(&format!(
                "  - attachment:\n      \
                rotation: {}\n      \
                translation: {}\n    \
              joint:\n      \
                type: revolute\n      \
                axis: {}\n      \
                inertia: {}\n    \
              link:\n      \
                mass: {}\n      \
                first_moment: {}\n      \
                second_moment: {}\n",
                matrix(&s.rotation),
                vector(&s.translation),
                s.axis,
                s.joint_inertia,
                s.mass,
                vector(&s.first_moment),
                matrix(&s.second_moment),
            ));
        }
        yaml
    }
}

fn vector(v: &[f64; 3]) -> String {
    format!("[{}]", v.iter().map(|x| format!("{:?}", x)).collect::<Vec<_>>().join(", "))
}

fn matrix(m: &[[f64; 3]; 3]) -> String {
    format!("[{}]", m.iter().map(vector).collect::<Vec<_>>().join(", "))
}
