//! Hardcoded chain descriptions for a few test robots

use crate::joint::JointAxis;
use crate::parameters::{ChainParameters, SegmentParameters};
use crate::solver_state::GRAVITY;

const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[allow(dead_code)]
impl SegmentParameters {
    /// Revolute joint about z with a 2 kg link: its center of mass 1 m along x of the link's
    /// root frame, rotational inertia 2 kg·m² about y and z.
    pub fn planar_link(translation: [f64; 3]) -> Self {
        SegmentParameters {
            rotation: IDENTITY,
            translation,
            axis: JointAxis::Z,
            joint_inertia: 1.0,
            mass: 2.0,
            first_moment: [2.0, 0.0, 0.0],
            second_moment: [[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]],
        }
    }
}

#[allow(dead_code)]
impl ChainParameters {
    /// A single planar link on a revolute z joint.
    pub fn one_dof() -> Self {
        ChainParameters {
            segments: vec![SegmentParameters::planar_link([0.0, 0.0, 0.0])],
            gravity: [0.0, 0.0, GRAVITY],
        }
    }

    /// Planar two-link arm, both joints about z, the second joint 2 m along x of the first link.
    pub fn two_dof() -> Self {
        ChainParameters {
            segments: vec![
                SegmentParameters::planar_link([0.0, 0.0, 0.0]),
                SegmentParameters::planar_link([2.0, 0.0, 0.0]),
            ],
            gravity: [0.0, 0.0, GRAVITY],
        }
    }

    /// Three links turning about x, y and z in turn. Every joint sees gravity and the axes are
    /// not parallel, which exercises all three revolute variants.
    pub fn spatial_3dof() -> Self {
        let link = |axis, translation| SegmentParameters {
            axis,
            joint_inertia: 0.1,
            mass: 1.5,
            first_moment: [0.3, 0.15, -0.45],
            second_moment: [[0.2, -0.03, 0.09], [-0.03, 0.255, 0.045], [0.09, 0.045, 0.145]],
            ..SegmentParameters::planar_link(translation)
        };
        ChainParameters {
            segments: vec![
                link(JointAxis::X, [0.0, 0.0, 0.5]),
                link(JointAxis::Y, [0.0, 0.0, 1.0]),
                link(JointAxis::Z, [0.8, 0.0, 0.0]),
            ],
            gravity: [0.0, 0.0, GRAVITY],
        }
    }
}
