use tracing::debug;

use crate::achd;
use crate::chain::KinematicChain;
use crate::joint::JointModel;
use crate::kinematic_traits::Dynamics;
use crate::solver_state::SolverState;
use crate::spatial_traits::{Accumulate, Compose, SpatialAdd, TransformMotion};

impl Dynamics for KinematicChain {
    fn forward_position(&self, s: &mut SolverState) {
        assert_eq!(s.njoint(), self.len(), "solver state was sized for a different chain");
        for step in self.iter() {
            let (j, i) = (step.current_index, step.next_index);
            s.x_jnt[j] = step.joint.fpk(s.q[j]);
            s.x_rel[j] = s.x_jnt[j].compose(step.attachment);
            s.x_tot[i] = s.x_rel[j].compose(&s.x_tot[j]);
        }
        debug!("end effector pose: {}", s.end_effector_pose());
    }

    fn forward_velocity(&self, s: &mut SolverState) {
        self.forward_position(s);
        for step in self.iter() {
            let (j, i) = (step.current_index, step.next_index);
            s.xd_jnt[j] = step.joint.fvk(s.qd[j]);
            s.xd_tf[j] = s.xd[j].transform_ref_to_tgt(&s.x_rel[j]);
            s.xd[i] = s.xd_tf[j].accumulate(&s.xd_jnt[j]);
        }
        debug!("end effector twist: {}", s.end_effector_twist());
    }

    fn forward_acceleration(&self, s: &mut SolverState) {
        self.forward_velocity(s);
        for step in self.iter() {
            let (j, i) = (step.current_index, step.next_index);
            s.xdd_bias[j] = step.joint.inertial_acceleration(&s.xd[i], s.qd[j]);
            s.xdd_jnt[j] = step.joint.fak(s.qdd[j]);
            s.xdd_net[j] = s.xdd_jnt[j].add(&s.xdd_bias[j]);
            s.xdd_tf[j] = s.xdd[j].transform_ref_to_tgt(&s.x_rel[j]);
            s.xdd[i] = s.xdd_tf[j].accumulate(&s.xdd_net[j]);
        }
        debug!("end effector acceleration: {}", s.end_effector_acceleration());
    }

    fn hybrid_dynamics(&self, s: &mut SolverState) {
        achd::hybrid_dynamics(self, s);
    }
}
