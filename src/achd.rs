//! Articulated-body hybrid dynamics (ACHD) on coordinates.
//!
//! Three sweeps over the chain:
//! 1. outward: poses, velocities, bias accelerations, rigid-body inertias and bias forces;
//! 2. inward: articulated inertias, the bias, feed-forward, external and constraint force
//!    channels projected across each joint, and the constraint acceleration-energy factorization;
//! 3. outward, after the energy balance: joint accelerations and body accelerations.
//!
//! The identity tags of every quantity computed here are checked once, when the chain is built
//! (see [`crate::achd_frames`]).

use tracing::{debug, trace, warn};

use crate::chain::KinematicChain;
use crate::constraint_energy::balance;
use crate::joint::JointModel;
use crate::mechanics::{ArticulatedBodyInertia, Wrench};
use crate::solver_state::SolverState;
use crate::spatial_traits::{
    Accumulate, Compose, Derive, Invert, MapMotion, SpatialAdd, ToArticulated, TransformForce,
    TransformMotion,
};

pub(crate) fn hybrid_dynamics(chain: &KinematicChain, s: &mut SolverState) {
    let n = chain.len();
    assert_eq!(s.njoint(), n, "solver state was sized for a different chain");
    debug!("hybrid dynamics over {} joints, {} constraints", n, s.constraint_count());

    reset_accumulators(s);
    outward_kinematics(chain, s);
    inward_accumulation(chain, s);

    let truncated = balance(&s.d_cstr_art[0], &s.e_cstr, &mut s.nu);
    if truncated > 0 {
        warn!("energy balance truncated {} of {} constraints", truncated, s.constraint_count());
    }

    outward_accelerations(chain, s);
}

/// Clears the entries the sweeps add into or start from, so a state can be reused.
fn reset_accumulators(s: &mut SolverState) {
    let n = s.njoint();
    s.m_art[0] = ArticulatedBodyInertia::zero();
    s.f_bias_art[0] = Wrench::zero();
    s.f_ext_art[0] = Wrench::zero();
    s.f_ff_art[n] = Wrench::zero();
    s.f_cstr_art[n].copy_from_slice(&s.f_cstr);
    s.d_cstr_art[n].reset();
}

fn outward_kinematics(chain: &KinematicChain, s: &mut SolverState) {
    for i in 1..=chain.len() {
        let segment = chain.segment(i - 1);
        let joint = &segment.joint;
        let j = i - 1;

        s.x_jnt[j] = joint.fpk(s.q[j]);
        s.x_rel[j] = s.x_jnt[j].compose(&segment.attachment);
        s.x_tot[i] = s.x_rel[j].compose(&s.x_tot[i - 1]);

        s.xd_jnt[j] = joint.fvk(s.qd[j]);
        s.xd_tf[j] = s.xd[i - 1].transform_ref_to_tgt(&s.x_rel[j]);
        s.xd[i] = s.xd_tf[j].accumulate(&s.xd_jnt[j]);
        s.xdd_bias[j] = joint.inertial_acceleration(&s.xd[i], s.qd[j]);

        s.m_art[i] = segment.inertia.to_articulated();
        s.p[j] = segment.inertia.map(&s.xd[i]);
        s.f_bias_art[i] = s.xd[i].derive(&s.p[j]);
        s.f_ext_art[i] = s.f_ext[j].inverse();

        trace!("body {}: xd = {}, f_bias = {}", i, s.xd[i], s.f_bias_art[i]);
    }
}

fn inward_accumulation(chain: &KinematicChain, s: &mut SolverState) {
    for i in (1..=chain.len()).rev() {
        let joint = &chain.segment(i - 1).joint;
        let j = i - 1;
        let x_rel = &s.x_rel[j];
        let m = s.m_art[i];

        s.m_app[j] = joint.project_inertia(&m);
        s.m_tf[j] = s.m_app[j].transform_tgt_to_ref(x_rel);
        s.m_art[i - 1] = s.m_art[i - 1].add(&s.m_tf[j]);

        s.f_bias_eom[j] = m.map(&s.xdd_bias[j]).add(&s.f_bias_art[i]);
        s.f_bias_app[j] = joint.project_wrench_single(&m, &s.f_bias_eom[j]);
        s.f_bias_art[i - 1] = s.f_bias_art[i - 1].add(&s.f_bias_app[j].transform_tgt_to_ref(x_rel));

        s.f_ff_app[j] = joint.project_wrench_single(&m, &s.f_ff_art[i]).add(&joint.ffd_single(&m, s.tau_ff[j]));
        s.f_ff_art[i - 1] = s.f_ff_app[j].transform_tgt_to_ref(x_rel);

        s.f_ext_app[j] = joint.project_wrench_single(&m, &s.f_ext_art[i]);
        s.f_ext_art[i - 1] = s.f_ext_art[i - 1].add(&s.f_ext_app[j].transform_tgt_to_ref(x_rel));

        let (inboard, outboard) = s.f_cstr_art.split_at_mut(i);
        joint.project_wrench(&m, &outboard[0], &mut s.f_cstr_app[j]);
        for (art, app) in inboard[i - 1].iter_mut().zip(&s.f_cstr_app[j]) {
            *art = app.transform_tgt_to_ref(x_rel);
        }

        let (d_inboard, d_outboard) = s.d_cstr_art.split_at_mut(i);
        joint.decomp_e_cstr(&m, &outboard[0], &d_outboard[0], &mut d_inboard[i - 1]);

        trace!("body {}: m_art = {}", i - 1, s.m_art[i - 1]);
    }
}

fn outward_accelerations(chain: &KinematicChain, s: &mut SolverState) {
    for i in 1..=chain.len() {
        let joint = &chain.segment(i - 1).joint;
        let j = i - 1;
        let m = &s.m_art[i];

        s.xdd_tf[j] = s.xdd[i - 1].transform_ref_to_tgt(&s.x_rel[j]);
        s.xdd_nact[j] = s.xdd_tf[j].accumulate(&s.xdd_bias[j]);
        s.f_bias_nact[j] = m.map(&s.xdd_nact[j]).add(&s.f_bias_art[i]);

        s.tau_bias_art[j] = joint.ifk_single(&s.f_bias_nact[j]);
        s.tau_ff_art[j] = joint.ifk_single(&s.f_ff_art[i]);
        s.tau_ext_art[j] = joint.ifk_single(&s.f_ext_art[i]);
        joint.ifk(&s.f_cstr_art[i], s.tau_cstr_art[j].as_mut_slice());
        s.tau_cstr[j] = s.nu.dot(&s.tau_cstr_art[j]);

        s.tau_ctrl[j] = s.tau_ff[j] - s.tau_ff_art[j] - s.tau_bias_art[j] - s.tau_ext_art[j] + s.tau_cstr[j];
        s.qdd[j] = s.tau_ctrl[j] / joint.apparent_inertia(m);

        s.xdd_jnt[j] = joint.fak(s.qdd[j]);
        s.xdd_net[j] = s.xdd_jnt[j].add(&s.xdd_bias[j]);
        s.xdd[i] = s.xdd_tf[j].accumulate(&s.xdd_net[j]);

        trace!("joint {}: tau_ctrl = {:.6}, qdd = {:.6}", j, s.tau_ctrl[j], s.qdd[j]);
    }
}
