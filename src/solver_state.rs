//! Preallocated buffers of the dynamics solvers.
//!
//! Body-indexed arrays have `N + 1` entries, with entry 0 for the base and entry `N` for the end
//! effector. Joint-indexed arrays have `N` entries, entry `i - 1` belongs to the joint that moves
//! body `i`. [`crate::achd_frames::ChainFrames`] holds the matching identity tags.

use nalgebra::{DMatrix, DVector, Vector3};

use crate::chain::KinematicChain;
use crate::constraint_energy::LdltFactorization;
use crate::geometry::{AccTwist, Pose, Twist};
use crate::mechanics::{ArticulatedBodyInertia, Momentum, Wrench};

/// Standard gravity, m/s².
pub const GRAVITY: f64 = 9.81;

/// Inputs, outputs and every intermediate quantity of one solver call.
///
/// Sized once for a chain and a number of end-effector constraints; the solvers overwrite the
/// contents on every call and never allocate.
#[derive(Debug, Clone)]
pub struct SolverState {
    nbody: usize,
    constraint_count: usize,

    // Joint space
    pub q: Vec<f64>,
    pub qd: Vec<f64>,
    pub qdd: Vec<f64>,
    pub tau_ff: Vec<f64>,

    /// External wrench on each moving body, expressed at the origin of the body's root frame.
    pub f_ext: Vec<Wrench>,
    /// Constraint wrenches on the end effector, expressed in its root frame.
    pub f_cstr: Vec<Wrench>,
    /// Desired constraint acceleration energy, one entry per constraint.
    pub e_cstr: DVector<f64>,

    // Poses
    pub x_jnt: Vec<Pose>,
    pub x_rel: Vec<Pose>,
    pub x_tot: Vec<Pose>,

    // Velocities
    pub xd: Vec<Twist>,
    pub xd_jnt: Vec<Twist>,
    pub xd_tf: Vec<Twist>,

    // Accelerations. `xdd[0]` is the base acceleration and carries gravity.
    pub xdd: Vec<AccTwist>,
    pub xdd_jnt: Vec<AccTwist>,
    pub xdd_bias: Vec<AccTwist>,
    pub xdd_net: Vec<AccTwist>,
    pub xdd_tf: Vec<AccTwist>,
    pub xdd_nact: Vec<AccTwist>,

    pub p: Vec<Momentum>,

    // Inertias
    pub m_art: Vec<ArticulatedBodyInertia>,
    pub m_app: Vec<ArticulatedBodyInertia>,
    pub m_tf: Vec<ArticulatedBodyInertia>,

    // Bias force channel
    pub f_bias_art: Vec<Wrench>,
    pub f_bias_eom: Vec<Wrench>,
    pub f_bias_app: Vec<Wrench>,
    pub f_bias_nact: Vec<Wrench>,

    // Feed-forward force channel
    pub f_ff_art: Vec<Wrench>,
    pub f_ff_app: Vec<Wrench>,

    // External force channel
    pub f_ext_art: Vec<Wrench>,
    pub f_ext_app: Vec<Wrench>,

    // Constraint force channel, `constraint_count` wrenches per entry
    pub f_cstr_art: Vec<Vec<Wrench>>,
    pub f_cstr_app: Vec<Vec<Wrench>>,
    pub d_cstr_art: Vec<LdltFactorization>,
    /// Scale of each constraint wrench, from the energy balance.
    pub nu: DVector<f64>,

    // Joint torques per channel
    pub tau_bias_art: Vec<f64>,
    pub tau_ff_art: Vec<f64>,
    pub tau_ext_art: Vec<f64>,
    pub tau_cstr_art: Vec<DVector<f64>>,
    pub tau_cstr: Vec<f64>,
    pub tau_ctrl: Vec<f64>,
}

impl SolverState {
    /// Allocates the state for `chain` with `constraint_count` end-effector constraints.
    /// Everything starts at zero except `x_tot[0]`, which is the identity, and the base
    /// acceleration, which is set to counter gravity along +z.
    pub fn new(chain: &KinematicChain, constraint_count: usize) -> Self {
        let n = chain.len();
        let nbody = n + 1;
        let wrench_sets = |len: usize| vec![vec![Wrench::zero(); constraint_count]; len];

        let mut state = SolverState {
            nbody,
            constraint_count,
            q: vec![0.0; n],
            qd: vec![0.0; n],
            qdd: vec![0.0; n],
            tau_ff: vec![0.0; n],
            f_ext: vec![Wrench::zero(); n],
            f_cstr: vec![Wrench::zero(); constraint_count],
            e_cstr: DVector::zeros(constraint_count),
            x_jnt: vec![Pose::identity(); n],
            x_rel: vec![Pose::identity(); n],
            x_tot: vec![Pose::identity(); nbody],
            xd: vec![Twist::zero(); nbody],
            xd_jnt: vec![Twist::zero(); n],
            xd_tf: vec![Twist::zero(); n],
            xdd: vec![AccTwist::zero(); nbody],
            xdd_jnt: vec![AccTwist::zero(); n],
            xdd_bias: vec![AccTwist::zero(); n],
            xdd_net: vec![AccTwist::zero(); n],
            xdd_tf: vec![AccTwist::zero(); n],
            xdd_nact: vec![AccTwist::zero(); n],
            p: vec![Momentum::default(); n],
            m_art: vec![ArticulatedBodyInertia::zero(); nbody],
            m_app: vec![ArticulatedBodyInertia::zero(); n],
            m_tf: vec![ArticulatedBodyInertia::zero(); n],
            f_bias_art: vec![Wrench::zero(); nbody],
            f_bias_eom: vec![Wrench::zero(); n],
            f_bias_app: vec![Wrench::zero(); n],
            f_bias_nact: vec![Wrench::zero(); n],
            f_ff_art: vec![Wrench::zero(); nbody],
            f_ff_app: vec![Wrench::zero(); n],
            f_ext_art: vec![Wrench::zero(); nbody],
            f_ext_app: vec![Wrench::zero(); n],
            f_cstr_art: wrench_sets(nbody),
            f_cstr_app: wrench_sets(n),
            d_cstr_art: vec![LdltFactorization::zeros(constraint_count); nbody],
            nu: DVector::zeros(constraint_count),
            tau_bias_art: vec![0.0; n],
            tau_ff_art: vec![0.0; n],
            tau_ext_art: vec![0.0; n],
            tau_cstr_art: vec![DVector::zeros(constraint_count); n],
            tau_cstr: vec![0.0; n],
            tau_ctrl: vec![0.0; n],
        };
        state.set_base_acceleration(AccTwist::new(Vector3::zeros(), Vector3::new(0.0, 0.0, GRAVITY)));
        state
    }

    /// Number of bodies including the base.
    pub fn nbody(&self) -> usize {
        self.nbody
    }

    /// Number of joints.
    pub fn njoint(&self) -> usize {
        self.nbody - 1
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_count
    }

    /// Acceleration of the base, in the base frame. Gravity enters here as an upward
    /// acceleration of the base.
    pub fn set_base_acceleration(&mut self, xdd: AccTwist) {
        self.xdd[0] = xdd;
    }

    pub fn set_base_velocity(&mut self, xd: Twist) {
        self.xd[0] = xd;
    }

    /// Sets the end-effector constraints: wrench `i` is scaled to deliver acceleration energy
    /// `e_cstr[i]`.
    pub fn set_constraints(&mut self, f_cstr: &[Wrench], e_cstr: &[f64]) {
        assert_eq!(f_cstr.len(), self.constraint_count, "one wrench per constraint");
        assert_eq!(e_cstr.len(), self.constraint_count, "one energy per constraint");
        self.f_cstr.copy_from_slice(f_cstr);
        self.e_cstr.copy_from_slice(e_cstr);
    }

    /// Constraint acceleration-energy matrix seen at the base, rebuilt from its factorization.
    /// Allocates.
    pub fn constraint_energy(&self) -> DMatrix<f64> {
        self.d_cstr_art[0].reconstruct()
    }

    pub fn end_effector_pose(&self) -> &Pose {
        &self.x_tot[self.nbody - 1]
    }

    pub fn end_effector_twist(&self) -> &Twist {
        &self.xd[self.nbody - 1]
    }

    pub fn end_effector_acceleration(&self) -> &AccTwist {
        &self.xdd[self.nbody - 1]
    }
}
