use crate::solver_state::SolverState;

/// Kinematic and dynamic solvers of a chain. All of them read their inputs from the solver
/// state and write their results back into it, without allocating.
pub trait Dynamics {
    /// Forward position kinematics: joint poses `x_jnt`, link poses `x_rel` and poses relative
    /// to the base `x_tot`, from `q`.
    fn forward_position(&self, state: &mut SolverState);

    /// Forward velocity kinematics: body twists `xd` from `q` and `qd`. Updates poses as well.
    fn forward_velocity(&self, state: &mut SolverState);

    /// Forward acceleration kinematics: body accelerations `xdd` from `q`, `qd` and the given
    /// `qdd`. Updates poses and twists as well.
    fn forward_acceleration(&self, state: &mut SolverState);

    /// Hybrid dynamics: joint accelerations `qdd` and body accelerations `xdd` from `q`, `qd`,
    /// the feed-forward torques `tau_ff`, the external wrenches `f_ext` and the end-effector
    /// constraints `f_cstr` with their acceleration energies `e_cstr`.
    fn hybrid_dynamics(&self, state: &mut SolverState);
}
