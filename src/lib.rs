//! Rust implementation of forward kinematics and hybrid dynamics for serial robot chains, using
//! spatial algebra in the style of Featherstone.
//!
//! The solver is the Articulated-body Hybrid Dynamics (ACHD) algorithm, better known as the
//! Vereshchagin solver: given joint positions, velocities and torques, external wrenches on the
//! links and acceleration constraints on the end effector, it computes the joint accelerations in
//! three sweeps over the chain. The constraint forces are balanced through an incrementally
//! updated `LDLᵀ` factorization of the constraint acceleration energy.
//!
//! # Features
//!
//! - Poses, twists, acceleration twists, wrenches, momenta, rigid-body and articulated-body
//!   inertias with their composition laws, all on [nalgebra](https://nalgebra.org) types.
//! - Every spatial quantity also exists as a tag that only records which body it belongs to,
//!   about which point and in which frame it is expressed. Tags are checked when a chain is built:
//!   the complete dynamics is run once on tags, so a chain that exists is frame-consistent.
//! - Revolute joints about x, y or z, with joint-space (rotor) inertia. Other joint kinds can be
//!   added by implementing [`joint::JointModel`].
//! - Forward position, velocity and acceleration kinematics, and hybrid dynamics with external
//!   forces and end-effector constraints. The solvers work on a preallocated
//!   [`solver_state::SolverState`] and do not allocate.
//! - Chain descriptions can be built in code, taken from the built-in robots, or read from YAML
//!   (feature `allow_filesystem`, enabled by default).
//!
//! # Conventions
//!
//! A pose maps coordinates from its reference frame to its target frame. Twists and wrenches are
//! expressed about the origin of the frame they are expressed in, angular part first. Gravity
//! enters as an upward acceleration of the base.
//!
//! ## Examples
//!
//! - **main.rs**: Two-link arm with external force and a full end-effector constraint; reads a
//!   chain from YAML if given one.

pub mod identity;
pub mod spatial_traits;

pub mod geometry;
pub mod geometry_tags;
pub mod mechanics;
pub mod mechanics_tags;

pub mod constraint_energy;

pub mod joint;

pub mod chain;
pub mod chain_error;
pub mod chain_iterator;
pub mod achd_frames;

pub mod solver_state;
mod achd;

pub mod kinematic_traits;
pub mod kinematics_impl;

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;

#[cfg(test)]
mod tests;
