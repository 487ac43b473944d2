use anyhow::{bail, Result};
use nalgebra::Vector3;

use rs_achd_dynamics::kinematic_traits::Dynamics;
use rs_achd_dynamics::mechanics::Wrench;
use rs_achd_dynamics::parameters::ChainParameters;
use rs_achd_dynamics::solver_state::SolverState;
use rs_achd_dynamics::utils::{dump_acc_twist, dump_constraints, dump_joints, dump_pose, dump_twist};

/// Unit torques about x, y, z followed by unit forces along x, y, z: constrains every direction
/// of the end effector acceleration.
fn full_constraint() -> Vec<Wrench> {
    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    axes.iter().map(|a| Wrench::new(*a, Vector3::zeros()))
        .chain(axes.iter().map(|a| Wrench::new(Vector3::zeros(), *a)))
        .collect()
}

struct Scenario {
    parameters: ChainParameters,
    q: Vec<f64>,
    qd: Vec<f64>,
    tau: Vec<f64>,
    constrained: bool,
}

impl Scenario {
    /// The two-link arm moving with unit position, velocity and torque on both joints.
    fn two_dof() -> Self {
        Scenario {
            parameters: ChainParameters::two_dof(),
            q: vec![1.0, 1.0],
            qd: vec![1.0, 1.0],
            tau: vec![1.0, 1.0],
            constrained: true,
        }
    }

    fn run(&self) -> Result<()> {
        let chain = self.parameters.to_chain()?;
        let n = chain.len();
        for (name, values) in [("q", &self.q), ("qd", &self.qd), ("tau", &self.tau)] {
            if values.len() != n {
                bail!("{} has {} values, the chain has {} joints", name, values.len(), n);
            }
        }

        let f_cstr = if self.constrained { full_constraint() } else { Vec::new() };
        let mut state = SolverState::new(&chain, f_cstr.len());
        state.set_base_acceleration(self.parameters.base_acceleration());
        state.q.copy_from_slice(&self.q);
        state.qd.copy_from_slice(&self.qd);
        state.tau_ff.copy_from_slice(&self.tau);
        state.f_ext[n - 1] = Wrench::new(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0));
        state.set_constraints(&f_cstr, &vec![1.0; f_cstr.len()]);

        chain.forward_velocity(&mut state);
        println!("End effector pose:");
        dump_pose(state.end_effector_pose());
        println!("End effector twist:");
        dump_twist(state.end_effector_twist());

        chain.hybrid_dynamics(&mut state);
        println!("End effector acceleration:");
        dump_acc_twist(state.end_effector_acceleration());
        dump_joints("qdd", &state.qdd);
        if self.constrained {
            dump_constraints(&state.nu);
        }
        Ok(())
    }
}

#[cfg(feature = "allow_filesystem")]
mod cli {
    use clap::Parser;

    /// Hybrid dynamics of a serial chain
    #[derive(Parser)]
    #[command(name = "rs-achd-dynamics")]
    #[command(about = "Forward kinematics and hybrid dynamics of a serial chain", long_about = None)]
    pub struct Cli {
        /// Chain description (YAML). The built-in two-link arm if not given.
        #[arg(long)]
        pub chain: Option<std::path::PathBuf>,

        /// Joint positions, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        pub q: Option<Vec<f64>>,

        /// Joint velocities, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        pub qd: Option<Vec<f64>>,

        /// Feed-forward joint torques, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        pub tau: Option<Vec<f64>>,

        /// Constrain all six directions of the end effector acceleration
        #[arg(long)]
        pub constraints: bool,
    }
}

/// Usage example.
#[cfg(feature = "allow_filesystem")]
fn main() -> Result<()> {
    use anyhow::Context;
    use clap::Parser;

    let args = cli::Cli::parse();
    let scenario = match &args.chain {
        Some(path) => {
            let parameters = ChainParameters::from_yaml_file(path)
                .with_context(|| format!("reading chain from {}", path.display()))?;
            let n = parameters.segments.len();
            Scenario {
                parameters,
                q: args.q.clone().unwrap_or_else(|| vec![0.0; n]),
                qd: args.qd.clone().unwrap_or_else(|| vec![0.0; n]),
                tau: args.tau.clone().unwrap_or_else(|| vec![0.0; n]),
                constrained: args.constraints,
            }
        }
        None => {
            let default = Scenario::two_dof();
            Scenario {
                q: args.q.clone().unwrap_or(default.q),
                qd: args.qd.clone().unwrap_or(default.qd),
                tau: args.tau.clone().unwrap_or(default.tau),
                constrained: args.constraints,
                parameters: default.parameters,
            }
        }
    };

    println!("Chain:\n{}", scenario.parameters.to_yaml());
    scenario.run()
}

/// Usage example.
#[cfg(not(feature = "allow_filesystem"))]
fn main() -> Result<()> {
    Scenario::two_dof().run()
}
