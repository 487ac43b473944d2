#[cfg(test)]
mod tests {
    use crate::chain_error::ChainError;
    use crate::kinematic_traits::Dynamics;
    use crate::parameters::ChainParameters;
    use crate::solver_state::SolverState;
    use crate::utils::assert_joints_eq;

    const READ_ERROR: &'static str = "Failed to load chain from file";

    #[test]
    fn test_chain_from_yaml() {
        let filename = "src/tests/data/chains/two_dof.yaml";
        let loaded = ChainParameters::from_yaml_file(filename).expect(READ_ERROR);
        assert_eq!(loaded, ChainParameters::two_dof());
    }

    #[test]
    fn test_chain_from_yaml_with_defaults() {
        // No gravity, no rotation, no joint type: the built-in chain is reproduced anyway
        let filename = "src/tests/data/chains/spatial_3dof.yaml";
        let loaded = ChainParameters::from_yaml_file(filename).expect(READ_ERROR);
        assert_eq!(loaded, ChainParameters::spatial_3dof());
    }

    #[test]
    fn test_loaded_chain_runs() {
        let filename = "src/tests/data/chains/two_dof.yaml";
        let parameters = ChainParameters::from_yaml_file(filename).expect(READ_ERROR);
        let chain = parameters.to_chain().expect("valid chain");
        let mut s = SolverState::new(&chain, 0);
        s.set_base_acceleration(parameters.base_acceleration());
        s.q.copy_from_slice(&[1.0, 1.0]);
        s.qd.copy_from_slice(&[1.0, 1.0]);
        s.tau_ff.copy_from_slice(&[1.0, 1.0]);
        chain.hybrid_dynamics(&mut s);
        assert!(s.qdd.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_to_yaml_reads_back() {
        for parameters in [ChainParameters::one_dof(), ChainParameters::two_dof(),
                           ChainParameters::spatial_3dof()] {
            let yaml = parameters.to_yaml();
            let loaded = ChainParameters::from_yaml_str(&yaml).expect(READ_ERROR);
            assert_eq!(loaded, parameters, "{}", yaml);
        }
    }

    #[test]
    fn test_gravity_is_read() {
        let yaml = "gravity: [0, -9.81, 0]\nsegments:\n  - joint: {axis: x}\n    link: \
                    {mass: 1, first_moment: [0, 0, 0], second_moment: [[1, 0, 0], [0, 1, 0], [0, 0, 1]]}\n";
        let loaded = ChainParameters::from_yaml_str(yaml).expect(READ_ERROR);
        assert_eq!(loaded.gravity, [0.0, -9.81, 0.0]);
        assert_eq!(loaded.segments[0].joint_inertia, 0.0);

        // Center of mass on the joint axis: gravity exerts no torque
        let chain = loaded.to_chain().expect("valid chain");
        let mut s = SolverState::new(&chain, 0);
        s.set_base_acceleration(loaded.base_acceleration());
        chain.hybrid_dynamics(&mut s);
        assert_joints_eq(&s.qdd, &[0.0], 1e-12);
    }

    #[test]
    fn test_chain_from_yaml_rejects_bad_axis() {
        let filename = "src/tests/data/test/invalid_axis.yaml";
        let err = ChainParameters::from_yaml_file(filename).unwrap_err();
        assert!(matches!(err, ChainError::InvalidAxis(_)), "{err}");
        assert!(err.to_string().contains("segments[0].joint.axis"), "{err}");
    }

    #[test]
    fn test_chain_from_yaml_rejects_missing_mass() {
        let filename = "src/tests/data/test/missing_mass.yaml";
        let err = ChainParameters::from_yaml_file(filename).unwrap_err();
        assert!(matches!(&err, ChainError::MissingField(f) if f == "segments[0].link.mass"), "{err}");
    }

    #[test]
    fn test_chain_from_yaml_rejects_short_vector() {
        let filename = "src/tests/data/test/short_translation.yaml";
        let err = ChainParameters::from_yaml_file(filename).unwrap_err();
        assert!(matches!(err, ChainError::InvalidLength { expected: 3, found: 2 }), "{err}");
    }

    #[test]
    fn test_chain_from_yaml_rejects_unknown_joint() {
        let filename = "src/tests/data/test/prismatic_joint.yaml";
        let err = ChainParameters::from_yaml_file(filename).unwrap_err();
        assert!(err.to_string().contains("unsupported joint type 'prismatic'"), "{err}");
    }

    #[test]
    fn test_chain_from_yaml_rejects_empty_chain() {
        let filename = "src/tests/data/test/no_segments.yaml";
        let err = ChainParameters::from_yaml_file(filename).unwrap_err();
        assert!(matches!(err, ChainError::EmptyChain), "{err}");
    }

    #[test]
    fn test_asymmetric_inertia_is_rejected_by_the_chain() {
        // Parsing only checks the shape, the chain checks the physics
        let filename = "src/tests/data/test/asymmetric_inertia.yaml";
        let loaded = ChainParameters::from_yaml_file(filename).expect(READ_ERROR);
        assert!(matches!(loaded.to_chain(), Err(ChainError::InvalidInertia(_))));
    }

    #[test]
    fn test_last_joint_without_inertia_is_rejected() {
        // Mass spread around the x axis only, turning about x moves nothing
        let yaml = "segments:\n  - joint: {axis: x}\n    link: \
                    {mass: 2, first_moment: [0, 0, 0], second_moment: [[0, 0, 0], [0, 2, 0], [0, 0, 2]]}\n";
        let loaded = ChainParameters::from_yaml_str(yaml).expect(READ_ERROR);
        assert!(matches!(loaded.to_chain(), Err(ChainError::InvalidInertia(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = ChainParameters::from_yaml_file("src/tests/data/no_such_chain.yaml").unwrap_err();
        assert!(matches!(err, ChainError::IoError(_)), "{err}");
    }

    #[test]
    fn test_non_numeric_value() {
        let yaml = "segments:\n  - joint: {axis: z}\n    link: \
                    {mass: heavy, first_moment: [0, 0, 0], second_moment: [[1, 0, 0], [0, 1, 0], [0, 0, 1]]}\n";
        let err = ChainParameters::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ChainError::ParseError(_)), "{err}");
    }
}
