//! Dense reference dynamics and random chains for the crate tests.
//!
//! The reference works on 6×6 spatial matrices (angular part first) and solves
//! `(H + diag(joint inertia))·qdd = tau − C` with `H` and `C` from recursive Newton-Euler. It shares
//! no code with the solvers under test, only the numbers of the chain description.

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, Vector3, Vector6};
use rand::rngs::StdRng;
use rand::Rng;

use crate::joint::JointAxis;
use crate::mechanics::Wrench;
use crate::parameters::{ChainParameters, SegmentParameters};

fn rows(m: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::from_fn(|r, c| m[r][c])
}

fn axis_vector(axis: JointAxis) -> Vector3<f64> {
    match axis {
        JointAxis::X => Vector3::x(),
        JointAxis::Y => Vector3::y(),
        JointAxis::Z => Vector3::z(),
    }
}

/// Coordinate transform for a rotation by `q` about `axis`.
fn rotation(axis: JointAxis, q: f64) -> Matrix3<f64> {
    // Transpose of the active rotation
    nalgebra::Rotation3::from_axis_angle(&nalgebra::Unit::new_normalize(axis_vector(axis)), q)
        .matrix()
        .transpose()
}

/// Plücker motion transform for coordinates moving from a frame to one rotated by `e` and
/// displaced by `r` (expressed in the first frame).
fn motion_transform(e: &Matrix3<f64>, r: &Vector3<f64>) -> Matrix6<f64> {
    let mut x = Matrix6::zeros();
    x.fixed_view_mut::<3, 3>(0, 0).copy_from(e);
    x.fixed_view_mut::<3, 3>(3, 3).copy_from(e);
    x.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-e * r.cross_matrix()));
    x
}

fn spatial_inertia(s: &SegmentParameters) -> Matrix6<f64> {
    let h = Vector3::from(s.first_moment).cross_matrix();
    let mut i = Matrix6::zeros();
    i.fixed_view_mut::<3, 3>(0, 0).copy_from(&rows(&s.second_moment));
    i.fixed_view_mut::<3, 3>(0, 3).copy_from(&h);
    i.fixed_view_mut::<3, 3>(3, 0).copy_from(&h.transpose());
    i.fixed_view_mut::<3, 3>(3, 3).copy_from(&(Matrix3::identity() * s.mass));
    i
}

fn crm(v: &Vector6<f64>) -> Matrix6<f64> {
    let w = Vector3::new(v[0], v[1], v[2]).cross_matrix();
    let l = Vector3::new(v[3], v[4], v[5]).cross_matrix();
    let mut m = Matrix6::zeros();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&w);
    m.fixed_view_mut::<3, 3>(3, 3).copy_from(&w);
    m.fixed_view_mut::<3, 3>(3, 0).copy_from(&l);
    m
}

fn wrench6(f: &Wrench) -> Vector6<f64> {
    Vector6::new(f.torque.x, f.torque.y, f.torque.z, f.force.x, f.force.y, f.force.z)
}

/// Joint torques for the given motion by recursive Newton-Euler.
pub fn inverse_dynamics(chain: &ChainParameters, q: &[f64], qd: &[f64], qdd: &[f64],
                        f_ext: &[Wrench], base_acceleration: Vector6<f64>) -> Vec<f64> {
    let n = chain.segments.len();
    let mut x = Vec::with_capacity(n);
    let mut f = Vec::with_capacity(n);
    let mut v = Vector6::zeros();
    let mut a = base_acceleration;

    for (i, s) in chain.segments.iter().enumerate() {
        let joint = motion_transform(&rotation(s.axis, q[i]), &Vector3::zeros());
        let x_i = joint * motion_transform(&rows(&s.rotation), &Vector3::from(s.translation));
        let mut axis = Vector6::zeros();
        axis.fixed_rows_mut::<3>(0).copy_from(&axis_vector(s.axis));

        v = x_i * v + axis * qd[i];
        a = x_i * a + axis * qdd[i] + crm(&v) * axis * qd[i];
        let inertia = spatial_inertia(s);
        f.push(inertia * a - crm(&v).transpose() * inertia * v - wrench6(&f_ext[i]));
        x.push((x_i, axis));
    }

    let mut tau = vec![0.0; n];
    for i in (0..n).rev() {
        let (x_i, axis) = &x[i];
        tau[i] = axis.dot(&f[i]);
        if i > 0 {
            let transmitted = x_i.transpose() * f[i];
            f[i - 1] += transmitted;
        }
    }
    tau
}

/// Joint accelerations of the unconstrained chain, from the joint-space equation of motion.
pub fn forward_dynamics(chain: &ChainParameters, q: &[f64], qd: &[f64], tau: &[f64],
                        f_ext: &[Wrench]) -> Vec<f64> {
    let n = chain.segments.len();
    let g = Vector6::new(0.0, 0.0, 0.0, chain.gravity[0], chain.gravity[1], chain.gravity[2]);
    let bias = inverse_dynamics(chain, q, qd, &vec![0.0; n], f_ext, g);

    let no_force = vec![Wrench::zero(); n];
    let mut h = DMatrix::zeros(n, n);
    for c in 0..n {
        let mut unit = vec![0.0; n];
        unit[c] = 1.0;
        let column = inverse_dynamics(chain, q, &vec![0.0; n], &unit, &no_force, Vector6::zeros());
        for r in 0..n {
            h[(r, c)] = column[r];
        }
        h[(c, c)] += chain.segments[c].joint_inertia;
    }

    let rhs = DVector::from_iterator(n, (0..n).map(|i| tau[i] - bias[i]));
    let qdd = h.lu().solve(&rhs).expect("joint-space inertia must be invertible");
    qdd.iter().copied().collect()
}

/// Random rotation matrix rows, as a product of rotations about x, y and z.
pub fn random_rotation(rng: &mut StdRng) -> [[f64; 3]; 3] {
    let e = rotation(JointAxis::X, rng.gen_range(-3.0..3.0))
        * rotation(JointAxis::Y, rng.gen_range(-3.0..3.0))
        * rotation(JointAxis::Z, rng.gen_range(-3.0..3.0));
    [[e[(0, 0)], e[(0, 1)], e[(0, 2)]],
     [e[(1, 0)], e[(1, 1)], e[(1, 2)]],
     [e[(2, 0)], e[(2, 1)], e[(2, 2)]]]
}

pub fn random_vector(rng: &mut StdRng, range: f64) -> [f64; 3] {
    [rng.gen_range(-range..range), rng.gen_range(-range..range), rng.gen_range(-range..range)]
}

/// A physically meaningful random chain: positive masses, positive definite inertias about the
/// center of mass, arbitrary attachments and axes.
pub fn random_chain(rng: &mut StdRng, n: usize) -> ChainParameters {
    let segments = (0..n).map(|_| {
        let mass = rng.gen_range(0.5..3.0);
        let com = Vector3::from(random_vector(rng, 0.5));
        let principal = Vector3::new(rng.gen_range(0.05..0.5), rng.gen_range(0.05..0.5),
                                     rng.gen_range(0.05..0.5));
        let orientation = rows(&random_rotation(rng));
        let inertia_com = orientation.transpose() * Matrix3::from_diagonal(&principal) * orientation;
        let c = com.cross_matrix();
        let inertia = inertia_com + c * c.transpose() * mass;
        // Exactly symmetric
        let inertia = (inertia + inertia.transpose()) * 0.5;

        SegmentParameters {
            rotation: random_rotation(rng),
            translation: random_vector(rng, 1.0),
            axis: [JointAxis::X, JointAxis::Y, JointAxis::Z][rng.gen_range(0..3)],
            joint_inertia: rng.gen_range(0.0..0.2),
            mass,
            first_moment: (com * mass).into(),
            second_moment: [[inertia[(0, 0)], inertia[(0, 1)], inertia[(0, 2)]],
                            [inertia[(1, 0)], inertia[(1, 1)], inertia[(1, 2)]],
                            [inertia[(2, 0)], inertia[(2, 1)], inertia[(2, 2)]]],
        }
    }).collect();
    ChainParameters { segments, gravity: [0.0, 0.0, 9.81] }
}

pub fn random_joints(rng: &mut StdRng, n: usize, range: f64) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-range..range)).collect()
}
