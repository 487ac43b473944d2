//! Helper functions

use nalgebra::{DVector, Vector3};

use crate::geometry::{AccTwist, Pose, Twist};
use crate::mechanics::Wrench;

/// Checks if all elements are finite.
pub fn is_valid(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Print joint values, in radians.
#[allow(dead_code)]
pub fn dump_joints(name: &str, joints: &[f64]) {
    let mut row_str = String::new();
    for q in joints {
        row_str.push_str(&format!("{:9.5} ", q));
    }
    println!("{}: [{}]", name, row_str.trim_end());
}

/// Print the scale of each constraint.
#[allow(dead_code)]
pub fn dump_constraints(nu: &DVector<f64>) {
    dump_joints("nu", nu.as_slice());
}

pub fn dump_pose(pose: &Pose) {
    let e = &pose.rotation;
    let r = &pose.translation;
    println!("x: {:.5}, y: {:.5}, z: {:.5}", r.x, r.y, r.z);
    for i in 0..3 {
        println!("  [{:9.5} {:9.5} {:9.5}]", e[(i, 0)], e[(i, 1)], e[(i, 2)]);
    }
}

pub fn dump_twist(xd: &Twist) {
    println!("angular: {}, linear: {}", vector(&xd.angular), vector(&xd.linear));
}

pub fn dump_acc_twist(xdd: &AccTwist) {
    println!("angular: {}, linear: {}", vector(&xdd.angular), vector(&xdd.linear));
}

pub fn dump_wrench(f: &Wrench) {
    println!("torque: {}, force: {}", vector(&f.torque), vector(&f.force));
}

fn vector(v: &Vector3<f64>) -> String {
    format!("[{:.5}, {:.5}, {:.5}]", v.x, v.y, v.z)
}

/// Panics with both poses printed if rotation or translation differ by more than `tolerance`
/// in any element.
pub fn assert_pose_eq(ta: &Pose, tb: &Pose, tolerance: f64) -> bool {
    fn bad(ta: &Pose, tb: &Pose) {
        dump_pose(ta);
        dump_pose(tb);
    }

    if (ta.translation - tb.translation).amax() > tolerance {
        bad(ta, tb);
        panic!("Poses have too different translations");
    }

    if (ta.rotation - tb.rotation).amax() > tolerance {
        bad(ta, tb);
        panic!("Poses have too different rotations");
    }
    true
}

pub fn assert_acc_twist_eq(a: &AccTwist, b: &AccTwist, tolerance: f64) -> bool {
    if (a.angular - b.angular).amax() > tolerance || (a.linear - b.linear).amax() > tolerance {
        dump_acc_twist(a);
        dump_acc_twist(b);
        panic!("Acceleration twists differ by more than {}", tolerance);
    }
    true
}

pub fn assert_wrench_eq(a: &Wrench, b: &Wrench, tolerance: f64) -> bool {
    if (a.torque - b.torque).amax() > tolerance || (a.force - b.force).amax() > tolerance {
        dump_wrench(a);
        dump_wrench(b);
        panic!("Wrenches differ by more than {}", tolerance);
    }
    true
}

pub fn assert_joints_eq(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    assert_eq!(a.len(), b.len(), "Joint vectors have different lengths");
    if a.iter().zip(b).any(|(x, y)| (x - y).abs() > tolerance) {
        dump_joints("left ", a);
        dump_joints("right", b);
        panic!("Joint values differ by more than {}", tolerance);
    }
    true
}
