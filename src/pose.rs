//! Target pose from Cartesian coordinates and three rotation angles.
//!
//! Angles A, B, C are intrinsic rotations about X, then the new Y, then the new Z axis,
//! so the rotation matrix is `R = Rx(A) · Ry(B) · Rz(C)`. This is not the roll-pitch-yaw
//! convention of [UnitQuaternion::from_euler_angles] (which is `Rz · Ry · Rx`).

use nalgebra::{Translation3, UnitQuaternion, Vector3};
use crate::kinematic_traits::Pose;

/// Builds the pose from position (X, Y, Z) and intrinsic X-Y-Z angles (A, B, C), radians.
pub fn pose_from_xyzabc(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Pose {
    let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), a)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), b)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), c);
    Pose::from_parts(Translation3::new(x, y, z), rotation)
}

/// Same as [pose_from_xyzabc], taking the six values in one array.
pub fn pose_from_array(values: &[f64; 6]) -> Pose {
    let [x, y, z, a, b, c] = *values;
    pose_from_xyzabc(x, y, z, a, b, c)
}

/// Inverse of [pose_from_xyzabc]: returns `[X, Y, Z, A, B, C]`. With `B = ±π/2` (gimbal lock)
/// the split between A and C is not unique; C is then reported as zero.
pub fn pose_to_xyzabc(pose: &Pose) -> [f64; 6] {
    let t = pose.translation.vector;
    let r = pose.rotation.to_rotation_matrix();
    let m = r.matrix();

    // R = Rx(a) Ry(b) Rz(c):
    // m[(0,2)] = sin b, m[(1,2)] = -sin a cos b, m[(2,2)] = cos a cos b,
    // m[(0,0)] = cos b cos c, m[(0,1)] = -cos b sin c
    let sin_b = m[(0, 2)].clamp(-1.0, 1.0);
    let b = sin_b.asin();
    let (a, c) = if sin_b.abs() < 1.0 - 1E-12 {
        (f64::atan2(-m[(1, 2)], m[(2, 2)]), f64::atan2(-m[(0, 1)], m[(0, 0)]))
    } else {
        // Gimbal lock, only a ± c is defined
        (f64::atan2(m[(2, 1)], m[(1, 1)]), 0.0)
    };
    [t.x, t.y, t.z, a, b, c]
}
