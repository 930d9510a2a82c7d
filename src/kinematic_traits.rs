extern crate nalgebra as na;

use na::Isometry3;
use crate::parameter_error::ParameterError;

/// Pose is used a pose of the robot tcp. It contains both Cartesian position and rotation quaternion
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion, Vector3};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(1.0, 0.0, 0.0);
/// // The quaternion should be normalized to represent a valid rotation.
/// let rotation = UnitQuaternion::from_quaternion(na::Quaternion::new(1.0, 0.0, 0.0, 1.0).normalize());
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Values of the joint variables, one per active joint in chain order:
/// radians for revolute joints, meters for prismatic joints.
pub type Joints = Vec<f64>;

pub trait Kinematics {
    /// Number of joint variables the kinematics expects.
    fn dof(&self) -> usize;

    /// Pose of the end effector for the given joint values. Fails with
    /// [ParameterError::InvalidLength] if `qs` does not have [Kinematics::dof] values.
    fn forward(&self, qs: &[f64]) -> Result<Pose, ParameterError>;

    /// Poses of all joint frames (base coordinates), the last one being the end effector.
    fn forward_with_joint_poses(&self, qs: &[f64]) -> Result<Vec<Pose>, ParameterError>;
}
