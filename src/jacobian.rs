extern crate nalgebra as na;

use na::{DMatrix, DVector, Vector3};
use crate::chain::Chain;
use crate::kinematic_traits::{Kinematics, Pose};
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::JointKind;

/// Struct representing the Jacobian matrix
pub struct Jacobian {
    /// A 6xN matrix representing the Jacobian, N being the number of active joints.
    ///
    /// The Jacobian matrix maps the joint velocities to the end-effector velocities.
    /// Each column corresponds to a joint, and each row corresponds to a degree of freedom
    /// of the end-effector (linear and angular velocities, base frame).
    matrix: DMatrix<f64>,

    /// Singular values below this are treated as zero by the pseudoinverse
    epsilon: f64,
}

impl Jacobian {
    /// Constructs a new Jacobian struct by computing the geometric Jacobian matrix for the
    /// given chain and joint configuration
    ///
    /// # Arguments
    ///
    /// * `chain` - The kinematic chain
    /// * `qs` - Joint values, one per active joint
    /// * `epsilon` - Singular value threshold for the pseudoinverse
    ///
    /// # Returns
    ///
    /// A new instance of `Jacobian`, or [ParameterError::InvalidLength] if `qs` does not match
    /// the chain.
    pub fn new(chain: &Chain, qs: &[f64], epsilon: f64) -> Result<Self, ParameterError> {
        let matrix = compute_jacobian(chain, qs)?;
        Ok(Self { matrix, epsilon })
    }

    /// The 6 x n matrix, linear rows first.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Computes the joint velocities required to achieve a desired end-effector velocity
    ///
    /// # Arguments
    ///
    /// * `desired_end_effector_velocity` - A 6D vector representing the desired linear and
    ///    angular velocity of the end-effector
    ///
    /// # Returns
    ///
    /// `Result<DVector<f64>, &'static str>` - Joint velocities, or an error message if the
    /// computation fails.
    ///
    /// This method tries to compute the joint velocities using the inverse of the Jacobian matrix.
    /// If the Jacobian matrix is not square or not invertible, it falls back to using the
    /// pseudoinverse.
    pub fn velocities_from_vector(&self, desired_end_effector_velocity: &DVector<f64>) -> Result<DVector<f64>, &'static str> {
        if self.matrix.is_square() {
            if let Some(jacobian_inverse) = self.matrix.clone().try_inverse() {
                return Ok(jacobian_inverse * desired_end_effector_velocity);
            }
        }
        let jacobian_pseudoinverse = self.matrix.clone().pseudo_inverse(self.epsilon)
            .map_err(|_| "Unable to compute the pseudoinverse of the Jacobian matrix")?;
        Ok(jacobian_pseudoinverse * desired_end_effector_velocity)
    }

    /// Least squares solution of `J · dq = error` through the normal equations,
    /// `dq = pinv(JᵀJ) · Jᵀ · error`.
    pub fn least_squares(&self, error: &DVector<f64>) -> Result<DVector<f64>, &'static str> {
        let jt = self.matrix.transpose();
        let normal = &jt * &self.matrix;
        let normal_pseudoinverse = normal.pseudo_inverse(self.epsilon)
            .map_err(|_| "Unable to compute the pseudoinverse of JᵀJ")?;
        Ok(normal_pseudoinverse * (jt * error))
    }

    /// Damped least squares step `dq = (JᵀJ + λI)⁻¹ · Jᵀ · error`. Returns None if the damped
    /// matrix is still singular.
    pub fn damped(&self, error: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
        let n = self.matrix.ncols();
        let jt = self.matrix.transpose();
        let damped = &jt * &self.matrix + DMatrix::<f64>::identity(n, n) * lambda;
        let damped_inverse = damped.try_inverse()?;
        Some(damped_inverse * (jt * error))
    }
}

/// Function to compute the geometric Jacobian matrix for a given chain and joint configuration.
///
/// Joint i rotates about (revolute) or slides along (prismatic) the z axis of the frame
/// preceding it. The revolute column is `[z × (p_ee - o); z]`, the prismatic column is `[z; 0]`.
pub fn compute_jacobian(chain: &Chain, qs: &[f64]) -> Result<DMatrix<f64>, ParameterError> {
    let poses = chain.forward_with_joint_poses(qs)?;
    let n = poses.len();
    let mut jacobian = DMatrix::zeros(6, n);
    let ee_position = poses.last().map(|p| p.translation.vector).unwrap_or_else(Vector3::zeros);

    for (i, joint) in chain.active_joints().iter().enumerate() {
        let frame = if i == 0 { Pose::identity() } else { poses[i - 1] };
        let z = frame.rotation * Vector3::z();
        let origin = frame.translation.vector;

        match joint.kind {
            JointKind::Revolute => {
                let linear = z.cross(&(ee_position - origin));
                jacobian.fixed_view_mut::<3, 1>(0, i).copy_from(&linear);
                jacobian.fixed_view_mut::<3, 1>(3, i).copy_from(&z);
            }
            JointKind::Prismatic => {
                jacobian.fixed_view_mut::<3, 1>(0, i).copy_from(&z);
            }
            JointKind::Disabled => {}
        }
    }

    Ok(jacobian)
}

/// Numerical Jacobian of any [Kinematics] implementation by forward differences.
/// Orientation rows are the scaled axis of the rotation difference, same as for the
/// geometric Jacobian.
pub fn compute_jacobian_numeric(robot: &impl Kinematics, joints: &[f64], epsilon: f64) -> Result<DMatrix<f64>, ParameterError> {
    let n = robot.dof();
    let mut jacobian = DMatrix::zeros(6, n);
    let current_pose = robot.forward(joints)?;
    let current_position = current_pose.translation.vector;
    let current_orientation = current_pose.rotation;

    for i in 0..n {
        let mut perturbed_qs = joints.to_vec();
        perturbed_qs[i] += epsilon;
        let perturbed_pose = robot.forward(&perturbed_qs)?;

        let delta_position = (perturbed_pose.translation.vector - current_position) / epsilon;
        let delta_orientation = (perturbed_pose.rotation * current_orientation.inverse()).scaled_axis() / epsilon;

        jacobian.fixed_view_mut::<3, 1>(0, i).copy_from(&delta_position);
        jacobian.fixed_view_mut::<3, 1>(3, i).copy_from(&delta_orientation);
    }

    Ok(jacobian)
}
