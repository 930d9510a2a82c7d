//! Rust implementation of forward and numerical inverse kinematics for serial robots
//! described by Denavit-Hartenberg parameters.
//!
//! # Features
//!
//! - Chains of up to six revolute or prismatic joints in the standard DH convention
//!   (`RotZ(θ) · TransZ(d) · TransX(a) · RotX(α)`). Trailing joints can be disabled to
//!   model shorter arms.
//! - Joint parameters can be given as short arithmetic expressions like `pi/2` or `-0,425`,
//!   evaluated by a small whitelist parser (no general purpose evaluator is involved).
//! - Forward kinematics, including the poses of all intermediate joint frames.
//! - Iterative inverse kinematics with Levenberg-Marquardt, Gauss-Newton and Newton-Raphson
//!   solvers on the geometric Jacobian, optionally respecting joint limits.
//! - Built-in parameters of Puma 560 and Universal Robots UR3, UR5 and UR10.
//! - DH tables can be read from and written to CSV files (`allow_filesystem` feature, default).
//! - Several targets can be solved in parallel (`parallel` feature).
//!
//! # Parameters
//!
//! Each joint has four DH parameters (_θ, d, a, α_) and lower / upper limits of its joint
//! variable. For revolute joints θ is the joint variable, for prismatic joints d is.
//! Target poses are given as position and intrinsic X-Y-Z rotation angles, see
//! [pose::pose_from_xyzabc].
//!
//! ```
//! use rs_dh_kinematics::chain::Chain;
//! use rs_dh_kinematics::kinematic_traits::Kinematics;
//! use rs_dh_kinematics::solver::{solve, IkMethod};
//!
//! let robot = Chain::ur5();
//! let joints = [0.1, -1.2, 1.3, -0.4, 0.5, 0.6];
//! let pose = robot.forward(&joints).unwrap();
//!
//! let start = [0.15, -1.1, 1.25, -0.45, 0.55, 0.5];
//! let result = solve(&robot, &pose, &start, IkMethod::LevenbergMarquardt, true).unwrap();
//! assert!(result.success);
//! let found = robot.forward(&result.joints.unwrap()).unwrap();
//! assert!((found.translation.vector - pose.translation.vector).norm() < 1e-6);
//! ```

pub mod parameters;
pub mod parameters_robots;
pub mod parameters_from_file;

pub mod utils;
pub mod kinematic_traits;
pub mod expression;
pub mod parameter_error;

pub mod chain;
pub mod pose;
pub mod jacobian;
pub mod solver;

#[cfg(test)]
mod tests;
