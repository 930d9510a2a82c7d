//! Numerical inverse kinematics for DH chains.
//!
//! All solvers iterate on the 6-dimensional pose error between the current end effector pose
//! and the target (3 translation components, 3 components of the angle-axis rotation error),
//! linearized with the geometric [Jacobian]:
//!
//! - **Levenberg-Marquardt** (`IK_LM`, default): `dq = (JᵀJ + λI)⁻¹ Jᵀ e`. λ is divided by 10
//!   after a step that reduces the error and multiplied by 10 (rejecting the step) otherwise.
//! - **Gauss-Newton** (`IK_GN`): `dq = pinv(JᵀJ) Jᵀ e`.
//! - **Newton-Raphson** (`IK_NR`): `dq = J⁻¹ e`, or `pinv(J) e` if J is not square or singular.
//!
//! The solvers are local and deterministic: same input, same iterations, same result. Failure
//! to converge is not an error, it is reported in [SolveResult].
//!
//! ```
//! use rs_dh_kinematics::chain::Chain;
//! use rs_dh_kinematics::parameters::dh_kinematics::JointSpec;
//! use rs_dh_kinematics::pose::pose_from_xyzabc;
//! use rs_dh_kinematics::solver::{solve, IkMethod};
//!
//! let chain = Chain::new(vec![
//!     JointSpec::revolute(0.0, 1.0, 0.0),
//!     JointSpec::revolute(0.0, 1.0, 0.0),
//! ]).unwrap();
//!
//! // Reach (1, 1) with the tool pointing along Y
//! let target = pose_from_xyzabc(1.0, 1.0, 0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2);
//! let result = solve(&chain, &target, &[0.3, 0.3], IkMethod::LevenbergMarquardt, false).unwrap();
//! assert!(result.success);
//!
//! let unreachable = pose_from_xyzabc(5.0, 0.0, 0.0, 0.0, 0.0, 0.0);
//! let result = solve(&chain, &unreachable, &[0.0, 0.0], IkMethod::LevenbergMarquardt, false).unwrap();
//! assert!(!result.success);
//! ```

use std::fmt;
use std::str::FromStr;
use nalgebra::DVector;
use tracing::{debug, info};
use crate::chain::Chain;
use crate::jacobian::Jacobian;
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::parameter_error::ParameterError;

/// Iterative solver to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IkMethod {
    #[default]
    LevenbergMarquardt,
    GaussNewton,
    NewtonRaphson,
}

impl IkMethod {
    pub const ALL: [IkMethod; 3] = [
        IkMethod::LevenbergMarquardt,
        IkMethod::GaussNewton,
        IkMethod::NewtonRaphson,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            IkMethod::LevenbergMarquardt => "IK_LM",
            IkMethod::GaussNewton => "IK_GN",
            IkMethod::NewtonRaphson => "IK_NR",
        }
    }
}

impl fmt::Display for IkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for IkMethod {
    type Err = ParameterError;

    /// Accepts `LM`, `GN`, `NR`, optionally prefixed with `IK_`, in any case.
    /// `IK_QP` (quadratic programming) is not available.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        match token.strip_prefix("IK_").unwrap_or(&token) {
            "LM" => Ok(IkMethod::LevenbergMarquardt),
            "GN" => Ok(IkMethod::GaussNewton),
            "NR" => Ok(IkMethod::NewtonRaphson),
            _ => Err(ParameterError::UnsupportedSolver(s.to_string())),
        }
    }
}

/// Configuration for the solvers.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Maximum solver iterations, rejected Levenberg-Marquardt steps included.
    pub max_iterations: usize,

    /// The solution is found when the norm of the pose error falls below this value
    /// (meters and radians are mixed in the same norm).
    pub tolerance: f64,

    /// Initial damping of Levenberg-Marquardt.
    pub lambda_init: f64,

    /// Damping never gets below this value.
    pub lambda_min: f64,

    /// Levenberg-Marquardt gives up when the damping grows beyond this value.
    pub lambda_max: f64,

    /// Singular values below this are treated as zero by pseudoinverses.
    pub pinv_epsilon: f64,

    /// Joint steps shorter than this (after clamping) mean the solver is stuck.
    pub step_tolerance: f64,

    /// How many consecutive iterations a joint may stay clamped at its limit without
    /// improving the error before the solve is abandoned.
    pub max_pinned_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: 500,
            tolerance: 1e-9,
            lambda_init: 1e-3,
            lambda_min: 1e-12,
            lambda_max: 1e10,
            pinv_epsilon: 1e-12,
            step_tolerance: 1e-14,
            max_pinned_iterations: 20,
        }
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Converged,
    /// Iteration limit reached without convergence.
    IterationLimit,
    /// The linear system of the step could not be solved, or gave a non-finite step.
    Singular,
    /// No step improves the error any more (local minimum, or unreachable target).
    Stalled,
    /// Joints stayed clamped at their limits without progress.
    PinnedAtLimits,
}

/// Result of one solve. Joint values are only present if the solution has been found.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub success: bool,
    pub joints: Option<Joints>,
    pub iterations: usize,
    /// Norm of the pose error at the returned (or last tried) joint values.
    pub final_error: f64,
    pub status: SolveStatus,
}

impl SolveResult {
    fn converged(joints: Joints, iterations: usize, final_error: f64) -> Self {
        SolveResult {
            success: true,
            joints: Some(joints),
            iterations,
            final_error,
            status: SolveStatus::Converged,
        }
    }

    fn failed(status: SolveStatus, iterations: usize, final_error: f64) -> Self {
        SolveResult {
            success: false,
            joints: None,
            iterations,
            final_error,
            status,
        }
    }
}

/// Pose error vector: translation difference followed by the scaled axis of
/// `target.rotation * current.rotation⁻¹`, both in base coordinates.
pub fn pose_error(current: &Pose, target: &Pose) -> DVector<f64> {
    let dp = target.translation.vector - current.translation.vector;
    let dr = (target.rotation * current.rotation.inverse()).scaled_axis();
    DVector::from_column_slice(&[dp.x, dp.y, dp.z, dr.x, dr.y, dr.z])
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    pub config: SolverConfig,
}

impl Solver {
    pub const fn new(config: SolverConfig) -> Self {
        Solver { config }
    }

    /// Searches for joint values that place the end effector of `chain` at `target`, starting
    /// from `initial_guess`. With `respect_limits`, the start and every step are clamped into
    /// the joint limits.
    ///
    /// Fails with [ParameterError::InvalidLength] if `initial_guess` does not match the chain;
    /// every numerical outcome, including non-convergence, is returned as [SolveResult].
    pub fn solve(
        &self,
        chain: &Chain,
        target: &Pose,
        initial_guess: &[f64],
        method: IkMethod,
        respect_limits: bool,
    ) -> Result<SolveResult, ParameterError> {
        let config = &self.config;
        let mut q = DVector::from_column_slice(initial_guess);
        if respect_limits {
            chain.clamp_joints(q.as_mut_slice());
        }

        let mut error_norm = pose_error(&chain.forward(q.as_slice())?, target).norm();
        let mut lambda = config.lambda_init;
        let mut pinned_streak = 0;

        for iteration in 0..config.max_iterations {
            if error_norm < config.tolerance {
                info!("{} converged after {} iterations, error {:e}", method, iteration, error_norm);
                return Ok(SolveResult::converged(q.as_slice().to_vec(), iteration, error_norm));
            }
            if !error_norm.is_finite() || chain.effective_length() == 0 {
                return Ok(self.give_up(method, SolveStatus::Singular, iteration, error_norm));
            }

            let error = pose_error(&chain.forward(q.as_slice())?, target);
            let jacobian = Jacobian::new(chain, q.as_slice(), config.pinv_epsilon)?;
            let step = match method {
                IkMethod::NewtonRaphson => jacobian.velocities_from_vector(&error).ok(),
                IkMethod::GaussNewton => jacobian.least_squares(&error).ok(),
                IkMethod::LevenbergMarquardt => jacobian.damped(&error, lambda),
            };

            let step = match step.filter(|s| s.iter().all(|v| v.is_finite())) {
                Some(step) => step,
                None if method == IkMethod::LevenbergMarquardt && lambda < config.lambda_max => {
                    lambda *= 10.0;
                    continue;
                }
                None => return Ok(self.give_up(method, SolveStatus::Singular, iteration + 1, error_norm)),
            };

            let mut candidate = &q + &step;
            let mut clamped = false;
            if respect_limits {
                chain.clamp_joints(candidate.as_mut_slice());
                clamped = candidate != &q + &step;
            }
            let candidate_norm = pose_error(&chain.forward(candidate.as_slice())?, target).norm();
            let moved = (&candidate - &q).norm();
            let improved = candidate_norm < error_norm;

            debug!(
                "{} iteration {}: error {:e} -> {:e}, step {:e}, lambda {:e}{}",
                method, iteration, error_norm, candidate_norm, moved, lambda,
                if clamped { ", clamped" } else { "" }
            );

            if clamped && !improved {
                pinned_streak += 1;
                if pinned_streak >= config.max_pinned_iterations {
                    return Ok(self.give_up(method, SolveStatus::PinnedAtLimits, iteration + 1, error_norm));
                }
            } else {
                pinned_streak = 0;
            }

            if method == IkMethod::LevenbergMarquardt {
                if improved {
                    q = candidate;
                    error_norm = candidate_norm;
                    lambda = (lambda / 10.0).max(config.lambda_min);
                } else {
                    lambda *= 10.0;
                    if lambda > config.lambda_max {
                        return Ok(self.give_up(method, SolveStatus::Stalled, iteration + 1, error_norm));
                    }
                }
                continue;
            }

            if moved <= config.step_tolerance {
                let status = if clamped { SolveStatus::PinnedAtLimits } else { SolveStatus::Stalled };
                return Ok(self.give_up(method, status, iteration + 1, error_norm));
            }
            q = candidate;
            error_norm = candidate_norm;
        }

        if error_norm < config.tolerance {
            info!("{} converged after {} iterations, error {:e}", method, config.max_iterations, error_norm);
            return Ok(SolveResult::converged(q.as_slice().to_vec(), config.max_iterations, error_norm));
        }
        Ok(self.give_up(method, SolveStatus::IterationLimit, config.max_iterations, error_norm))
    }

    /// Solves several targets for the same chain and start position in parallel.
    #[cfg(feature = "parallel")]
    pub fn solve_batch(
        &self,
        chain: &Chain,
        targets: &[Pose],
        initial_guess: &[f64],
        method: IkMethod,
        respect_limits: bool,
    ) -> Vec<Result<SolveResult, ParameterError>> {
        use rayon::prelude::*;
        targets
            .par_iter()
            .map(|target| self.solve(chain, target, initial_guess, method, respect_limits))
            .collect()
    }

    fn give_up(&self, method: IkMethod, status: SolveStatus, iterations: usize, error_norm: f64) -> SolveResult {
        info!("{} found no solution ({:?}) after {} iterations, error {:e}", method, status, iterations, error_norm);
        SolveResult::failed(status, iterations, error_norm)
    }
}

/// Solves with the default [SolverConfig], see [Solver::solve].
pub fn solve(
    chain: &Chain,
    target: &Pose,
    initial_guess: &[f64],
    method: IkMethod,
    respect_limits: bool,
) -> Result<SolveResult, ParameterError> {
    Solver::default().solve(chain, target, initial_guess, method, respect_limits)
}
