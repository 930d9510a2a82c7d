//! Helper functions

use crate::chain::Chain;
use crate::kinematic_traits::Pose;
use crate::parameters::dh_kinematics::JointKind;
use crate::pose::pose_to_xyzabc;
use crate::solver::SolveResult;

const SUBSCRIPTS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

fn subscript(n: usize) -> String {
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| SUBSCRIPTS[d as usize]))
        .collect()
}

/// Joint values labelled by their variable, rounded to 4 decimals:
/// `θ₁ = 0.1234 rad, d₂ = 0.5000 m`. Values beyond the active joints of the chain are ignored.
pub fn format_joints(chain: &Chain, qs: &[f64]) -> String {
    chain
        .active_joints()
        .iter()
        .zip(qs)
        .enumerate()
        .map(|(i, (joint, q))| match joint.kind {
            JointKind::Prismatic => format!("d{} = {:.4} m", subscript(i + 1), q),
            _ => format!("θ{} = {:.4} rad", subscript(i + 1), q),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Position and intrinsic X-Y-Z angles of the pose, 4 decimals.
pub fn format_pose(pose: &Pose) -> String {
    let [x, y, z, a, b, c] = pose_to_xyzabc(pose);
    format!(
        "X = {:.4} m, Y = {:.4} m, Z = {:.4} m, A = {:.4} rad, B = {:.4} rad, C = {:.4} rad",
        x, y, z, a, b, c
    )
}

/// Print the outcome of the solver.
pub fn dump_result(chain: &Chain, result: &SolveResult) {
    match &result.joints {
        Some(joints) => println!(
            "{} after {} iterations (error {:.3e})",
            format_joints(chain, joints),
            result.iterations,
            result.final_error
        ),
        None => println!(
            "No solution: {:?} after {} iterations (error {:.3e})",
            result.status, result.iterations, result.final_error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::dh_kinematics::JointSpec;
    use crate::pose::pose_from_xyzabc;

    #[test]
    fn test_format_joints_mixed() {
        let chain = Chain::new(vec![
            JointSpec::revolute(0.0, 1.0, 0.0),
            JointSpec::prismatic(0.0, 0.0, 0.0),
        ]).unwrap();
        assert_eq!(format_joints(&chain, &[0.12345, 0.5]), "θ₁ = 0.1235 rad, d₂ = 0.5000 m");
    }

    #[test]
    fn test_format_joints_ignores_extra_values() {
        let chain = Chain::new(vec![JointSpec::revolute(0.0, 1.0, 0.0)]).unwrap();
        assert_eq!(format_joints(&chain, &[-1.0, 7.0]), "θ₁ = -1.0000 rad");
    }

    #[test]
    fn test_subscript_multi_digit() {
        assert_eq!(subscript(12), "₁₂");
    }

    #[test]
    fn test_format_pose() {
        let pose = pose_from_xyzabc(0.1, -0.2, 0.3, 0.25, 0.5, -0.75);
        assert_eq!(
            format_pose(&pose),
            "X = 0.1000 m, Y = -0.2000 m, Z = 0.3000 m, A = 0.2500 rad, B = 0.5000 rad, C = -0.7500 rad"
        );
    }

}
