use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::chain::Chain;
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::solver::SolveResult;

pub(crate) const SEED: u64 = 0x0D1E_5EED;

pub(crate) fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// Both translation and rotation must agree within the tolerance (meters, radians).
pub(crate) fn are_isometries_approx_equal(a: &Pose, b: &Pose, tolerance: f64) -> bool {
    let translation = (a.translation.vector - b.translation.vector).norm();
    let rotation = a.rotation.angle_to(&b.rotation);
    translation < tolerance && rotation < tolerance
}

/// Random joint values, each drawn from its own range.
pub(crate) fn random_joints(rng: &mut StdRng, ranges: &[(f64, f64)]) -> Joints {
    ranges.iter().map(|&(from, to)| rng.gen_range(from..to)).collect()
}

/// Moves each joint by a random amount up to `spread` in either direction.
pub(crate) fn perturb(rng: &mut StdRng, qs: &[f64], spread: f64) -> Joints {
    qs.iter().map(|q| q + rng.gen_range(-spread..spread)).collect()
}

/// Panics unless the result is a solution that reaches the target.
pub(crate) fn assert_reaches(chain: &Chain, result: &SolveResult, target: &Pose, what: &str) {
    assert!(result.success, "{}: no solution, {:?}", what, result);
    let joints = result.joints.as_ref().expect("successful result without joints");
    assert_eq!(joints.len(), chain.effective_length(), "{}", what);
    let reached = chain.forward(joints).expect("forward of the solution");
    assert!(
        are_isometries_approx_equal(&reached, target, 1e-8),
        "{}: solution {:?} reaches {} instead of {}",
        what, joints, reached, target
    );
}
