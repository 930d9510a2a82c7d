//! Forward kinematics of random joint values, solved back from a nearby start.

#[cfg(test)]
mod tests {
    use crate::chain::Chain;
    use crate::kinematic_traits::Kinematics;
    use crate::parameters_robots::dh_kinematics::Preset;
    use crate::solver::{IkMethod, Solver};
    use crate::tests::test_utils::{assert_reaches, perturb, random_joints, rng};

    // Keeps the arms away from singular configurations
    const RANGES: [(f64, f64); 6] = [
        (-1.0, 1.0),
        (-1.0, -0.3),
        (0.5, 1.2),
        (-1.0, 1.0),
        (0.5, 1.5),
        (-1.0, 1.0),
    ];

    const CASES: usize = 25;

    fn round_trip(chain: &Chain, method: IkMethod, spread: f64, name: &str) {
        let mut rng = rng();
        let solver = Solver::default();
        for case in 0..CASES {
            let expected = random_joints(&mut rng, &RANGES);
            let target = chain.forward(&expected).unwrap();
            let start = perturb(&mut rng, &expected, spread);
            let result = solver.solve(chain, &target, &start, method, false).unwrap();
            assert_reaches(chain, &result, &target, &format!("{} {} case {}", name, method, case));
        }
    }

    #[test]
    fn test_levenberg_marquardt_all_presets() {
        for preset in Preset::ALL {
            round_trip(&preset.chain(), IkMethod::LevenbergMarquardt, 0.1, preset.name());
        }
    }

    #[test]
    fn test_gauss_newton_ur5() {
        round_trip(&Chain::ur5(), IkMethod::GaussNewton, 0.05, "UR5");
    }

    #[test]
    fn test_newton_raphson_ur5() {
        round_trip(&Chain::ur5(), IkMethod::NewtonRaphson, 0.05, "UR5");
    }

    #[test]
    fn test_newton_raphson_puma() {
        round_trip(&Chain::puma560(), IkMethod::NewtonRaphson, 0.05, "Puma560");
    }

    #[test]
    fn test_same_seed_same_results() {
        let chain = Chain::ur3();
        let mut first = rng();
        let mut second = rng();
        let solver = Solver::default();
        for _ in 0..5 {
            let expected = random_joints(&mut first, &RANGES);
            assert_eq!(expected, random_joints(&mut second, &RANGES));
            let target = chain.forward(&expected).unwrap();
            let start = perturb(&mut first, &expected, 0.1);
            perturb(&mut second, &expected, 0.1);
            let a = solver.solve(&chain, &target, &start, IkMethod::LevenbergMarquardt, false).unwrap();
            let b = solver.solve(&chain, &target, &start, IkMethod::LevenbergMarquardt, false).unwrap();
            assert_eq!(a, b);
        }
    }
}
