//! Hardcoded DH parameters for a few robots

pub mod dh_kinematics {
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::fmt;
    use std::str::FromStr;
    use crate::chain::Chain;
    use crate::parameter_error::ParameterError;
    use crate::parameters::dh_kinematics::JointSpec;

    fn deg(limits: [f64; 2]) -> (f64, f64) {
        (limits[0].to_radians(), limits[1].to_radians())
    }

    impl Chain {
        /// Unimation Puma 560, standard DH convention (Craig / Corke).
        pub fn puma560() -> Self {
            let limits = [
                [-160.0, 160.0],
                [-110.0, 110.0],
                [-135.0, 135.0],
                [-266.0, 266.0],
                [-100.0, 100.0],
                [-266.0, 266.0],
            ];
            let links = [
                // d, a, alpha
                (0.0, 0.0, FRAC_PI_2),
                (0.0, 0.4318, 0.0),
                (0.15005, 0.0203, -FRAC_PI_2),
                (0.4318, 0.0, FRAC_PI_2),
                (0.0, 0.0, -FRAC_PI_2),
                (0.0, 0.0, 0.0),
            ];
            Self::from_links(&links, Some(&limits))
        }

        /// Universal Robots UR3.
        pub fn ur3() -> Self {
            Self::universal_robot([0.1519, 0.0, 0.0, 0.11235, 0.08535, 0.0819], -0.24365, -0.21325)
        }

        /// Universal Robots UR5.
        pub fn ur5() -> Self {
            Self::universal_robot([0.089459, 0.0, 0.0, 0.10915, 0.09465, 0.0823], -0.425, -0.39225)
        }

        /// Universal Robots UR10.
        pub fn ur10() -> Self {
            Self::universal_robot([0.1273, 0.0, 0.0, 0.163941, 0.1157, 0.0922], -0.612, -0.5723)
        }

        // All UR arms share the same structure, only the link lengths differ. Limits are ±π.
        fn universal_robot(d: [f64; 6], a2: f64, a3: f64) -> Self {
            let a = [0.0, a2, a3, 0.0, 0.0, 0.0];
            let alpha = [FRAC_PI_2, 0.0, 0.0, FRAC_PI_2, -FRAC_PI_2, 0.0];
            let links: Vec<(f64, f64, f64)> = (0..6).map(|i| (d[i], a[i], alpha[i])).collect();
            Self::from_links(&links, None)
        }

        fn from_links(links: &[(f64, f64, f64)], limits_deg: Option<&[[f64; 2]; 6]>) -> Self {
            let joints = links
                .iter()
                .enumerate()
                .map(|(i, &(d, a, alpha))| {
                    let joint = JointSpec::revolute(d, a, alpha);
                    match limits_deg {
                        Some(limits) => {
                            let (min, max) = deg(limits[i]);
                            joint.with_limits(min, max)
                        }
                        None => joint.with_limits(-PI, PI),
                    }
                })
                .collect();
            Chain::new_unchecked(joints)
        }
    }

    /// Robots with built-in parameters, selectable by name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Preset {
        Puma560,
        Ur3,
        Ur5,
        Ur10,
    }

    impl Preset {
        pub const ALL: [Preset; 4] = [Preset::Puma560, Preset::Ur3, Preset::Ur5, Preset::Ur10];

        pub fn name(&self) -> &'static str {
            match self {
                Preset::Puma560 => "Puma560",
                Preset::Ur3 => "UR3",
                Preset::Ur5 => "UR5",
                Preset::Ur10 => "UR10",
            }
        }

        pub fn chain(&self) -> Chain {
            match self {
                Preset::Puma560 => Chain::puma560(),
                Preset::Ur3 => Chain::ur3(),
                Preset::Ur5 => Chain::ur5(),
                Preset::Ur10 => Chain::ur10(),
            }
        }
    }

    impl fmt::Display for Preset {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for Preset {
        type Err = ParameterError;

        /// Case-insensitive robot name, "Puma560", "UR3", "UR5" or "UR10".
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let wanted = s.trim();
            Preset::ALL
                .into_iter()
                .find(|p| p.name().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| ParameterError::parse(s, "unknown robot, use Puma560, UR3, UR5 or UR10"))
        }
    }
}
