//! Defines the DH parameter data structures

pub mod dh_kinematics {
    use std::f64::consts::PI;
    use std::fmt;
    use std::str::FromStr;

    /// Robot chains are limited to six joints.
    pub const MAX_JOINTS: usize = 6;

    /// Type of the joint. Disabled joints are only allowed at the end of the chain,
    /// they shorten the chain.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum JointKind {
        /// Rotational joint, theta is the joint variable.
        #[default]
        Revolute,
        /// Linear joint, d is the joint variable.
        Prismatic,
        Disabled,
    }

    impl JointKind {
        pub fn is_active(&self) -> bool {
            *self != JointKind::Disabled
        }

        /// Token used in DH tables ("Rotation" or "Translation").
        pub fn token(&self) -> &'static str {
            match self {
                JointKind::Revolute => "Rotation",
                JointKind::Prismatic => "Translation",
                JointKind::Disabled => "Disabled",
            }
        }

        /// Parses the token from the DH table. Any token other than "Rotation" and "Translation"
        /// is a disabled joint, this never fails.
        pub fn from_token(token: &str) -> Self {
            match token.trim() {
                "Rotation" => JointKind::Revolute,
                "Translation" => JointKind::Prismatic,
                _ => JointKind::Disabled,
            }
        }
    }

    impl fmt::Display for JointKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.token())
        }
    }

    impl FromStr for JointKind {
        type Err = std::convert::Infallible;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(JointKind::from_token(s))
        }
    }

    /// Denavit-Hartenberg parameters of one link together with the limits of its joint variable.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct JointSpec {
        pub kind: JointKind,

        /// Rotation about the previous z axis. Joint variable of the revolute joint,
        /// the value stored here is then only the configured (displayed) position.
        pub theta: f64,

        /// Offset along the previous z axis. Joint variable of the prismatic joint.
        pub d: f64,

        /// Length of the common normal (along the new x axis).
        pub a: f64,

        /// Twist about the new x axis.
        pub alpha: f64,

        /// Lower limit of the joint variable (radians or meters).
        pub limit_min: f64,

        /// Upper limit of the joint variable (radians or meters).
        pub limit_max: f64,
    }

    impl Default for JointSpec {
        fn default() -> Self {
            JointSpec {
                kind: JointKind::Revolute,
                theta: 0.0,
                d: 0.0,
                a: 0.0,
                alpha: 0.0,
                limit_min: -PI,
                limit_max: PI,
            }
        }
    }

    impl JointSpec {
        pub fn revolute(d: f64, a: f64, alpha: f64) -> Self {
            JointSpec { kind: JointKind::Revolute, d, a, alpha, ..Self::default() }
        }

        pub fn prismatic(theta: f64, a: f64, alpha: f64) -> Self {
            JointSpec { kind: JointKind::Prismatic, theta, a, alpha, ..Self::default() }
        }

        pub fn disabled() -> Self {
            JointSpec { kind: JointKind::Disabled, ..Self::default() }
        }

        pub fn with_limits(self, limit_min: f64, limit_max: f64) -> Self {
            JointSpec { limit_min, limit_max, ..self }
        }

        /// Value of the joint variable as configured in the parameters (theta or d).
        pub fn configured_value(&self) -> f64 {
            match self.kind {
                JointKind::Prismatic => self.d,
                _ => self.theta,
            }
        }

        pub fn clamp(&self, q: f64) -> f64 {
            q.clamp(self.limit_min, self.limit_max)
        }

        pub fn within_limits(&self, q: f64) -> bool {
            q >= self.limit_min && q <= self.limit_max
        }
    }

    /// Joint parameters as typed by the user or read from the file, before parsing.
    /// Each field may be a number or a short expression, see
    /// [parse_input](crate::expression::parse_input).
    #[derive(Debug, Clone, PartialEq)]
    pub struct RawJoint {
        pub kind: JointKind,
        pub theta: String,
        pub d: String,
        pub a: String,
        pub alpha: String,
        pub limit_min: String,
        pub limit_max: String,
    }

    impl Default for RawJoint {
        fn default() -> Self {
            RawJoint {
                kind: JointKind::Revolute,
                theta: "0".to_string(),
                d: "0".to_string(),
                a: "0".to_string(),
                alpha: "0".to_string(),
                limit_min: "-pi".to_string(),
                limit_max: "+pi".to_string(),
            }
        }
    }

    impl RawJoint {
        pub fn new(kind: JointKind, fields: [&str; 6]) -> Self {
            let [theta, d, a, alpha, limit_min, limit_max] = fields.map(|f| f.to_string());
            RawJoint { kind, theta, d, a, alpha, limit_min, limit_max }
        }

        pub fn disabled() -> Self {
            RawJoint { kind: JointKind::Disabled, ..Self::default() }
        }

        /// Fields with their names, in the DH table order.
        pub fn fields(&self) -> [(&'static str, &str); 6] {
            [
                ("theta", &self.theta),
                ("d", &self.d),
                ("a", &self.a),
                ("alpha", &self.alpha),
                ("min", &self.limit_min),
                ("max", &self.limit_max),
            ]
        }
    }

    impl From<&JointSpec> for RawJoint {
        fn from(spec: &JointSpec) -> Self {
            RawJoint {
                kind: spec.kind,
                theta: spec.theta.to_string(),
                d: spec.d.to_string(),
                a: spec.a.to_string(),
                alpha: spec.alpha.to_string(),
                limit_min: spec.limit_min.to_string(),
                limit_max: spec.limit_max.to_string(),
            }
        }
    }
}
