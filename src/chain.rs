//! Kinematic chain built from Denavit-Hartenberg parameters.
//!
//! A [Chain] is an ordered list of up to six joints from the robot base to the end effector.
//! Each joint contributes the standard DH transform
//! `T = RotZ(theta) · TransZ(d) · TransX(a) · RotX(alpha)` where `theta` (revolute) or `d`
//! (prismatic) is replaced by the joint variable. Disabled joints may only follow the active
//! ones; they are kept in the chain (so the table can be restored) but do not contribute.
//!
//! ```
//! use rs_dh_kinematics::chain::Chain;
//! use rs_dh_kinematics::kinematic_traits::Kinematics;
//! use rs_dh_kinematics::parameters::dh_kinematics::JointSpec;
//!
//! // Planar arm with two links of 1 m
//! let chain = Chain::new(vec![
//!     JointSpec::revolute(0.0, 1.0, 0.0),
//!     JointSpec::revolute(0.0, 1.0, 0.0),
//! ]).unwrap();
//! let pose = chain.forward(&[0.0, std::f64::consts::FRAC_PI_2]).unwrap();
//! assert!((pose.translation.x - 1.0).abs() < 1E-12);
//! assert!((pose.translation.y - 1.0).abs() < 1E-12);
//! ```

use nalgebra::{Matrix4, Translation3, UnitQuaternion, Vector3};
use tracing::debug;
use crate::expression::parse_input;
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{JointKind, JointSpec, RawJoint, MAX_JOINTS};

/// Standard DH transform between consecutive joint frames.
pub fn dh_transform(theta: f64, d: f64, a: f64, alpha: f64) -> Pose {
    let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), theta)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), alpha);
    let translation = Translation3::new(a * theta.cos(), a * theta.sin(), d);
    Pose::from_parts(translation, rotation)
}

/// The same DH transform as the homogeneous 4x4 matrix, written out explicitly.
pub fn dh_matrix(theta: f64, d: f64, a: f64, alpha: f64) -> Matrix4<f64> {
    let (st, ct) = theta.sin_cos();
    let (sa, ca) = alpha.sin_cos();
    Matrix4::new(
        ct, -st * ca, st * sa, a * ct,
        st, ct * ca, -ct * sa, a * st,
        0.0, sa, ca, d,
        0.0, 0.0, 0.0, 1.0,
    )
}

impl JointSpec {
    /// Transform from the previous joint frame to this one with the joint variable set to `q`.
    /// Disabled joint is identity.
    pub fn transform(&self, q: f64) -> Pose {
        match self.kind {
            JointKind::Revolute => dh_transform(q, self.d, self.a, self.alpha),
            JointKind::Prismatic => dh_transform(self.theta, q, self.a, self.alpha),
            JointKind::Disabled => Pose::identity(),
        }
    }
}

/// Ordered chain of at most six joints. Active joints come first, followed
/// by any number of disabled ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    joints: Vec<JointSpec>,
}

impl Chain {
    /// Creates the chain from already numeric joint specifications, checking the number of
    /// joints, that disabled joints are only at the end and that the limits are sane.
    pub fn new(joints: Vec<JointSpec>) -> Result<Self, ParameterError> {
        validate(&joints)?;
        Ok(Chain { joints })
    }

    /// For hardcoded chains that are known to be valid.
    pub(crate) fn new_unchecked(joints: Vec<JointSpec>) -> Self {
        debug_assert!(validate(&joints).is_ok());
        Chain { joints }
    }

    /// All joints, including disabled ones.
    pub fn joints(&self) -> &[JointSpec] {
        &self.joints
    }

    /// Joints that contribute to kinematics.
    pub fn active_joints(&self) -> &[JointSpec] {
        &self.joints[..self.effective_length()]
    }

    /// Number of leading active joints, this is the length of the joint vector.
    pub fn effective_length(&self) -> usize {
        self.joints.iter().take_while(|j| j.kind.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Changes the type of the joint. Disabling a joint also disables all following joints.
    /// The joint can only be activated if the previous joint is active; activating the joint
    /// just after the end of the chain appends a new joint with default parameters.
    pub fn set_joint_kind(&mut self, index: usize, kind: JointKind) -> Result<(), ParameterError> {
        if index >= MAX_JOINTS {
            return Err(ParameterError::InvalidChain(format!(
                "joint {} does not exist, at most {} joints are supported", index + 1, MAX_JOINTS
            )));
        }

        if !kind.is_active() {
            for joint in self.joints.iter_mut().skip(index) {
                joint.kind = JointKind::Disabled;
            }
            debug!("Joints from {} disabled, effective length {}", index + 1, self.effective_length());
            return Ok(());
        }

        if index > self.effective_length() {
            return Err(ParameterError::InvalidChain(format!(
                "joint {} cannot be enabled while joint {} is disabled", index + 1, index
            )));
        }
        if index == self.joints.len() {
            self.joints.push(JointSpec { kind, ..JointSpec::default() });
        } else {
            self.joints[index].kind = kind;
        }
        debug!("Joint {} set to {}", index + 1, kind);
        Ok(())
    }

    /// Replaces (or appends, if `index` is just past the end) the joint. The resulting chain
    /// must still be valid, otherwise it is left unchanged.
    pub fn set_joint(&mut self, index: usize, spec: JointSpec) -> Result<(), ParameterError> {
        let mut joints = self.joints.clone();
        if index < joints.len() {
            joints[index] = spec;
        } else if index == joints.len() {
            joints.push(spec);
        } else {
            return Err(ParameterError::InvalidChain(format!(
                "joint {} cannot be set, the chain has only {} joints", index + 1, joints.len()
            )));
        }
        validate(&joints)?;
        self.joints = joints;
        Ok(())
    }

    /// Joint values as given by the DH table itself (theta of revolute and d of prismatic
    /// joints). This is what is shown before anything is solved.
    pub fn configured_joints(&self) -> Joints {
        self.active_joints().iter().map(|j| j.configured_value()).collect()
    }

    /// Clamps each joint value into the limits of its joint.
    pub fn clamp_joints(&self, qs: &mut [f64]) {
        for (q, joint) in qs.iter_mut().zip(self.active_joints()) {
            *q = joint.clamp(*q);
        }
    }

    pub fn within_limits(&self, qs: &[f64]) -> bool {
        qs.len() == self.effective_length()
            && qs.iter().zip(self.active_joints()).all(|(q, j)| j.within_limits(*q))
    }

    /// Joint specifications back in the raw (text) form, for editing or saving.
    pub fn to_raw(&self) -> Vec<RawJoint> {
        self.joints.iter().map(RawJoint::from).collect()
    }

    fn check_length(&self, qs: &[f64]) -> Result<(), ParameterError> {
        let expected = self.effective_length();
        if qs.len() != expected {
            return Err(ParameterError::InvalidLength { expected, found: qs.len() });
        }
        Ok(())
    }
}

impl Kinematics for Chain {
    fn dof(&self) -> usize {
        self.effective_length()
    }

    fn forward(&self, qs: &[f64]) -> Result<Pose, ParameterError> {
        self.check_length(qs)?;
        Ok(self
            .active_joints()
            .iter()
            .zip(qs)
            .fold(Pose::identity(), |pose, (joint, q)| pose * joint.transform(*q)))
    }

    fn forward_with_joint_poses(&self, qs: &[f64]) -> Result<Vec<Pose>, ParameterError> {
        self.check_length(qs)?;
        let mut pose = Pose::identity();
        Ok(self
            .active_joints()
            .iter()
            .zip(qs)
            .map(|(joint, q)| {
                pose = pose * joint.transform(*q);
                pose
            })
            .collect())
    }
}

/// Builds the chain from the raw DH table. Fields of active joints are parsed with
/// [parse_input]; disabled joints are not parsed. Fails with [ParameterError::InvalidChain]
/// naming the joint and field that is wrong.
pub fn build_chain(specs: &[RawJoint]) -> Result<Chain, ParameterError> {
    check_sequence(specs.iter().map(|s| s.kind))?;

    let mut joints = Vec::with_capacity(specs.len());
    for (i, raw) in specs.iter().enumerate() {
        if !raw.kind.is_active() {
            joints.push(JointSpec::disabled());
            continue;
        }
        let mut values = [0.0; 6];
        for (value, (name, text)) in values.iter_mut().zip(raw.fields()) {
            *value = parse_input(text).map_err(|e| {
                ParameterError::InvalidChain(format!("joint {}, field {}: {}", i + 1, name, e))
            })?;
        }
        let [theta, d, a, alpha, limit_min, limit_max] = values;
        joints.push(JointSpec { kind: raw.kind, theta, d, a, alpha, limit_min, limit_max });
    }

    let chain = Chain::new(joints)?;
    debug!("Chain built with {} active joints of {}", chain.effective_length(), chain.len());
    Ok(chain)
}

fn check_sequence(kinds: impl Iterator<Item = JointKind>) -> Result<(), ParameterError> {
    let mut disabled_at: Option<usize> = None;
    for (i, kind) in kinds.enumerate() {
        if i >= MAX_JOINTS {
            return Err(ParameterError::InvalidChain(format!(
                "more than {} joints", MAX_JOINTS
            )));
        }
        match (kind.is_active(), disabled_at) {
            (false, None) => disabled_at = Some(i),
            (true, Some(d)) => {
                return Err(ParameterError::InvalidChain(format!(
                    "joint {} is active but joint {} before it is disabled", i + 1, d + 1
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate(joints: &[JointSpec]) -> Result<(), ParameterError> {
    check_sequence(joints.iter().map(|j| j.kind))?;
    for (i, joint) in joints.iter().enumerate().filter(|(_, j)| j.kind.is_active()) {
        let values = [joint.theta, joint.d, joint.a, joint.alpha, joint.limit_min, joint.limit_max];
        if !values.iter().all(|v| v.is_finite()) {
            return Err(ParameterError::InvalidChain(format!(
                "joint {} has non-finite parameters", i + 1
            )));
        }
        if joint.limit_min > joint.limit_max {
            return Err(ParameterError::InvalidChain(format!(
                "joint {}: lower limit {} is above upper limit {}",
                i + 1, joint.limit_min, joint.limit_max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const SMALL: f64 = 1e-12;

    fn planar_two_link() -> Chain {
        Chain::new(vec![
            JointSpec::revolute(0.0, 1.0, 0.0),
            JointSpec::revolute(0.0, 1.0, 0.0),
        ]).unwrap()
    }

    #[test]
    fn test_transform_matches_matrix() {
        let params = [(0.3, 0.1, 0.4318, FRAC_PI_2), (-1.2, 0.0, 0.0, -FRAC_PI_2), (2.0, 0.5, -0.2, 0.7)];
        for (theta, d, a, alpha) in params {
            let iso = dh_transform(theta, d, a, alpha).to_homogeneous();
            let mat = dh_matrix(theta, d, a, alpha);
            assert!((iso - mat).abs().max() < SMALL, "{} vs {}", iso, mat);
        }
    }

    #[test]
    fn test_revolute_ignores_theta() {
        let joint = JointSpec { theta: 1.0, ..JointSpec::revolute(0.2, 0.5, 0.0) };
        let pose = joint.transform(0.0);
        assert!((pose.translation.vector - Vector3::new(0.5, 0.0, 0.2)).norm() < SMALL);
    }

    #[test]
    fn test_prismatic_uses_q_as_d() {
        let joint = JointSpec::prismatic(FRAC_PI_2, 0.5, 0.0);
        let pose = joint.transform(0.3);
        assert!((pose.translation.vector - Vector3::new(0.0, 0.5, 0.3)).norm() < SMALL);
    }

    #[test]
    fn test_forward_planar() {
        let chain = planar_two_link();
        let pose = chain.forward(&[0.0, 0.0]).unwrap();
        assert!((pose.translation.vector - Vector3::new(2.0, 0.0, 0.0)).norm() < SMALL);
        assert!(pose.rotation.angle() < SMALL);

        let pose = chain.forward(&[FRAC_PI_2, -FRAC_PI_2]).unwrap();
        assert!((pose.translation.vector - Vector3::new(1.0, 1.0, 0.0)).norm() < SMALL);
        assert!(pose.rotation.angle() < SMALL);
    }

    #[test]
    fn test_joint_poses_end_with_forward() {
        let chain = planar_two_link();
        let qs = [0.3, 0.4];
        let poses = chain.forward_with_joint_poses(&qs).unwrap();
        assert_eq!(poses.len(), 2);
        assert!((poses[0].translation.vector - Vector3::new(0.3_f64.cos(), 0.3_f64.sin(), 0.0)).norm() < SMALL);
        let tcp = chain.forward(&qs).unwrap();
        assert!((poses[1].translation.vector - tcp.translation.vector).norm() < SMALL);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = Chain::default();
        assert_eq!(chain.effective_length(), 0);
        assert_eq!(chain.forward(&[]).unwrap(), Pose::identity());
    }

    #[test]
    fn test_dimension_check_all_lengths() {
        for n in 0..=MAX_JOINTS {
            let chain = Chain::new(vec![JointSpec::revolute(0.1, 0.2, 0.3); n]).unwrap();
            assert!(chain.forward(&vec![0.0; n]).is_ok());
            let mut wrong_lengths = vec![n + 1];
            if n > 0 {
                wrong_lengths.push(n - 1);
            }
            for wrong in wrong_lengths {
                match chain.forward(&vec![0.0; wrong]) {
                    Err(ParameterError::InvalidLength { expected, found }) => {
                        assert_eq!(expected, n);
                        assert_eq!(found, wrong);
                    }
                    other => panic!("Expected length error for {} of {}, got {:?}", wrong, n, other),
                }
            }
        }
    }

    #[test]
    fn test_disabled_suffix_shortens_chain() {
        let chain = Chain::new(vec![
            JointSpec::revolute(0.0, 1.0, 0.0),
            JointSpec::disabled(),
            JointSpec::disabled(),
        ]).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.effective_length(), 1);
        assert!(chain.forward(&[0.0, 0.0]).is_err());
        assert!(chain.forward(&[0.0]).is_ok());
    }

    #[test]
    fn test_rejects_gap() {
        let result = Chain::new(vec![
            JointSpec::revolute(0.0, 1.0, 0.0),
            JointSpec::disabled(),
            JointSpec::revolute(0.0, 1.0, 0.0),
        ]);
        assert!(matches!(result, Err(ParameterError::InvalidChain(_))));
    }

    #[test]
    fn test_rejects_too_long() {
        let result = Chain::new(vec![JointSpec::default(); MAX_JOINTS + 1]);
        assert!(matches!(result, Err(ParameterError::InvalidChain(_))));
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let result = Chain::new(vec![JointSpec::default().with_limits(1.0, -1.0)]);
        assert!(matches!(result, Err(ParameterError::InvalidChain(_))));
    }

    #[test]
    fn test_build_chain_parses_expressions() {
        let chain = build_chain(&[
            RawJoint::new(JointKind::Revolute, ["", "0", "0", "pi/2", "-160*pi/180", "160*pi/180"]),
            RawJoint::new(JointKind::Prismatic, ["-pi/2", "0,5", "0.1", "0", "0", "1"]),
            RawJoint::disabled(),
        ]).unwrap();
        assert_eq!(chain.effective_length(), 2);
        let first = chain.joints()[0];
        assert!((first.alpha - FRAC_PI_2).abs() < SMALL);
        assert!((first.limit_max - 160.0_f64.to_radians()).abs() < SMALL);
        let second = chain.joints()[1];
        assert_eq!(second.kind, JointKind::Prismatic);
        assert!((second.theta + FRAC_PI_2).abs() < SMALL);
        assert_eq!(second.d, 0.5);
        assert_eq!(chain.configured_joints(), vec![0.0, 0.5]);
    }

    #[test]
    fn test_build_chain_does_not_parse_disabled() {
        let chain = build_chain(&[
            RawJoint::default(),
            RawJoint::new(JointKind::Disabled, ["garbage", "", "", "", "", ""]),
        ]).unwrap();
        assert_eq!(chain.effective_length(), 1);
    }

    #[test]
    fn test_build_chain_reports_field() {
        let result = build_chain(&[
            RawJoint::default(),
            RawJoint::new(JointKind::Revolute, ["0", "0", "1+", "0", "-pi", "pi"]),
        ]);
        match result {
            Err(ParameterError::InvalidChain(msg)) => {
                assert!(msg.contains("joint 2"), "{}", msg);
                assert!(msg.contains("field a"), "{}", msg);
            }
            other => panic!("Expected invalid chain, got {:?}", other),
        }
    }

    #[test]
    fn test_build_chain_rejects_gap() {
        let result = build_chain(&[RawJoint::disabled(), RawJoint::default()]);
        assert!(matches!(result, Err(ParameterError::InvalidChain(_))));
    }

    #[test]
    fn test_set_joint_kind_disables_suffix() {
        let mut chain = Chain::new(vec![JointSpec::revolute(0.0, 1.0, 0.0); 4]).unwrap();
        chain.set_joint_kind(1, JointKind::Disabled).unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.effective_length(), 1);
        assert!(chain.joints()[1..].iter().all(|j| j.kind == JointKind::Disabled));

        // Parameters survive and come back when re-enabled
        chain.set_joint_kind(1, JointKind::Prismatic).unwrap();
        assert_eq!(chain.effective_length(), 2);
        assert_eq!(chain.joints()[1].a, 1.0);
    }

    #[test]
    fn test_set_joint_kind_refuses_gap() {
        let mut chain = Chain::new(vec![JointSpec::default(), JointSpec::disabled()]).unwrap();
        assert!(chain.set_joint_kind(2, JointKind::Revolute).is_err());
        assert!(chain.set_joint_kind(MAX_JOINTS, JointKind::Revolute).is_err());
        chain.set_joint_kind(1, JointKind::Revolute).unwrap();
        chain.set_joint_kind(2, JointKind::Revolute).unwrap();
        assert_eq!(chain.effective_length(), 3);
    }

    #[test]
    fn test_set_joint_validates() {
        let mut chain = Chain::new(vec![JointSpec::default(), JointSpec::disabled()]).unwrap();
        assert!(chain.set_joint(1, JointSpec::default().with_limits(PI, -PI)).is_err());
        assert_eq!(chain.effective_length(), 1);
        assert!(chain.set_joint(0, JointSpec::disabled()).is_ok());
        assert_eq!(chain.effective_length(), 0);
        assert!(chain.set_joint(5, JointSpec::default()).is_err());
    }

    #[test]
    fn test_clamp_and_limits() {
        let chain = Chain::new(vec![
            JointSpec::revolute(0.0, 1.0, 0.0).with_limits(-0.5, 0.5),
            JointSpec::prismatic(0.0, 0.0, 0.0).with_limits(0.0, 0.2),
        ]).unwrap();
        let mut qs = [1.0, -0.1];
        assert!(!chain.within_limits(&qs));
        chain.clamp_joints(&mut qs);
        assert_eq!(qs, [0.5, 0.0]);
        assert!(chain.within_limits(&qs));
    }

    #[test]
    fn test_raw_round_trip() {
        let chain = Chain::new(vec![
            JointSpec::revolute(0.15005, 0.0203, -FRAC_PI_2).with_limits(-2.35, 0.78),
            JointSpec::prismatic(0.1, 0.0, 0.0),
        ]).unwrap();
        assert_eq!(build_chain(&chain.to_raw()).unwrap(), chain);
    }
}
