//! Implementations for the two joint arm

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::{
    clamp_to_reachable_space, reachable_radii, solve_inverse_kinematics, ArmConfig,
    ArmCtrlError, JointTargets, Params,
};
use crate::{joint::Joint, point::Point};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A two joint planar arm.
///
/// The elbow's pivot is always kept on the tip of the shoulder link, it is
/// re-derived from the shoulder every time the shoulder moves.
#[derive(Debug, Clone)]
pub struct TwoJointArm {
    pub(crate) shoulder: Joint,
    pub(crate) elbow: Joint,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TwoJointArm {
    /// Build the arm from its parameters.
    pub fn new(params: &Params, cycle_period_s: f64) -> Result<Self, ArmCtrlError> {
        let shoulder = Joint::new(&params.shoulder, cycle_period_s)
            .map_err(|e| ArmCtrlError::JointError("shoulder", e))?;
        let elbow = Joint::new(&params.elbow, cycle_period_s)
            .map_err(|e| ArmCtrlError::JointError("elbow", e))?;

        Ok(Self::from_joints(shoulder, elbow))
    }

    /// Assemble the arm from two already built joints.
    pub fn from_joints(shoulder: Joint, elbow: Joint) -> Self {
        let mut arm = Self { shoulder, elbow };
        arm.update_geometry();
        arm
    }

    /// Move the elbow's pivot onto the tip of the shoulder link.
    pub fn update_geometry(&mut self) {
        self.shoulder.set_start(Point::ORIGIN);
        self.shoulder.set_parent_angle(0.0);

        self.elbow.set_start(self.shoulder.endpoint());
        self.elbow.set_parent_angle(self.shoulder.angle_rad());
    }

    /// Drive both joints one feedback plus feedforward step towards the
    /// targets.
    ///
    /// The shoulder is driven first, the elbow's pivot is then moved to the
    /// shoulder's new tip before the elbow is driven.
    pub fn drive_to(&mut self, targets: JointTargets, tolerance_rad: f64) {
        self.update_geometry();

        let shoulder_angle_rad = self.shoulder.angle_rad();
        self.shoulder
            .drive_pid_feedforward(targets.shoulder_rad, shoulder_angle_rad, tolerance_rad);

        self.update_geometry();

        let elbow_angle_rad = self.elbow.angle_rad();
        self.elbow
            .drive_pid_feedforward(targets.elbow_rad, elbow_angle_rad, tolerance_rad);

        trace!(
            "Arm drive: shoulder {:.4}/{:.4} rad, elbow {:.4}/{:.4} rad",
            self.shoulder.angle_rad(),
            targets.shoulder_rad,
            self.elbow.angle_rad(),
            targets.elbow_rad
        );
    }

    /// Let both joints move under gravity with no voltage applied.
    pub fn rest(&mut self) {
        self.update_geometry();
        self.shoulder.drive_open_loop(0.0);
        self.update_geometry();
        self.elbow.drive_open_loop(0.0);
    }

    /// Solve the joint angles to reach `goal` from the current angles.
    pub fn solve(&self, goal: Point) -> Result<JointTargets, ArmCtrlError> {
        solve_inverse_kinematics(
            goal,
            self.shoulder.angle_rad(),
            self.elbow.angle_rad(),
            self.shoulder.length_m(),
            self.elbow.length_m(),
        )
    }

    /// Clamp a point into this arm's reachable space.
    pub fn clamp_goal(&self, goal: Point) -> Point {
        clamp_to_reachable_space(goal, self.shoulder.length_m(), self.elbow.length_m())
    }

    /// Inner and outer radius of the space the arm can reach.
    pub fn reachable_radii(&self) -> (f64, f64) {
        reachable_radii(self.shoulder.length_m(), self.elbow.length_m())
    }

    /// Allow both joints to be driven again after stopping.
    pub fn resume(&mut self) {
        self.shoulder.resume();
        self.elbow.resume();
    }

    pub fn reset_controllers(&mut self) {
        self.shoulder.reset_controller();
        self.elbow.reset_controller();
    }

    /// True only when both joints have stopped.
    pub fn is_stopped(&self) -> bool {
        self.shoulder.is_stopped() && self.elbow.is_stopped()
    }

    /// Position of the elbow pivot.
    pub fn elbow_point(&self) -> Point {
        self.shoulder.endpoint()
    }

    /// Position of the tip of the arm.
    pub fn endpoint(&self) -> Point {
        self.elbow
            .endpoint_given_parent_angle(self.shoulder.angle_rad())
    }

    pub fn config(&self) -> ArmConfig {
        ArmConfig {
            rot_axes: [self.shoulder.telemetry(), self.elbow.telemetry()],
        }
    }

    pub fn shoulder(&self) -> &Joint {
        &self.shoulder
    }

    pub fn elbow(&self) -> &Joint {
        &self.elbow
    }

    pub fn shoulder_mut(&mut self) -> &mut Joint {
        &mut self.shoulder
    }

    pub fn elbow_mut(&mut self) -> &mut Joint {
        &mut self.elbow
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 50.0;

    fn arm_params() -> Params {
        Params::reference()
    }

    fn assert_elbow_on_shoulder_tip(arm: &TwoJointArm) {
        let tip = arm.shoulder().endpoint();
        assert_relative_eq!(arm.elbow().start().x, tip.x, epsilon = 1e-12);
        assert_relative_eq!(arm.elbow().start().y, tip.y, epsilon = 1e-12);
    }

    #[test]
    fn test_new_arm_geometry() {
        let arm = TwoJointArm::new(&arm_params(), DT).unwrap();

        assert_elbow_on_shoulder_tip(&arm);
        assert_relative_eq!(arm.endpoint().x, 1.8, epsilon = 1e-12);
        assert_relative_eq!(arm.endpoint().y, 0.0, epsilon = 1e-12);
        assert_eq!(arm.reachable_radii(), (1.0f64 - 0.8, 1.8));
        assert!(!arm.is_stopped());
    }

    #[test]
    fn test_bad_joint_is_named() {
        let mut params = arm_params();
        params.elbow.motor = String::from("mystery");

        assert!(matches!(
            TwoJointArm::new(&params, DT),
            Err(ArmCtrlError::JointError("elbow", _))
        ));
    }

    #[test]
    fn test_drive_to_goal() {
        let mut arm = TwoJointArm::new(&arm_params(), DT).unwrap();
        let goal = arm.clamp_goal(Point::new(0.375, 1.0));
        let targets = arm.solve(goal).unwrap();

        let tolerance = 1f64.to_radians();
        for _ in 0..(50 * 20) {
            arm.drive_to(targets, tolerance);
            assert_elbow_on_shoulder_tip(&arm);
            if arm.is_stopped() {
                break;
            }
        }

        assert!(arm.is_stopped());
        assert!(arm.endpoint().distance(&goal) < 0.1);
    }

    #[test]
    fn test_stopped_needs_both_joints() {
        let mut arm = TwoJointArm::new(&arm_params(), DT).unwrap();

        arm.shoulder_mut().stopped = true;
        assert!(!arm.is_stopped());

        arm.elbow_mut().stopped = true;
        assert!(arm.is_stopped());

        arm.resume();
        assert!(!arm.shoulder().is_stopped());
        assert!(!arm.elbow().is_stopped());
    }

    #[test]
    fn test_rest_falls() {
        let mut arm = TwoJointArm::new(&arm_params(), DT).unwrap();

        arm.rest();

        assert!(arm.shoulder().angle_rad() < 0.0);
        assert_eq!(arm.shoulder().voltage_v(), 0.0);
        assert_eq!(arm.config().elbow().voltage_v, 0.0);
    }
}
