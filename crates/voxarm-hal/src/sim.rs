//! Simulated hardware backends.
//!
//! Stand-ins for the physical manipulator, solver, rule set, and servo.
//! The sim driver reports six joints at zero; the sim kinematics places
//! the tool center point at (100, 100, 100).  Both record the last
//! command received so tests can assert on the motion path.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use voxarm_types::{ArmError, Joints, MoveHandle, Pose, RobotState};

use crate::driver::{MotionGoal, RobotDriver};
use crate::kinematics::Kinematics;
use crate::safety::SafetyRules;
use crate::servo::{Servo, SERVO_ANGLE_RANGE};

// ─────────────────────────────────────────────────────────────────────────────
// SimDriver
// ─────────────────────────────────────────────────────────────────────────────

/// Simulated manipulator with six joints parked at zero.
#[derive(Default)]
pub struct SimDriver {
    last_goal: Mutex<Option<MotionGoal>>,
}

impl SimDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent motion goal commanded, if any.
    pub fn last_goal(&self) -> Option<MotionGoal> {
        self.last_goal.lock().expect("sim driver lock poisoned").clone()
    }
}

#[async_trait]
impl RobotDriver for SimDriver {
    async fn read_joints(&self) -> Result<Joints, ArmError> {
        debug!("sim driver: reading joints");
        Ok(Joints::new(vec![0.0; 6]))
    }

    async fn command_joint_goal(
        &self,
        joints: Joints,
        _speed: f64,
        _accel: f64,
    ) -> Result<MoveHandle, ArmError> {
        debug!(?joints, "sim driver: joint goal");
        *self.last_goal.lock().expect("sim driver lock poisoned") =
            Some(MotionGoal::Joints(joints));
        Ok(MoveHandle::new(format!("sim-{}", Uuid::new_v4())))
    }

    async fn command_cartesian_goal(
        &self,
        pose: Pose,
        _speed: f64,
        _accel: f64,
        frame: &str,
    ) -> Result<MoveHandle, ArmError> {
        debug!(?pose, frame, "sim driver: cartesian goal");
        *self.last_goal.lock().expect("sim driver lock poisoned") = Some(MotionGoal::Pose(pose));
        Ok(MoveHandle::new(format!("sim-{}", Uuid::new_v4())))
    }

    async fn stop(&self) -> Result<(), ArmError> {
        debug!("sim driver: stop");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SimKinematics
// ─────────────────────────────────────────────────────────────────────────────

/// Simulated solver: every joint set maps to the pose (100, 100, 100) and
/// every pose maps to a single all-0.1 joint solution.
#[derive(Default)]
pub struct SimKinematics;

impl SimKinematics {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Kinematics for SimKinematics {
    async fn fk(&self, joints: &Joints) -> Result<Pose, ArmError> {
        debug!(?joints, "sim kinematics: fk");
        Ok(Pose::new(100.0, 100.0, 100.0, 0.0, 0.0, 0.0))
    }

    async fn ik(&self, pose: &Pose, _seed: Option<&Joints>) -> Result<Vec<Joints>, ArmError> {
        debug!(?pose, "sim kinematics: ik");
        Ok(vec![Joints::new(vec![0.1; 6])])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PermissiveSafety
// ─────────────────────────────────────────────────────────────────────────────

/// Safety rule set that allows every motion.  Bench use only.
#[derive(Default)]
pub struct PermissiveSafety;

impl PermissiveSafety {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SafetyRules for PermissiveSafety {
    async fn check_motion(&self, goal: &MotionGoal, _state: &RobotState) -> Result<(), ArmError> {
        debug!(?goal, "permissive safety: motion allowed");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MockServo
// ─────────────────────────────────────────────────────────────────────────────

/// In-process servo that records the last commanded angle.
#[derive(Default)]
pub struct MockServo {
    last_angle: Mutex<Option<i64>>,
}

impl MockServo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent angle accepted by [`Servo::set_angle`], if any.
    pub fn last_angle(&self) -> Option<i64> {
        *self.last_angle.lock().expect("mock servo lock poisoned")
    }
}

impl Servo for MockServo {
    fn set_angle(&self, angle: i64) -> bool {
        if !SERVO_ANGLE_RANGE.contains(&angle) {
            return false;
        }
        *self.last_angle.lock().expect("mock servo lock poisoned") = Some(angle);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sim_driver_reports_six_zero_joints() {
        let driver = SimDriver::new();
        let joints = driver.read_joints().await.unwrap();
        assert_eq!(joints.values, vec![0.0; 6]);
    }

    #[tokio::test]
    async fn sim_driver_records_joint_goal() {
        let driver = SimDriver::new();
        let goal = Joints::new(vec![0.5; 6]);
        let handle = driver
            .command_joint_goal(goal.clone(), 0.2, 0.1)
            .await
            .unwrap();
        assert!(handle.handle_id.starts_with("sim-"));
        assert_eq!(driver.last_goal(), Some(MotionGoal::Joints(goal)));
    }

    #[tokio::test]
    async fn sim_driver_records_cartesian_goal() {
        let driver = SimDriver::new();
        let pose = Pose::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        driver
            .command_cartesian_goal(pose.clone(), 0.2, 0.1, "base")
            .await
            .unwrap();
        assert_eq!(driver.last_goal(), Some(MotionGoal::Pose(pose)));
    }

    #[tokio::test]
    async fn sim_kinematics_fk_places_tcp_at_100() {
        let kin = SimKinematics::new();
        let pose = kin.fk(&Joints::new(vec![0.0; 6])).await.unwrap();
        assert_eq!(pose.x, 100.0);
        assert_eq!(pose.y, 100.0);
        assert_eq!(pose.z, 100.0);
    }

    #[tokio::test]
    async fn sim_kinematics_ik_returns_one_solution() {
        let kin = SimKinematics::new();
        let pose = Pose::new(100.0, 100.0, 100.0, 0.0, 0.0, 0.0);
        let solutions = kin.ik(&pose, None).await.unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].values, vec![0.1; 6]);
    }

    #[tokio::test]
    async fn permissive_safety_allows_everything() {
        let safety = PermissiveSafety::new();
        let goal = MotionGoal::Joints(Joints::new(vec![99.0; 6]));
        assert!(safety
            .check_motion(&goal, &RobotState::default())
            .await
            .is_ok());
    }

    #[test]
    fn mock_servo_accepts_in_range_angle() {
        let servo = MockServo::new();
        assert!(servo.set_angle(90));
        assert_eq!(servo.last_angle(), Some(90));
    }

    #[test]
    fn mock_servo_rejects_out_of_range_angle() {
        let servo = MockServo::new();
        assert!(!servo.set_angle(181));
        assert!(!servo.set_angle(-1));
        assert_eq!(servo.last_angle(), None);
    }
}
