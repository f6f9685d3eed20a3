//! [`RobotDriver`] – motion and readout interface for the manipulator.
//!
//! A driver talks to the physical controller (or a simulation of one).
//! Motion commands return a [`MoveHandle`] identifying the in-flight move;
//! the driver's own deadlines and feedback loops are its concern, not the
//! agent core's.

use async_trait::async_trait;
use voxarm_types::{ArmError, Joints, MoveHandle, Pose};

/// A point-to-point motion target: either a Cartesian pose or a full set
/// of joint angles.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionGoal {
    Pose(Pose),
    Joints(Joints),
}

/// Low-level manipulator driver.
#[async_trait]
pub trait RobotDriver: Send + Sync {
    /// Read the current angular position of every joint.
    async fn read_joints(&self) -> Result<Joints, ArmError>;

    /// Command a point-to-point move to a joint-space goal.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::DriverFault`] if the controller rejects the
    /// command or is unreachable.
    async fn command_joint_goal(
        &self,
        joints: Joints,
        speed: f64,
        accel: f64,
    ) -> Result<MoveHandle, ArmError>;

    /// Command a point-to-point move to a Cartesian goal in `frame`.
    async fn command_cartesian_goal(
        &self,
        pose: Pose,
        speed: f64,
        accel: f64,
        frame: &str,
    ) -> Result<MoveHandle, ArmError>;

    /// Stop all motion immediately.
    async fn stop(&self) -> Result<(), ArmError>;
}
