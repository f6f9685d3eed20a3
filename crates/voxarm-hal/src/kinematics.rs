//! [`Kinematics`] – forward / inverse kinematics solver interface.

use async_trait::async_trait;
use voxarm_types::{ArmError, Joints, Pose};

/// A kinematics solver for the manipulator.
///
/// `ik` may return several joint solutions for one pose; callers pick the
/// one closest to the optional `seed`.
#[async_trait]
pub trait Kinematics: Send + Sync {
    /// Compute the tool-center-point pose for a set of joint angles.
    async fn fk(&self, joints: &Joints) -> Result<Pose, ArmError>;

    /// Compute joint solutions reaching `pose`, preferring ones near `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Kinematics`] when the pose is unreachable.
    async fn ik(&self, pose: &Pose, seed: Option<&Joints>) -> Result<Vec<Joints>, ArmError>;
}
