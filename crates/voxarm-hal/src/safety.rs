//! [`SafetyRules`] – motion goal validation.
//!
//! Every motion request passes through a rule set before it reaches the
//! driver.  Rules see the goal together with the current robot state so
//! they can enforce workspace limits, speed caps, and similar physical
//! invariants.

use async_trait::async_trait;
use voxarm_types::{ArmError, RobotState};

use crate::driver::MotionGoal;

/// Validates motion goals against the current robot state.
#[async_trait]
pub trait SafetyRules: Send + Sync {
    /// Check whether moving to `goal` from `state` is permitted.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::SafetyRejected`] naming the violated rule.
    async fn check_motion(&self, goal: &MotionGoal, state: &RobotState) -> Result<(), ArmError>;
}
