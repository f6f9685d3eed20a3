//! `voxarm-hal` – robot hardware abstraction layer.
//!
//! The rest of the system only ever talks to the traits defined here, so
//! drivers can be swapped without touching the agent or tool logic.
//!
//! # Modules
//!
//! - [`driver`] – [`RobotDriver`][driver::RobotDriver]: joint readout and
//!   motion commands for the manipulator.
//! - [`kinematics`] – [`Kinematics`][kinematics::Kinematics]: forward and
//!   inverse kinematics solvers.
//! - [`safety`] – [`SafetyRules`][safety::SafetyRules]: motion goal
//!   validation against the current robot state.
//! - [`servo`] – [`Servo`][servo::Servo]: a single auxiliary servo motor
//!   (blocking serial hardware in a real deployment).
//! - [`sim`] – simulated implementations of every trait, used for bench
//!   development and tests.

pub mod driver;
pub mod kinematics;
pub mod safety;
pub mod servo;
pub mod sim;

pub use driver::{MotionGoal, RobotDriver};
pub use kinematics::Kinematics;
pub use safety::SafetyRules;
pub use servo::Servo;
pub use sim::{MockServo, PermissiveSafety, SimDriver, SimKinematics};
