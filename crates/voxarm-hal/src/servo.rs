//! [`Servo`] – a single auxiliary servo motor.
//!
//! Real deployments drive the servo over a blocking serial link to a
//! microcontroller, so the trait is synchronous; async callers wrap it in
//! `tokio::task::spawn_blocking`.

/// Angle range accepted by the servo, inclusive.
pub const SERVO_ANGLE_RANGE: std::ops::RangeInclusive<i64> = 0..=180;

/// A position-commanded hobby servo.
pub trait Servo: Send + Sync {
    /// Command the servo to `angle` degrees (0–180).
    ///
    /// Returns `false` when the hardware refuses the command (out of
    /// range, link down).  Range validation also happens at the tool
    /// layer so the model receives a structured error.
    fn set_angle(&self, angle: i64) -> bool;
}
