// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Contract between the motion planner and whatever actually produces step pulses.

use fugit::{TimerDurationU32, TimerInstantU32};

/// Microsecond timestamp. Wraps every ~71 minutes; only differences are meaningful.
pub type Micros = TimerInstantU32<1_000_000>;
/// Microsecond duration.
pub type MicrosDuration = TimerDurationU32<1_000_000>;

/// Monotonic microsecond time source.
pub trait Clock {
    fn now(&self) -> Micros;
}

impl<F> Clock for F
where
    F: Fn() -> Micros,
{
    fn now(&self) -> Micros {
        self()
    }
}

/// Non-blocking single-axis stepper.
///
/// Positions are absolute step counts and are not wrapped to one revolution; callers that care
/// about the clock face take them modulo steps-per-revolution. Positive steps are clockwise.
pub trait MotionPrimitive {
    /// Step count emitted so far.
    fn current_position(&self) -> i32;

    /// Position the axis is moving toward.
    fn target_position(&self) -> i32;

    /// Set a new absolute target.
    fn move_to(&mut self, target: i32);

    /// Redefine the current position without moving. Also cancels any motion.
    fn set_current_position(&mut self, position: i32);

    /// Max speed in steps per second.
    fn set_max_speed(&mut self, steps_per_sec: f32);

    /// Acceleration and deceleration in steps per second squared.
    fn set_acceleration(&mut self, steps_per_sec2: f32);

    /// Decelerate to a halt as soon as the acceleration limit allows.
    fn stop(&mut self);

    /// Emit at most one step if one is due. Returns `true` while the axis is still running.
    fn advance(&mut self) -> bool;

    /// `true` until the target is reached and the axis is at rest.
    fn is_running(&self) -> bool;

    /// Signed steps left to the target.
    #[inline]
    fn distance_to_go(&self) -> i32 {
        self.target_position() - self.current_position()
    }
}
