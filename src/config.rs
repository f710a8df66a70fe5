// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Node configuration.
//!
//! Everything here is fixed at compile time. Nodes on the wall differ only by [`I2C_ADDRESS`];
//! flash each board with its own address.

use crate::protocol::ValidationPoint;

// Bus
/// 7-bit slave address, 12..=17. 12 is the top-left clock when facing the wall, row first.
pub const I2C_ADDRESS: u8 = 16;

// Axes
pub const NUM_AXES: usize = 8;
pub const NUM_MINUTE_AXES: usize = 4;
pub const NUM_HOUR_AXES: usize = 4;

/// Full-step count of one hand revolution (360 * 12).
pub const STEPS_PER_REVOLUTION: i32 = 4320;

/// Default max speed in steps per second.
pub const DEFAULT_MAX_SPEED: f32 = 700.0;
/// Default acceleration in steps per second squared.
pub const DEFAULT_ACCELERATION: f32 = 300.0;
/// Power-on hand position as a fraction of a revolution (0.5 = 6 o'clock).
pub const DEFAULT_POSITION_FRACTION: f32 = 0.5;

// Protocol
/// Frames that can wait in the queue while the main loop is busy.
pub const CMD_QUEUE_LENGTH: usize = 16;
/// Longest frame on the wire: id + 6 payload bytes + checksum.
pub const MAX_FRAME_LEN: usize = 8;
/// Whether frames carry a trailing additive checksum byte.
pub const CHECKSUM_TRAILER: bool = true;
/// Where the checksum is verified.
pub const CHECKSUM_AT: ValidationPoint = ValidationPoint::Process;

// Stepper timing
/// Step pulse high time in microseconds.
pub const STEP_PULSE_US: u32 = 2;

const _: () = assert!(NUM_MINUTE_AXES + NUM_HOUR_AXES == NUM_AXES);
const _: () = assert!(NUM_AXES <= 8, "status bitmap is a single byte");
