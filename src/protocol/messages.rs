// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command messages understood by a node.
//!
//! A write transaction carries exactly one frame:
//!
//! ```text
//! [command id: u8][payload ...][checksum: u8]?
//! ```
//!
//! Multi-byte fields are little-endian. Every payload except `EnableDriver` ends with an axis
//! selector byte, where `-1` addresses all axes of the node.

use heapless::Vec;

use crate::config::MAX_FRAME_LEN;
use crate::protocol::parser::{checksum, RejectReason};

// Command IDs
pub const CMD_ENABLE_DRIVER: u8 = 0;
pub const CMD_SET_SPEED: u8 = 1;
pub const CMD_SET_ACCEL: u8 = 2;
pub const CMD_MOVE_TO: u8 = 3;
pub const CMD_MOVE_TO_EXTRA_REVS: u8 = 4;
pub const CMD_MOVE: u8 = 5;
pub const CMD_STOP: u8 = 6;
pub const CMD_WIGGLE: u8 = 7;
pub const CMD_MOVE_TO_MIN_STEPS: u8 = 8;

/// Axis selector value that addresses every axis.
pub const BROADCAST: i8 = -1;

pub const MIN_PAYLOAD_LEN: usize = 1;
pub const MAX_PAYLOAD_LEN: usize = 6;

/// Encoded frame, command id first.
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Fixed payload length (without id and checksum) for a command id.
pub const fn payload_len(id: u8) -> Option<usize> {
    match id {
        CMD_ENABLE_DRIVER => Some(1),
        CMD_SET_SPEED | CMD_SET_ACCEL => Some(3),
        CMD_MOVE_TO | CMD_MOVE | CMD_WIGGLE => Some(4),
        CMD_MOVE_TO_EXTRA_REVS => Some(5),
        CMD_STOP => Some(1),
        CMD_MOVE_TO_MIN_STEPS => Some(6),
        _ => None,
    }
}

/// Which axes a command applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum AxisSelector {
    All,
    One(u8),
}

impl AxisSelector {
    /// Validate a wire selector against the number of axes on this node.
    pub fn from_wire(raw: i8, axis_count: usize) -> Result<Self, RejectReason> {
        match raw {
            BROADCAST => Ok(AxisSelector::All),
            id if id >= 0 && (id as usize) < axis_count => Ok(AxisSelector::One(id as u8)),
            id => Err(RejectReason::AxisOutOfRange(id)),
        }
    }

    pub fn to_wire(self) -> i8 {
        match self {
            AxisSelector::All => BROADCAST,
            AxisSelector::One(id) => id as i8,
        }
    }
}

/// Rotation direction. Clockwise is increasing step position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Direction {
    Cw,
    Ccw,
}

impl Direction {
    /// Any positive value is clockwise, any negative counter-clockwise.
    pub fn from_wire(raw: i8) -> Result<Self, RejectReason> {
        match raw {
            r if r > 0 => Ok(Direction::Cw),
            r if r < 0 => Ok(Direction::Ccw),
            r => Err(RejectReason::InvalidDirection(r)),
        }
    }

    #[inline]
    pub fn to_wire(self) -> i8 {
        self.sign() as i8
    }

    /// +1 for clockwise, -1 for counter-clockwise.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Cw => 1,
            Direction::Ccw => -1,
        }
    }
}

/// Route selection for an absolute move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Routing {
    Shortest,
    Fixed(Direction),
}

impl Routing {
    /// `0` selects the shortest path, otherwise the sign picks the direction.
    pub fn from_wire(raw: i8) -> Self {
        match Direction::from_wire(raw) {
            Ok(dir) => Routing::Fixed(dir),
            Err(_) => Routing::Shortest,
        }
    }

    pub fn to_wire(self) -> i8 {
        match self {
            Routing::Shortest => 0,
            Routing::Fixed(dir) => dir.to_wire(),
        }
    }
}

/// A decoded command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Command {
    /// Drive the shared enable line of all stepper drivers.
    SetDriverEnabled { enabled: bool },
    SetMaxSpeed { axis: AxisSelector, speed: u16 },
    SetAcceleration { axis: AxisSelector, accel: u16 },
    MoveTo {
        axis: AxisSelector,
        position: i16,
        routing: Routing,
    },
    /// Absolute move with `extra_revs` full laps before landing on `position`.
    MoveToWithExtraRevolutions {
        axis: AxisSelector,
        position: i16,
        direction: Direction,
        extra_revs: u8,
    },
    /// Absolute move that travels at least `min_steps`.
    MoveToWithMinSteps {
        axis: AxisSelector,
        position: i16,
        direction: Direction,
        min_steps: u16,
    },
    MoveRelative {
        axis: AxisSelector,
        distance: u16,
        direction: Direction,
    },
    Stop { axis: AxisSelector },
    Wiggle {
        axis: AxisSelector,
        distance: u16,
        direction: Direction,
    },
}

impl Command {
    pub fn id(&self) -> u8 {
        match self {
            Command::SetDriverEnabled { .. } => CMD_ENABLE_DRIVER,
            Command::SetMaxSpeed { .. } => CMD_SET_SPEED,
            Command::SetAcceleration { .. } => CMD_SET_ACCEL,
            Command::MoveTo { .. } => CMD_MOVE_TO,
            Command::MoveToWithExtraRevolutions { .. } => CMD_MOVE_TO_EXTRA_REVS,
            Command::MoveRelative { .. } => CMD_MOVE,
            Command::Stop { .. } => CMD_STOP,
            Command::Wiggle { .. } => CMD_WIGGLE,
            Command::MoveToWithMinSteps { .. } => CMD_MOVE_TO_MIN_STEPS,
        }
    }

    /// Target axes, or `None` for node-global commands.
    pub fn axis(&self) -> Option<AxisSelector> {
        match *self {
            Command::SetDriverEnabled { .. } => None,
            Command::SetMaxSpeed { axis, .. }
            | Command::SetAcceleration { axis, .. }
            | Command::MoveTo { axis, .. }
            | Command::MoveToWithExtraRevolutions { axis, .. }
            | Command::MoveToWithMinSteps { axis, .. }
            | Command::MoveRelative { axis, .. }
            | Command::Stop { axis }
            | Command::Wiggle { axis, .. } => Some(axis),
        }
    }

    /// Encode as a wire frame, optionally with the checksum trailer.
    ///
    /// This is the master-side view of the protocol; the node itself only decodes.
    pub fn encode(&self, with_checksum: bool) -> Frame {
        let mut out = Frame::new();
        let mut put = |bytes: &[u8]| {
            // MAX_FRAME_LEN covers the longest command plus trailer.
            let _ = out.extend_from_slice(bytes);
        };

        put(&[self.id()]);
        match *self {
            Command::SetDriverEnabled { enabled } => put(&[enabled as u8]),
            Command::SetMaxSpeed { axis, speed } => {
                put(&speed.to_le_bytes());
                put(&[axis.to_wire() as u8]);
            }
            Command::SetAcceleration { axis, accel } => {
                put(&accel.to_le_bytes());
                put(&[axis.to_wire() as u8]);
            }
            Command::MoveTo {
                axis,
                position,
                routing,
            } => {
                put(&position.to_le_bytes());
                put(&[routing.to_wire() as u8, axis.to_wire() as u8]);
            }
            Command::MoveToWithExtraRevolutions {
                axis,
                position,
                direction,
                extra_revs,
            } => {
                put(&position.to_le_bytes());
                put(&[direction.to_wire() as u8, extra_revs, axis.to_wire() as u8]);
            }
            Command::MoveToWithMinSteps {
                axis,
                position,
                direction,
                min_steps,
            } => {
                put(&position.to_le_bytes());
                put(&[direction.to_wire() as u8]);
                put(&min_steps.to_le_bytes());
                put(&[axis.to_wire() as u8]);
            }
            Command::MoveRelative {
                axis,
                distance,
                direction,
            }
            | Command::Wiggle {
                axis,
                distance,
                direction,
            } => {
                put(&distance.to_le_bytes());
                put(&[direction.to_wire() as u8, axis.to_wire() as u8]);
            }
            Command::Stop { axis } => put(&[axis.to_wire() as u8]),
        }

        if with_checksum {
            let sum = checksum(&out);
            let _ = out.push(sum);
        }
        out
    }
}
