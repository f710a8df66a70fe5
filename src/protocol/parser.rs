// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame validation and decoding.
//!
//! Validation is split in two so the I2C interrupt does as little as possible:
//!
//! - [`FrameCodec::accepts_on_receive`] runs in the interrupt. It checks the length bound and,
//!   only when configured for [`ValidationPoint::Receive`], the checksum.
//! - [`FrameCodec::decode`] runs in the main loop on a dequeued frame and does everything else.

use crate::config::{self, MAX_FRAME_LEN};
use crate::protocol::messages::*;

/// Where the checksum trailer is verified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum ValidationPoint {
    /// In the bus receive interrupt, before the frame is queued.
    Receive,
    /// In the main loop, after the frame is dequeued.
    Process,
}

/// Why a frame was dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum RejectReason {
    TooShort,
    TooLong,
    BadChecksum { expected: u8, found: u8 },
    UnknownCommand(u8),
    PayloadLength { id: u8, expected: usize, found: usize },
    InvalidDirection(i8),
    AxisOutOfRange(i8),
}

pub type FrameResult = Result<Command, RejectReason>;

/// Additive checksum: sum of all bytes modulo 256.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Frame codec configured for one protocol revision.
#[derive(Copy, Clone, Debug)]
pub struct FrameCodec {
    checksum: bool,
    validate_at: ValidationPoint,
    axis_count: usize,
}

impl FrameCodec {
    pub const fn new(checksum: bool, validate_at: ValidationPoint, axis_count: usize) -> Self {
        Self {
            checksum,
            validate_at,
            axis_count,
        }
    }

    /// Codec matching the compile-time node configuration.
    pub const fn from_config() -> Self {
        Self::new(
            config::CHECKSUM_TRAILER,
            config::CHECKSUM_AT,
            config::NUM_AXES,
        )
    }

    #[inline]
    pub fn has_checksum(&self) -> bool {
        self.checksum
    }

    /// Shortest valid frame, trailer included.
    #[inline]
    pub fn min_frame_len(&self) -> usize {
        1 + MIN_PAYLOAD_LEN + self.checksum as usize
    }

    /// Longest valid frame, trailer included.
    #[inline]
    pub fn max_frame_len(&self) -> usize {
        1 + MAX_PAYLOAD_LEN + self.checksum as usize
    }

    /// Cheap check run in the receive interrupt. Never touches the payload unless checksum
    /// validation was configured to happen at receive time.
    pub fn accepts_on_receive(&self, bytes: &[u8]) -> bool {
        if bytes.is_empty() || bytes.len() > MAX_FRAME_LEN {
            return false;
        }
        if self.checksum && self.validate_at == ValidationPoint::Receive {
            return bytes.len() >= self.min_frame_len() && Self::verify(bytes).is_ok();
        }
        true
    }

    /// Fully validate a frame and decode it into a [`Command`].
    pub fn decode(&self, bytes: &[u8]) -> FrameResult {
        if bytes.len() < self.min_frame_len() {
            return Err(RejectReason::TooShort);
        }
        if bytes.len() > self.max_frame_len() {
            return Err(RejectReason::TooLong);
        }

        let body = if self.checksum {
            // Frames validated at receive time were already checked in the interrupt.
            if self.validate_at == ValidationPoint::Process {
                Self::verify(bytes)?;
            }
            &bytes[..bytes.len() - 1]
        } else {
            bytes
        };

        let (&id, payload) = body.split_first().ok_or(RejectReason::TooShort)?;
        let expected = payload_len(id).ok_or(RejectReason::UnknownCommand(id))?;
        if payload.len() != expected {
            return Err(RejectReason::PayloadLength {
                id,
                expected,
                found: payload.len(),
            });
        }

        self.decode_payload(id, payload)
    }

    /// Compare the trailer byte against the sum of everything before it.
    fn verify(bytes: &[u8]) -> Result<(), RejectReason> {
        let (&found, body) = bytes.split_last().ok_or(RejectReason::TooShort)?;
        let expected = checksum(body);
        if expected == found {
            Ok(())
        } else {
            Err(RejectReason::BadChecksum { expected, found })
        }
    }

    fn decode_payload(&self, id: u8, payload: &[u8]) -> FrameResult {
        let mut r = Reader::new(payload);
        let cmd = match id {
            CMD_ENABLE_DRIVER => Command::SetDriverEnabled {
                enabled: r.u8() != 0,
            },
            CMD_SET_SPEED => {
                let speed = r.u16();
                Command::SetMaxSpeed {
                    speed,
                    axis: self.axis(r.i8())?,
                }
            }
            CMD_SET_ACCEL => {
                let accel = r.u16();
                Command::SetAcceleration {
                    accel,
                    axis: self.axis(r.i8())?,
                }
            }
            CMD_MOVE_TO => {
                let position = r.i16();
                let routing = Routing::from_wire(r.i8());
                Command::MoveTo {
                    position,
                    routing,
                    axis: self.axis(r.i8())?,
                }
            }
            CMD_MOVE_TO_EXTRA_REVS => {
                let position = r.i16();
                let direction = Direction::from_wire(r.i8())?;
                let extra_revs = r.u8();
                Command::MoveToWithExtraRevolutions {
                    position,
                    direction,
                    extra_revs,
                    axis: self.axis(r.i8())?,
                }
            }
            CMD_MOVE => {
                let distance = r.u16();
                let direction = Direction::from_wire(r.i8())?;
                Command::MoveRelative {
                    distance,
                    direction,
                    axis: self.axis(r.i8())?,
                }
            }
            CMD_STOP => Command::Stop {
                axis: self.axis(r.i8())?,
            },
            CMD_WIGGLE => {
                let distance = r.u16();
                let direction = Direction::from_wire(r.i8())?;
                Command::Wiggle {
                    distance,
                    direction,
                    axis: self.axis(r.i8())?,
                }
            }
            CMD_MOVE_TO_MIN_STEPS => {
                let position = r.i16();
                let direction = Direction::from_wire(r.i8())?;
                let min_steps = r.u16();
                Command::MoveToWithMinSteps {
                    position,
                    direction,
                    min_steps,
                    axis: self.axis(r.i8())?,
                }
            }
            other => return Err(RejectReason::UnknownCommand(other)),
        };
        Ok(cmd)
    }

    #[inline]
    fn axis(&self, raw: i8) -> Result<AxisSelector, RejectReason> {
        AxisSelector::from_wire(raw, self.axis_count)
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::from_config()
    }
}

/// Little-endian field reader over a payload whose length was already checked.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn u8(&mut self) -> u8 {
        let b = self.buf.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        b
    }

    fn i8(&mut self) -> i8 {
        self.u8() as i8
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes([self.u8(), self.u8()])
    }

    fn i16(&mut self) -> i16 {
        i16::from_le_bytes([self.u8(), self.u8()])
    }
}
