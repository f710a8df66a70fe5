// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command protocol spoken by the wall master.
//!
//! - [`messages`] - command ids, payload layouts and the typed [`Command`].
//! - [`parser`] - frame validation and decoding.
//! - [`queue`] - bounded SPSC frame queue between the I2C interrupt and the main loop.

pub mod messages;
pub mod parser;
pub mod queue;

pub use messages::{AxisSelector, Command, Direction, Frame, Routing};
pub use parser::{checksum, FrameCodec, FrameResult, RejectReason, ValidationPoint};
pub use queue::{CommandQueue, FrameConsumer, FrameProducer, FrameQueue, RawFrame};
