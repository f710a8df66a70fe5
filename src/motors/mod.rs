// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Axis Abstractions
//!
//! ## Modules
//!
//! - [`primitive`] - Contract for a non-blocking single-axis stepper.
//! - [`registry`] - The node's fixed set of axes.

pub mod primitive;
pub mod registry;

pub use primitive::{Clock, Micros, MicrosDuration, MotionPrimitive};
pub use registry::{AxisRegistry, UnknownAxis};
