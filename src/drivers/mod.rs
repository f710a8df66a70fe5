// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Drivers that sit above the raw `hw/` layer and below the motion planner.
//!
//! ## Existing drivers
//!
//! - [`stepper`] – Generic step/dir stepper driver with a trapezoidal speed ramp

pub mod stepper;

pub use stepper::StepDirStepper;
