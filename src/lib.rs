// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Clockwall Node Firmware
//!
//! This crate contains the firmware for one slave node of a kinetic clock wall. A node drives
//! eight stepper motors (four hour/minute hand pairs) and takes motion commands over I2C from a
//! master controller, while a non-blocking scheduler keeps every hand moving.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Compile-time node configuration (address, axis count, defaults) |
//! | [`protocol`] | Wire frames, command decoding and the ISR-to-main-loop frame queue |
//! | [`motors`] | Motion primitive contract and the axis registry |
//! | [`drivers`] | Device-level drivers (step/dir stepper with acceleration ramp) |
//! | [`control`] | Circular motion planner and command dispatcher |
//! | [`status`] | Running-state flags and the status bitmap |
//! | [`bus`] | I2C callback contract (receive / request) |
//! | [`node`] | Main-loop scheduler tick |
//! | [`hw`] | MCU-level wrappers (enable line, timebase, I2C slave, pins) |
//!
//! ## Getting Started
//!
//! Run the unit tests on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod config;
pub mod control;
pub mod drivers;
pub mod hw;
pub mod motors;
pub mod node;
pub mod protocol;
pub mod status;
