// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU Abstractions
//!
//! - [`enable`] - Shared stepper-driver enable line.
//! - `timebase` - TIM2 microsecond clock and step-pulse delay (MCU only).
//! - `i2c_slave` - Interrupt-driven I2C1 slave feeding the bus callbacks (MCU only).
//! - `pins` - Board pin map (MCU only).

pub mod enable;

#[cfg(target_os = "none")]
pub mod i2c_slave;
#[cfg(target_os = "none")]
pub mod pins;
#[cfg(target_os = "none")]
pub mod timebase;

pub use enable::{ActiveLevel, DriverEnable, EnableLine};

#[cfg(target_os = "none")]
pub use i2c_slave::I2cSlave;
#[cfg(target_os = "none")]
pub use pins::{BoardPins, OutPin};
#[cfg(target_os = "none")]
pub use timebase::{CycleDelay, Timebase, TimebaseClock};
