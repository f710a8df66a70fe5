// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motion Control
//!
//! ## Modules
//!
//! - [`planner`] - Circular routing (shortest path, fixed direction, extra laps, minimum travel).
//! - [`dispatcher`] - Applies decoded commands to the selected axes.

pub mod dispatcher;
pub mod planner;

pub use dispatcher::{DispatchError, Dispatcher};
pub use planner::{MotionPlanner, Route};
