// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Routes decoded commands to the planner or the shared driver-enable line.

use crate::control::MotionPlanner;
use crate::hw::EnableLine;
use crate::motors::{AxisRegistry, MotionPrimitive, UnknownAxis};
use crate::protocol::Command;

/// Error type for [`Dispatcher::try_dispatch`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum DispatchError {
    /// Selector names an axis this node does not have. Nothing was changed.
    AxisOutOfRange(u8),
}

impl From<UnknownAxis> for DispatchError {
    fn from(e: UnknownAxis) -> Self {
        DispatchError::AxisOutOfRange(e.0)
    }
}

pub struct Dispatcher<E> {
    planner: MotionPlanner,
    enable: E,
}

impl<E: EnableLine> Dispatcher<E> {
    pub fn new(planner: MotionPlanner, enable: E) -> Self {
        Self { planner, enable }
    }

    #[inline]
    pub fn planner(&self) -> &MotionPlanner {
        &self.planner
    }

    #[inline]
    pub fn enable_line(&self) -> &E {
        &self.enable
    }

    /// Execute a command. Errors are logged and the command is dropped.
    pub fn dispatch<M: MotionPrimitive, const N: usize>(
        &mut self,
        registry: &mut AxisRegistry<M, N>,
        cmd: Command,
    ) {
        if let Err(e) = self.try_dispatch(registry, cmd) {
            warn!("dropped command {}: {}", cmd.id(), e);
        }
    }

    /// Execute a command. The selector is resolved before any axis is touched, so an error means
    /// no state changed.
    pub fn try_dispatch<M: MotionPrimitive, const N: usize>(
        &mut self,
        registry: &mut AxisRegistry<M, N>,
        cmd: Command,
    ) -> Result<(), DispatchError> {
        let Some(selector) = cmd.axis() else {
            if let Command::SetDriverEnabled { enabled } = cmd {
                info!("drivers {}", if enabled { "enabled" } else { "disabled" });
                self.enable.set_enabled(enabled);
            }
            return Ok(());
        };

        let axes = registry.select_mut(selector)?;
        for axis in axes.iter_mut() {
            self.apply(axis, cmd);
        }
        Ok(())
    }

    fn apply<M: MotionPrimitive>(&self, axis: &mut M, cmd: Command) {
        let planner = &self.planner;
        match cmd {
            Command::SetDriverEnabled { .. } => {}
            Command::SetMaxSpeed { speed, .. } => planner.set_max_speed(axis, speed),
            Command::SetAcceleration { accel, .. } => planner.set_acceleration(axis, accel),
            Command::MoveTo {
                position, routing, ..
            } => {
                planner.move_to(axis, position, routing);
            }
            Command::MoveToWithExtraRevolutions {
                position,
                direction,
                extra_revs,
                ..
            } => {
                planner.move_to_extra_revolutions(axis, position, direction, extra_revs);
            }
            Command::MoveToWithMinSteps {
                position,
                direction,
                min_steps,
                ..
            } => {
                planner.move_to_min_steps(axis, position, direction, min_steps);
            }
            Command::MoveRelative {
                distance,
                direction,
                ..
            } => planner.move_relative(axis, distance, direction),
            Command::Stop { .. } => planner.stop(axis),
            Command::Wiggle {
                distance,
                direction,
                ..
            } => planner.wiggle(axis, distance, direction),
        }
    }
}
