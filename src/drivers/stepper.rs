// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Step/dir stepper driver with a trapezoidal speed profile.
//!
//! Works with any step/dir driver (A4988, DRV8825, TMC22xx in legacy mode). Step timing follows
//! D. Austin, "Generate stepper-motor speed profiles in real time": the first interval is
//! `c0 = 0.676 * sqrt(2 / a)` seconds, each following one `c(n) = c(n-1) - 2 c(n-1) / (4n + 1)`,
//! floored at the max-speed interval. A negative `n` runs the same recurrence backwards to
//! decelerate.
//!
//! [`advance`](MotionPrimitive::advance) never waits for a step to become due; it returns at once
//! if the interval has not elapsed. The only busy-wait is the few-microsecond step pulse itself.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use micromath::F32Ext;

use crate::config;
use crate::motors::{Clock, Micros, MotionPrimitive};
use crate::protocol::Direction;

pub struct StepDirStepper<STEP, DIR, C, D> {
    step: STEP,
    dir: DIR,
    clock: C,
    delay: D,
    pulse_us: u32,

    current: i32,
    target: i32,

    /// Signed speed in steps/s, positive clockwise.
    speed: f32,
    max_speed: f32,
    acceleration: f32,
    direction: Direction,

    /// Ramp step counter; negative while decelerating.
    n: i32,
    /// First-step interval (µs).
    c0: f32,
    /// Current interval (µs).
    cn: f32,
    /// Interval at max speed (µs).
    cmin: f32,

    /// 0 while stationary.
    step_interval: u32,
    last_step: Micros,
}

impl<STEP, DIR, C, D> StepDirStepper<STEP, DIR, C, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    C: Clock,
    D: DelayNs,
{
    /// Create a stepper at position 0 with the default speed and acceleration.
    pub fn new(step: STEP, dir: DIR, clock: C, delay: D) -> Self {
        let mut stepper = Self {
            step,
            dir,
            clock,
            delay,
            pulse_us: config::STEP_PULSE_US,
            current: 0,
            target: 0,
            speed: 0.0,
            max_speed: 0.0,
            acceleration: 0.0,
            direction: Direction::Cw,
            n: 0,
            c0: 0.0,
            cn: 0.0,
            cmin: 1.0,
            step_interval: 0,
            last_step: Micros::from_ticks(0),
        };
        stepper.step.set_low().ok();
        stepper.set_acceleration(config::DEFAULT_ACCELERATION);
        stepper.set_max_speed(config::DEFAULT_MAX_SPEED);
        stepper
    }

    /// Step pulse high time.
    pub fn with_pulse_width_us(mut self, pulse_us: u32) -> Self {
        self.pulse_us = pulse_us;
        self
    }

    /// Current signed speed in steps/s.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Release the pins.
    pub fn free(self) -> (STEP, DIR) {
        (self.step, self.dir)
    }

    /// Steps needed to come to rest from the current speed.
    #[inline]
    fn steps_to_stop(&self) -> i32 {
        ((self.speed * self.speed) / (2.0 * self.acceleration)) as i32
    }

    /// Take one step if the current interval has elapsed.
    fn run_speed(&mut self) -> bool {
        if self.step_interval == 0 {
            return false;
        }

        let now = self.clock.now();
        let elapsed = now.ticks().wrapping_sub(self.last_step.ticks());
        if elapsed < self.step_interval {
            return false;
        }

        match self.direction {
            Direction::Cw => self.current += 1,
            Direction::Ccw => self.current -= 1,
        }
        self.pulse();
        self.last_step = now;
        true
    }

    fn pulse(&mut self) {
        let cw = self.direction == Direction::Cw;
        self.dir.set_state(PinState::from(cw)).ok();
        self.step.set_high().ok();
        self.delay.delay_us(self.pulse_us);
        self.step.set_low().ok();
    }

    /// Work out the next step interval from the distance left and the current ramp position.
    fn compute_new_speed(&mut self) {
        let distance_to = self.distance_to_go();
        let steps_to_stop = self.steps_to_stop();

        if distance_to == 0 && steps_to_stop <= 1 {
            // Arrived.
            self.step_interval = 0;
            self.speed = 0.0;
            self.n = 0;
            return;
        }

        if distance_to > 0 {
            if self.n > 0 {
                if steps_to_stop >= distance_to || self.direction == Direction::Ccw {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0 && steps_to_stop < distance_to && self.direction == Direction::Cw
            {
                self.n = -self.n;
            }
        } else if distance_to < 0 {
            if self.n > 0 {
                if steps_to_stop >= -distance_to || self.direction == Direction::Cw {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < -distance_to
                && self.direction == Direction::Ccw
            {
                self.n = -self.n;
            }
        }

        if self.n == 0 {
            // First step from rest.
            self.cn = self.c0;
            self.direction = if distance_to > 0 {
                Direction::Cw
            } else {
                Direction::Ccw
            };
        } else {
            self.cn -= (2.0 * self.cn) / (4.0 * self.n as f32 + 1.0);
            self.cn = self.cn.max(self.cmin);
        }
        self.n += 1;
        self.step_interval = self.cn as u32;
        self.speed = 1_000_000.0 / self.cn * self.direction.sign() as f32;
    }
}

impl<STEP, DIR, C, D> MotionPrimitive for StepDirStepper<STEP, DIR, C, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    C: Clock,
    D: DelayNs,
{
    #[inline]
    fn current_position(&self) -> i32 {
        self.current
    }

    #[inline]
    fn target_position(&self) -> i32 {
        self.target
    }

    fn move_to(&mut self, target: i32) {
        if self.target != target {
            self.target = target;
            self.compute_new_speed();
        }
    }

    fn set_current_position(&mut self, position: i32) {
        self.current = position;
        self.target = position;
        self.n = 0;
        self.step_interval = 0;
        self.speed = 0.0;
    }

    fn set_max_speed(&mut self, steps_per_sec: f32) {
        let speed = F32Ext::abs(steps_per_sec);
        if speed == 0.0 {
            // Would stall the ramp forever.
            return;
        }
        if self.max_speed != speed {
            self.max_speed = speed;
            self.cmin = 1_000_000.0 / speed;
            // Already accelerating: recompute where on the ramp the current speed sits.
            if self.n > 0 {
                self.n = self.steps_to_stop();
                self.compute_new_speed();
            }
        }
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        let accel = F32Ext::abs(steps_per_sec2);
        if accel == 0.0 {
            return;
        }
        if self.acceleration != accel {
            // Rescale the ramp position to the new slope.
            self.n = (self.n as f32 * (self.acceleration / accel)) as i32;
            self.c0 = 0.676 * F32Ext::sqrt(2.0 / accel) * 1_000_000.0;
            self.acceleration = accel;
            self.compute_new_speed();
        }
    }

    fn stop(&mut self) {
        if self.speed != 0.0 {
            let steps = self.steps_to_stop() + 1;
            if self.speed > 0.0 {
                self.move_to(self.current + steps);
            } else {
                self.move_to(self.current - steps);
            }
        }
    }

    fn advance(&mut self) -> bool {
        if self.run_speed() {
            self.compute_new_speed();
        }
        self.is_running()
    }

    #[inline]
    fn is_running(&self) -> bool {
        !(self.speed == 0.0 && self.target == self.current)
    }
}
