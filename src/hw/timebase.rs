// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Microsecond timebase on TIM2 and a busy-wait delay for step pulses.
//!
//! TIM2 is 32-bit, so at 1 MHz the counter wraps every ~71 minutes. Readers only ever subtract
//! two instants, which survives the wrap.

use embedded_hal::delay::DelayNs;
use stm32f7xx_hal::{pac, rcc::Clocks};

use crate::motors::{Clock, Micros};

pub struct Timebase {
    tim: pac::TIM2,
}

impl Timebase {
    /// Configure TIM2 as a free-running 1 MHz up-counter over the full 32-bit range.
    pub fn tim2(tim2: pac::TIM2, clocks: &Clocks) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // Prescale the timer kernel clock down to 1 MHz
        let psc = clocks.timclk1().raw() / 1_000_000 - 1;
        tim.psc.write(|w| unsafe { w.bits(psc) });

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Reset the counter and latch the prescaler
        tim.cnt.write(|w| w.bits(0));
        tim.egr.write(|w| w.ug().set_bit());

        // Enable the counter
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Read the raw 32-bit counter value.
    #[inline]
    pub fn raw(&self) -> u32 {
        self.tim.cnt.read().cnt().bits()
    }

    /// Shareable read-only handle, one per stepper.
    #[inline]
    pub fn clock(&self) -> TimebaseClock<'_> {
        TimebaseClock { timebase: self }
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}

impl Clock for Timebase {
    #[inline]
    fn now(&self) -> Micros {
        Micros::from_ticks(self.raw())
    }
}

/// Borrowed [`Timebase`] that steppers hold as their [`Clock`].
#[derive(Copy, Clone)]
pub struct TimebaseClock<'a> {
    timebase: &'a Timebase,
}

impl Clock for TimebaseClock<'_> {
    #[inline]
    fn now(&self) -> Micros {
        self.timebase.now()
    }
}

/// Busy-wait delay counted in core cycles. Only used for microsecond-scale step pulses.
#[derive(Copy, Clone)]
pub struct CycleDelay {
    sysclk_hz: u32,
}

impl CycleDelay {
    pub fn new(clocks: &Clocks) -> Self {
        Self {
            sysclk_hz: clocks.sysclk().raw(),
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (ns as u64 * self.sysclk_hz as u64) / 1_000_000_000;
        cortex_m::asm::delay(cycles.max(1) as u32);
    }
}
