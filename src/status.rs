// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-axis running state shared with the I2C interrupt.
//!
//! The main loop publishes each axis's running flag after stepping it; the interrupt assembles
//! them into the status byte returned on a bus read. Each flag is a single atomic, so a read never
//! sees a torn value. A bitmap assembled while the main loop is mid-publish may mix states from
//! two consecutive ticks, which the master tolerates.

use core::sync::atomic::{AtomicBool, Ordering};

pub struct RunningFlags<const N: usize> {
    flags: [AtomicBool; N],
}

impl<const N: usize> RunningFlags<N> {
    pub const fn new() -> Self {
        Self {
            flags: [const { AtomicBool::new(false) }; N],
        }
    }

    /// Record whether axis `index` is running. Out-of-range indices are ignored.
    #[inline]
    pub fn publish(&self, index: usize, running: bool) {
        if let Some(flag) = self.flags.get(index) {
            flag.store(running, Ordering::Release);
        }
    }

    #[inline]
    pub fn is_running(&self, index: usize) -> bool {
        self.flags
            .get(index)
            .map_or(false, |flag| flag.load(Ordering::Acquire))
    }

    /// Bit `i` set iff axis `i` is running. Only the first eight axes fit.
    pub fn bitmap(&self) -> u8 {
        self.flags
            .iter()
            .take(8)
            .enumerate()
            .filter(|(_, flag)| flag.load(Ordering::Acquire))
            .fold(0u8, |bits, (i, _)| bits | (1 << i))
    }
}

impl<const N: usize> Default for RunningFlags<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Answers bus read requests with the running bitmap.
#[derive(Copy, Clone)]
pub struct StatusReporter<'a, const N: usize> {
    flags: &'a RunningFlags<N>,
}

impl<'a, const N: usize> StatusReporter<'a, N> {
    pub fn new(flags: &'a RunningFlags<N>) -> Self {
        Self { flags }
    }

    #[inline]
    pub fn report(&self) -> u8 {
        self.flags.bitmap()
    }
}
