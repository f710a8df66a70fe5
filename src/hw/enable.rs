// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared enable line of the stepper drivers.
//!
//! All drivers on a node share one enable signal, so this is node-global state rather than part
//! of an axis.

use embedded_hal::digital::OutputPin;

/// Something that can switch the stepper drivers on and off.
pub trait EnableLine {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Whether the enable input is asserted high or low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Enable output that remembers its active level and last commanded state.
pub struct DriverEnable<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    enabled: bool,
}

impl<PIN: OutputPin> DriverEnable<PIN> {
    /// Create the wrapper and drive the pin to `enabled` straight away.
    pub fn new(pin: PIN, active: ActiveLevel, enabled: bool) -> Self {
        let mut this = Self {
            pin,
            active,
            enabled,
        };
        this.set(enabled);
        this
    }

    pub fn active_high(pin: PIN, enabled: bool) -> Self {
        Self::new(pin, ActiveLevel::High, enabled)
    }

    pub fn active_low(pin: PIN, enabled: bool) -> Self {
        Self::new(pin, ActiveLevel::Low, enabled)
    }

    fn set(&mut self, enabled: bool) {
        match (self.active, enabled) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high().ok(),
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low().ok(),
        };
        self.enabled = enabled;
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

impl<PIN: OutputPin> EnableLine for DriverEnable<PIN> {
    #[inline]
    fn set_enabled(&mut self, enabled: bool) {
        self.set(enabled);
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct FakePin {
        high: Option<bool>,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = Some(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = Some(true);
            Ok(())
        }
    }

    #[test]
    fn drives_pin_on_construction() {
        let en = DriverEnable::active_high(FakePin::default(), true);
        assert!(en.is_enabled());
        assert_eq!(en.free().high, Some(true));

        let en = DriverEnable::active_low(FakePin::default(), true);
        assert_eq!(en.free().high, Some(false));
    }

    #[test]
    fn respects_active_level() {
        let mut en = DriverEnable::active_low(FakePin::default(), false);
        assert!(!en.is_enabled());
        assert_eq!(en.pin.high, Some(true));

        en.set_enabled(true);
        assert!(en.is_enabled());
        assert_eq!(en.pin.high, Some(false));
    }
}
