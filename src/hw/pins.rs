// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767ZI clock node.
//!
//! Axes are wired in registry order: minute hands on axes 0-3, hour hands on axes 4-7. The
//! `broken-pcb` feature selects the reworked board where axis 0 and the enable line were moved
//! off damaged traces.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::{
    gpio::{gpiob, Alternate, ErasedPin, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

use crate::config::NUM_AXES;

/// Push-pull output with the pin number erased, exposed through `embedded-hal` 1.0 so the
/// generic drivers can use it.
pub struct OutPin(ErasedPin<Output<PushPull>>);

impl OutPin {
    pub fn new(pin: ErasedPin<Output<PushPull>>) -> Self {
        Self(pin)
    }
}

impl ErrorType for OutPin {
    type Error = Infallible;
}

impl OutputPin for OutPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set_high();
        Ok(())
    }
}

/// All board pins. Construct this once at startup using:
///
/// ```rust,ignore
/// let pins = BoardPins::new(dp.GPIOB, dp.GPIOE, dp.GPIOF, dp.GPIOG);
/// ```
pub struct BoardPins {
    pub axes: [AxisPins; NUM_AXES],
    /// Shared driver enable, active high.
    pub enable: OutPin,
    pub i2c1: I2c1Pins,
}

/// Step and direction outputs of one driver.
pub struct AxisPins {
    pub step: OutPin,
    pub dir: OutPin,
}

/// I2C1 to the master controller
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpiob: pac::GPIOB, gpioe: pac::GPIOE, gpiof: pac::GPIOF, gpiog: pac::GPIOG) -> Self {
        let gpiob = gpiob.split();
        let gpioe = gpioe.split();
        let gpiof = gpiof.split();
        let gpiog = gpiog.split();

        let out = |pin: ErasedPin<Output<PushPull>>| OutPin::new(pin);

        #[cfg(not(feature = "broken-pcb"))]
        let (axis0, enable) = {
            let _ = gpiof;
            (
                AxisPins {
                    step: out(gpioe.pe0.into_push_pull_output().erase()),
                    dir: out(gpioe.pe1.into_push_pull_output().erase()),
                },
                out(gpiog.pg0.into_push_pull_output().erase()),
            )
        };

        #[cfg(feature = "broken-pcb")]
        let (axis0, enable) = (
            AxisPins {
                step: out(gpiof.pf0.into_push_pull_output().erase()),
                dir: out(gpiof.pf1.into_push_pull_output().erase()),
            },
            out(gpiog.pg1.into_push_pull_output().erase()),
        );

        Self {
            axes: [
                // Minute hands
                axis0,
                AxisPins {
                    step: out(gpioe.pe2.into_push_pull_output().erase()),
                    dir: out(gpioe.pe3.into_push_pull_output().erase()),
                },
                AxisPins {
                    step: out(gpioe.pe4.into_push_pull_output().erase()),
                    dir: out(gpioe.pe5.into_push_pull_output().erase()),
                },
                AxisPins {
                    step: out(gpioe.pe6.into_push_pull_output().erase()),
                    dir: out(gpioe.pe7.into_push_pull_output().erase()),
                },
                // Hour hands
                AxisPins {
                    step: out(gpioe.pe8.into_push_pull_output().erase()),
                    dir: out(gpioe.pe9.into_push_pull_output().erase()),
                },
                AxisPins {
                    step: out(gpioe.pe10.into_push_pull_output().erase()),
                    dir: out(gpioe.pe11.into_push_pull_output().erase()),
                },
                AxisPins {
                    step: out(gpioe.pe12.into_push_pull_output().erase()),
                    dir: out(gpioe.pe13.into_push_pull_output().erase()),
                },
                AxisPins {
                    step: out(gpioe.pe14.into_push_pull_output().erase()),
                    dir: out(gpioe.pe15.into_push_pull_output().erase()),
                },
            ],

            enable,

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },
        }
    }
}
