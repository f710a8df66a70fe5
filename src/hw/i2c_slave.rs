// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven I2C1 slave.
//!
//! Register-level, since the HAL only offers an I2C master. A write transaction is collected
//! into a frame buffer and handed to [`BusSlave::on_receive`] on STOP. A read transaction is
//! answered with [`BusSlave::on_request`], repeated if the master clocks out more than one byte.
//!
//! Call [`I2cSlave::on_event`] from the `I2C1_EV` handler and [`I2cSlave::on_error`] from
//! `I2C1_ER`.

use heapless::Vec;
use stm32f7xx_hal::pac;

use crate::bus::BusSlave;
use crate::config::MAX_FRAME_LEN;
use crate::hw::pins::I2c1Pins;

/// Standard-mode timing for a 54 MHz I2C kernel clock (PCLK1). In slave mode only the data
/// setup and hold delays are used.
const TIMINGR: u32 = 0x2040_4768;
const OA1EN: u32 = 1 << 15;

pub struct I2cSlave {
    i2c: pac::I2C1,
    _pins: I2c1Pins,
    frame: Vec<u8, MAX_FRAME_LEN>,
    overrun: bool,
}

impl I2cSlave {
    /// Enable I2C1 as a 7-bit slave at `address` with event interrupts on.
    pub fn i2c1(i2c1: pac::I2C1, pins: I2c1Pins, address: u8) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.i2c1en().set_bit());
        rcc.apb1rstr.modify(|_, w| w.i2c1rst().set_bit());
        rcc.apb1rstr.modify(|_, w| w.i2c1rst().clear_bit());

        let i2c = i2c1;

        // Peripheral off while configuring
        i2c.cr1.modify(|_, w| w.pe().clear_bit());

        i2c.timingr.write(|w| unsafe { w.bits(TIMINGR) });

        // Own address 1, 7-bit. OA1 only changes while OA1EN is clear.
        i2c.oar1.write(|w| unsafe { w.bits(0) });
        i2c.oar1.write(|w| unsafe { w.bits(OA1EN | ((address as u32 & 0x7F) << 1)) });

        // Address, RX, TX, STOP and NACK events; bus errors
        i2c.cr1.modify(|_, w| {
            w.addrie()
                .set_bit()
                .rxie()
                .set_bit()
                .txie()
                .set_bit()
                .stopie()
                .set_bit()
                .nackie()
                .set_bit()
                .errie()
                .set_bit()
        });

        i2c.cr1.modify(|_, w| w.pe().set_bit());

        Self {
            i2c,
            _pins: pins,
            frame: Vec::new(),
            overrun: false,
        }
    }

    /// Service one `I2C1_EV` interrupt.
    pub fn on_event<const Q: usize, const A: usize>(&mut self, bus: &mut BusSlave<'_, Q, A>) {
        let isr = self.i2c.isr.read();

        if isr.addr().bit_is_set() {
            if isr.dir().bit_is_clear() {
                // Master write: start a new frame.
                self.frame.clear();
                self.overrun = false;
            }
            self.i2c.icr.write(|w| w.addrcf().set_bit());
        }

        if isr.rxne().bit_is_set() {
            let byte = self.i2c.rxdr.read().rxdata().bits();
            if self.frame.push(byte).is_err() {
                self.overrun = true;
            }
        }

        if isr.txis().bit_is_set() {
            let status = bus.on_request();
            self.i2c.txdr.write(|w| unsafe { w.bits(status as u32) });
        }

        if isr.nackf().bit_is_set() {
            // End of a read: the master NACKs the last byte.
            self.i2c.icr.write(|w| w.nackcf().set_bit());
        }

        if isr.stopf().bit_is_set() {
            self.i2c.icr.write(|w| w.stopcf().set_bit());
            if isr.dir().bit_is_clear() {
                self.finish_frame(bus);
            }
        }
    }

    /// Service one `I2C1_ER` interrupt: clear the flags and drop any partial frame.
    pub fn on_error(&mut self) {
        let isr = self.i2c.isr.read();
        if isr.berr().bit_is_set() || isr.arlo().bit_is_set() || isr.ovr().bit_is_set() {
            warn!("i2c: bus error, partial frame dropped");
        }
        self.i2c
            .icr
            .write(|w| w.berrcf().set_bit().arlocf().set_bit().ovrcf().set_bit());
        self.frame.clear();
        self.overrun = false;
    }

    fn finish_frame<const Q: usize, const A: usize>(&mut self, bus: &mut BusSlave<'_, Q, A>) {
        if self.overrun {
            warn!("i2c: frame longer than {=usize} bytes dropped", MAX_FRAME_LEN);
        } else if !self.frame.is_empty() {
            bus.on_receive(&self.frame);
        }
        self.frame.clear();
        self.overrun = false;
    }
}
