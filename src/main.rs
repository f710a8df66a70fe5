// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Clock node firmware entry point.
//!
//! Wires the board together: eight step/dir steppers on the TIM2 timebase, the shared enable
//! line, and the I2C1 slave feeding the command queue. The main loop only ever calls
//! [`Node::tick`](clockwall::node::Node::tick).

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(not(target_os = "none"))]
fn main() {}

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;

    use cortex_m::{interrupt::Mutex, peripheral::NVIC};
    use cortex_m_rt::entry;
    use defmt_rtt as _;
    use embedded_hal::delay::DelayNs;
    use panic_halt as _;

    use stm32f7xx_hal::{
        pac::{self, interrupt},
        prelude::*,
    };

    use clockwall::{
        bus::BusSlave,
        config,
        control::{Dispatcher, MotionPlanner},
        drivers::StepDirStepper,
        hw::{BoardPins, CycleDelay, DriverEnable, I2cSlave, Timebase},
        motors::AxisRegistry,
        node::Node,
        protocol::{CommandQueue, FrameCodec},
        status::{RunningFlags, StatusReporter},
    };

    const QUEUE_SLOTS: usize = config::CMD_QUEUE_LENGTH + 1;

    type Bus = BusSlave<'static, QUEUE_SLOTS, { config::NUM_AXES }>;

    static RUNNING: RunningFlags<{ config::NUM_AXES }> = RunningFlags::new();
    static BUS: Mutex<RefCell<Option<(I2cSlave, Bus)>>> = Mutex::new(RefCell::new(None));

    #[entry]
    fn main() -> ! {
        // Peripherals
        let dp = pac::Peripherals::take().unwrap();

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();

        // Pins
        let pins = BoardPins::new(dp.GPIOB, dp.GPIOE, dp.GPIOF, dp.GPIOG);

        // Timing
        let timebase: &'static Timebase =
            cortex_m::singleton!(: Timebase = Timebase::tim2(dp.TIM2, &clocks)).unwrap();
        let mut delay = CycleDelay::new(&clocks);

        // Axes, in registry order
        let registry = AxisRegistry::new(
            pins.axes
                .map(|axis| StepDirStepper::new(axis.step, axis.dir, timebase.clock(), delay)),
        );

        // Let the driver supplies settle before enabling outputs
        delay.delay_ms(5);
        let enable = DriverEnable::active_high(pins.enable, true);

        // Command queue split between the I2C interrupt and the main loop
        let queue: &'static mut CommandQueue =
            cortex_m::singleton!(: CommandQueue = CommandQueue::new()).unwrap();
        let (producer, consumer) = queue.split();

        let codec = FrameCodec::from_config();
        let bus = BusSlave::new(producer, codec, StatusReporter::new(&RUNNING));
        let i2c = I2cSlave::i2c1(dp.I2C1, pins.i2c1, config::I2C_ADDRESS);

        cortex_m::interrupt::free(|cs| BUS.borrow(cs).replace(Some((i2c, bus))));
        unsafe {
            NVIC::unmask(pac::Interrupt::I2C1_EV);
            NVIC::unmask(pac::Interrupt::I2C1_ER);
        }

        let dispatcher = Dispatcher::new(MotionPlanner::default(), enable);
        let mut node = Node::new(consumer, codec, registry, dispatcher, &RUNNING);
        node.startup();

        defmt::info!("clock node {=u8} running", config::I2C_ADDRESS);

        loop {
            node.tick();
        }
    }

    #[interrupt]
    fn I2C1_EV() {
        cortex_m::interrupt::free(|cs| {
            if let Some((i2c, bus)) = BUS.borrow(cs).borrow_mut().as_mut() {
                i2c.on_event(bus);
            }
        });
    }

    #[interrupt]
    fn I2C1_ER() {
        cortex_m::interrupt::free(|cs| {
            if let Some((i2c, _)) = BUS.borrow(cs).borrow_mut().as_mut() {
                i2c.on_error();
            }
        });
    }
}
