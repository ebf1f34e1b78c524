//! GPIO port as a pin bank
//!
//! The STM32 has one MODER/ODR per port, shared by every task. [`GpioPort`]
//! keeps each context's direction and output words and writes the hardware
//! from their combination, touching only the bits whose combined state moved.
//! Output levels go through BSRR so no read-modify-write of ODR is needed.

use cortex_m::interrupt;
use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::Moder;

use crate::config::NUM_CONTEXTS;
use crate::io::pins::PinBank;
use crate::io::shared::{SharedRegisters, Transition};

/// Pins on one GPIO port
pub const PORT_PINS: u8 = 16;

const PORT_MASK: u32 = (1 << PORT_PINS) - 1;

const CONTEXTS: usize = NUM_CONTEXTS as usize;

/// One GPIO port and the register words of every context using it
pub struct GpioPort {
    regs: pac::gpio::Gpio,
    registers: SharedRegisters<CONTEXTS>,
}

impl GpioPort {
    /// Port `regs` with no pins claimed by any context
    #[must_use]
    pub const fn new(regs: pac::gpio::Gpio) -> Self {
        Self {
            regs,
            registers: SharedRegisters::new(),
        }
    }

    fn write(&self, id: usize, dir: u32, out: u32) {
        interrupt::free(|_| {
            let transition = self.registers.update(id, dir & PORT_MASK, out & PORT_MASK);
            self.apply(&transition);
        });
    }

    fn apply(&self, transition: &Transition) {
        // Level first, so a pin turning output starts at the right level
        let set = transition.set_high();
        let reset = transition.set_low();
        if set | reset != 0 {
            self.regs
                .bsrr()
                .write_value(pac::gpio::regs::Bsrr(set | (reset << 16)));
        }

        let to_output = transition.to_output();
        let changed = to_output | transition.to_input();
        if changed != 0 {
            self.regs.moder().modify(|w| {
                for n in (0..usize::from(PORT_PINS)).filter(|n| changed & (1 << n) != 0) {
                    let mode = if to_output & (1 << n) != 0 { Moder::OUTPUT } else { Moder::INPUT };
                    w.set_moder(n, mode);
                }
            });
        }
    }
}

/// One context's view of a [`GpioPort`]
pub struct GpioBank<'a> {
    port: &'a GpioPort,
    id: usize,
}

impl<'a> GpioBank<'a> {
    pub(crate) const fn new(port: &'a GpioPort, id: usize) -> Self {
        Self { port, id }
    }
}

impl PinBank for GpioBank<'_> {
    const PIN_COUNT: u8 = PORT_PINS;

    fn read_dir(&self) -> u32 {
        self.port.registers.dir(self.id)
    }

    fn write_dir(&mut self, bits: u32) {
        self.port.write(self.id, bits, self.read_out());
    }

    fn read_out(&self) -> u32 {
        self.port.registers.out(self.id)
    }

    fn write_out(&mut self, bits: u32) {
        self.port.write(self.id, self.read_dir(), bits);
    }

    fn read_in(&self) -> u32 {
        self.port.regs.idr().read().0 & PORT_MASK
    }
}
