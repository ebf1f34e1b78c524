//! Software execution contexts on a single core
//!
//! Generator workers run as embassy tasks instead of on separate cores. Each
//! context is a [`GpioBank`] view of one [`GpioPort`] with its own direction
//! and output words; the port drives a pin while any context drives it.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_stm32::pac;

use super::clock::EmbassyClock;
use super::port::{GpioBank, GpioPort, PORT_PINS};
use crate::config::NUM_CONTEXTS;
use crate::error::{Error, Result};
use crate::io::pins::PinBank;
use crate::io::timing::Clock;
use crate::io::TimedIo;
use crate::signal::Launch;

/// Context pool for one GPIO port, context 0 is the caller's
pub struct GpioContexts {
    port: GpioPort,
    busy: AtomicU8,
    main_taken: AtomicBool,
}

impl GpioContexts {
    /// Pool for `regs`
    #[must_use]
    pub const fn new(regs: pac::gpio::Gpio) -> Self {
        Self {
            port: GpioPort::new(regs),
            busy: AtomicU8::new(1),
            main_taken: AtomicBool::new(false),
        }
    }

    /// Timed I/O for the caller's context, `None` once it has been taken
    pub fn main(&self) -> Option<TimedIo<GpioBank<'_>, EmbassyClock>> {
        if self.main_taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(TimedIo::new(GpioBank::new(&self.port, 0), EmbassyClock))
    }
}

impl Launch for GpioContexts {
    type Context<'a> = GpioContext<'a>;

    fn launch(&self) -> Result<GpioContext<'_>> {
        let mut busy = self.busy.load(Ordering::Acquire);
        loop {
            let id = (1..NUM_CONTEXTS)
                .find(|id| busy & (1 << id) == 0)
                .ok_or(Error::NoFreeContext)?;
            match self
                .busy
                .compare_exchange(busy, busy | (1 << id), Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    crate::debug!("context {} launched", id);
                    return Ok(GpioContext {
                        bank: GpioBank::new(&self.port, usize::from(id)),
                        owner: self,
                        id,
                    });
                }
                Err(current) => busy = current,
            }
        }
    }
}

/// Launched context: a port view plus the shared clock
pub struct GpioContext<'a> {
    bank: GpioBank<'a>,
    owner: &'a GpioContexts,
    id: u8,
}

impl PinBank for GpioContext<'_> {
    const PIN_COUNT: u8 = PORT_PINS;

    fn read_dir(&self) -> u32 {
        self.bank.read_dir()
    }

    fn write_dir(&mut self, bits: u32) {
        self.bank.write_dir(bits);
    }

    fn read_out(&self) -> u32 {
        self.bank.read_out()
    }

    fn write_out(&mut self, bits: u32) {
        self.bank.write_out(bits);
    }

    fn read_in(&self) -> u32 {
        self.bank.read_in()
    }
}

impl Clock for GpioContext<'_> {
    fn now(&self) -> u32 {
        EmbassyClock.now()
    }

    fn frequency(&self) -> u32 {
        EmbassyClock.frequency()
    }
}

impl Drop for GpioContext<'_> {
    fn drop(&mut self) {
        self.bank.write_out(0);
        self.bank.write_dir(0);
        self.owner.busy.fetch_and(!(1 << self.id), Ordering::AcqRel);
    }
}
