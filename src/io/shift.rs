//! Synchronous serial shifting
//!
//! Bit-banged transfers against shift-register style peripherals. The clock
//! pin idles low and each bit costs one I/O increment high plus one low.

use super::pins::PinBank;
use super::timing::Clock;
use super::TimedIo;
use crate::error::{Error, Result};
use crate::types::{Direction, Level, Pin};

/// Bit order and sampling point for [`TimedIo::shift_in`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum ShiftInMode {
    /// Most significant bit first, sampled before the clock pulse
    MsbPre,
    /// Least significant bit first, sampled before the clock pulse
    LsbPre,
    /// Most significant bit first, sampled after the clock pulse
    MsbPost,
    /// Least significant bit first, sampled after the clock pulse
    LsbPost,
}

impl ShiftInMode {
    /// Mode from the classic numbering (0 = `MsbPre` .. 3 = `LsbPost`)
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::MsbPre),
            1 => Some(Self::LsbPre),
            2 => Some(Self::MsbPost),
            3 => Some(Self::LsbPost),
            _ => None,
        }
    }

    /// Bit order of the mode
    #[must_use]
    pub const fn order(self) -> BitOrder {
        match self {
            Self::MsbPre | Self::MsbPost => BitOrder::MsbFirst,
            Self::LsbPre | Self::LsbPost => BitOrder::LsbFirst,
        }
    }

    const fn samples_before_clock(self) -> bool {
        matches!(self, Self::MsbPre | Self::LsbPre)
    }
}

/// Bit order for [`TimedIo::shift_out`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum BitOrder {
    /// Bit 0 first
    LsbFirst,
    /// Bit `bits - 1` first
    MsbFirst,
}

impl BitOrder {
    /// Register position of transfer step `step` in a `bits`-wide word
    const fn position(self, step: u8, bits: u8) -> u8 {
        match self {
            Self::LsbFirst => step,
            Self::MsbFirst => bits - 1 - step,
        }
    }
}

const fn check_bits(bits: u8) -> Result<()> {
    if bits == 0 || bits > 32 {
        Err(Error::InvalidBitCount(bits))
    } else {
        Ok(())
    }
}

impl<B: PinBank, C: Clock> TimedIo<B, C> {
    fn check_pair(&self, data: Pin, clock: Pin) -> Result<()> {
        self.port.mask(data)?;
        self.port.mask(clock)?;
        if data == clock {
            return Err(Error::PinConflict(data.number()));
        }
        Ok(())
    }

    fn clock_pulse(&mut self, clock: Pin) -> Result<()> {
        let half = self.config.io_ticks();
        self.port.high(clock)?;
        self.pause_ticks(half);
        self.port.low(clock)?;
        self.pause_ticks(half);
        Ok(())
    }

    /// Clock `bits` bits in from `data`, pulsing `clock` once per bit
    ///
    /// The first bit received lands in the top position for MSB modes and in
    /// bit 0 for LSB modes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBitCount`] outside 1..=32, [`Error::PinConflict`] when
    /// `data` and `clock` are the same pin,
    /// [`Error::PinOutOfRange`] if the bank lacks either pin.
    pub fn shift_in(&mut self, data: Pin, clock: Pin, mode: ShiftInMode, bits: u8) -> Result<u32> {
        check_bits(bits)?;
        self.check_pair(data, clock)?;

        self.port.low(clock)?;
        self.port.set_direction(data, Direction::Input)?;

        let order = mode.order();
        let mut value = 0u32;
        for step in 0..bits {
            if mode.samples_before_clock() {
                let level = self.port.state(data)?;
                value |= level.bit() << order.position(step, bits);
                self.clock_pulse(clock)?;
            } else {
                self.clock_pulse(clock)?;
                let level = self.port.state(data)?;
                value |= level.bit() << order.position(step, bits);
            }
        }
        Ok(value)
    }

    /// Clock the low `bits` bits of `value` out on `data`
    ///
    /// Each bit is presented on `data` before its clock pulse, so receivers
    /// latching on the rising edge see a settled level. `data` is left driving
    /// the last bit sent.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBitCount`] outside 1..=32, [`Error::PinConflict`] when
    /// `data` and `clock` are the same pin,
    /// [`Error::PinOutOfRange`] if the bank lacks either pin.
    pub fn shift_out(&mut self, data: Pin, clock: Pin, order: BitOrder, bits: u8, value: u32) -> Result<()> {
        check_bits(bits)?;
        self.check_pair(data, clock)?;

        self.port.low(clock)?;
        for step in 0..bits {
            let level = Level::from_bit(value >> order.position(step, bits));
            self.port.drive(data, level)?;
            self.clock_pulse(clock)?;
        }
        Ok(())
    }
}
