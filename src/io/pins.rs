//! Pin Register Access
//!
//! [`PinBank`] is the seam to the hardware: one execution context's direction
//! and output registers plus the shared input register. [`Port`] layers the
//! single-pin and batched convenience operations on top of it.

use crate::error::{Error, Result};
use crate::types::{Direction, Level, Pin, PinRange};

/// Pin registers as seen by one execution context
///
/// Bit `n` of each register belongs to pin `n`. Direction and output registers
/// are private to the context; the input register reports the physical level
/// of every pin, whoever drives it.
pub trait PinBank {
    /// Number of pins in the bank (at most 32)
    const PIN_COUNT: u8;

    /// Read the direction register (1 = output)
    fn read_dir(&self) -> u32;

    /// Write the direction register
    fn write_dir(&mut self, bits: u32);

    /// Read the output register
    fn read_out(&self) -> u32;

    /// Write the output register
    fn write_out(&mut self, bits: u32);

    /// Read the physical pin levels
    fn read_in(&self) -> u32;
}

impl<B: PinBank + ?Sized> PinBank for &mut B {
    const PIN_COUNT: u8 = B::PIN_COUNT;

    fn read_dir(&self) -> u32 {
        (**self).read_dir()
    }

    fn write_dir(&mut self, bits: u32) {
        (**self).write_dir(bits);
    }

    fn read_out(&self) -> u32 {
        (**self).read_out()
    }

    fn write_out(&mut self, bits: u32) {
        (**self).write_out(bits);
    }

    fn read_in(&self) -> u32 {
        (**self).read_in()
    }
}

/// Pin-level convenience operations over a [`PinBank`]
pub struct Port<B> {
    bank: B,
}

impl<B: PinBank> Port<B> {
    /// Wrap a pin bank
    #[must_use]
    pub const fn new(bank: B) -> Self {
        Self { bank }
    }

    /// Borrow the underlying bank
    #[must_use]
    pub const fn bank(&self) -> &B {
        &self.bank
    }

    /// Mutably borrow the underlying bank
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Give back the underlying bank
    pub fn into_inner(self) -> B {
        self.bank
    }

    /// Register mask for `pin`, checked against the bank width
    pub(crate) fn mask(&self, pin: Pin) -> Result<u32> {
        if pin.number() < B::PIN_COUNT {
            Ok(pin.mask())
        } else {
            Err(Error::PinOutOfRange {
                pin: pin.number(),
                count: B::PIN_COUNT,
            })
        }
    }

    fn check_range(&self, range: PinRange) -> Result<()> {
        self.mask(range.end()).map(|_| ())
    }

    /// Set a pin's direction
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn set_direction(&mut self, pin: Pin, direction: Direction) -> Result<()> {
        let mask = self.mask(pin)?;
        let dir = self.bank.read_dir();
        self.bank.write_dir(match direction {
            Direction::Output => dir | mask,
            Direction::Input => dir & !mask,
        });
        Ok(())
    }

    /// Get a pin's direction as seen by this context
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn direction(&self, pin: Pin) -> Result<Direction> {
        let mask = self.mask(pin)?;
        Ok(Direction::from_bit(u32::from(self.bank.read_dir() & mask != 0)))
    }

    /// Set a pin's output register bit without touching its direction
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn set_output(&mut self, pin: Pin, level: Level) -> Result<()> {
        let mask = self.mask(pin)?;
        let out = self.bank.read_out();
        self.bank.write_out(match level {
            Level::High => out | mask,
            Level::Low => out & !mask,
        });
        Ok(())
    }

    /// Get a pin's output register bit
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn output(&self, pin: Pin) -> Result<Level> {
        let mask = self.mask(pin)?;
        Ok(Level::from(self.bank.read_out() & mask != 0))
    }

    /// Drive a pin high
    ///
    /// The output bit is written before the direction so the pin never
    /// glitches to a stale level.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn high(&mut self, pin: Pin) -> Result<()> {
        self.drive(pin, Level::High)
    }

    /// Drive a pin low
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn low(&mut self, pin: Pin) -> Result<()> {
        self.drive(pin, Level::Low)
    }

    /// Set the output bit, then make the pin an output
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn drive(&mut self, pin: Pin, level: Level) -> Result<()> {
        self.set_output(pin, level)?;
        self.set_direction(pin, Direction::Output)
    }

    /// Flip a pin's output bit and return the new level
    ///
    /// Has no visible effect unless the pin is already an output.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn toggle(&mut self, pin: Pin) -> Result<Level> {
        let mask = self.mask(pin)?;
        let out = self.bank.read_out() ^ mask;
        self.bank.write_out(out);
        Ok(Level::from(out & mask != 0))
    }

    /// Make a pin an input and sample it
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn input(&mut self, pin: Pin) -> Result<Level> {
        self.set_direction(pin, Direction::Input)?;
        self.state(pin)
    }

    /// Flip a pin's direction and return the new one
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn reverse(&mut self, pin: Pin) -> Result<Direction> {
        let direction = self.direction(pin)?.reverse();
        self.set_direction(pin, direction)?;
        Ok(direction)
    }

    /// Sample a pin without changing its direction
    ///
    /// On an output this reports the level being driven, which makes it
    /// usable to watch a pin another context is driving.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the bank has no such pin.
    pub fn state(&self, pin: Pin) -> Result<Level> {
        let mask = self.mask(pin)?;
        Ok(Level::from(self.bank.read_in() & mask != 0))
    }

    /// Sample a group of pins
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the range extends past the bank.
    pub fn states(&self, range: PinRange) -> Result<u32> {
        self.check_range(range)?;
        Ok(range.extract(self.bank.read_in()))
    }

    /// Drive a group of pins: output bits from `pattern`, all set to output
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the range extends past the bank.
    pub fn set_states(&mut self, range: PinRange, pattern: u32) -> Result<()> {
        self.set_outputs(range, pattern)?;
        self.set_directions(range, u32::MAX)
    }

    /// Get a group of direction bits
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the range extends past the bank.
    pub fn directions(&self, range: PinRange) -> Result<u32> {
        self.check_range(range)?;
        Ok(range.extract(self.bank.read_dir()))
    }

    /// Set a group of direction bits
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the range extends past the bank.
    pub fn set_directions(&mut self, range: PinRange, pattern: u32) -> Result<()> {
        self.check_range(range)?;
        let dir = self.bank.read_dir();
        self.bank.write_dir(range.insert(dir, pattern));
        Ok(())
    }

    /// Get a group of output register bits
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the range extends past the bank.
    pub fn outputs(&self, range: PinRange) -> Result<u32> {
        self.check_range(range)?;
        Ok(range.extract(self.bank.read_out()))
    }

    /// Set a group of output register bits
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the range extends past the bank.
    pub fn set_outputs(&mut self, range: PinRange, pattern: u32) -> Result<()> {
        self.check_range(range)?;
        let out = self.bank.read_out();
        self.bank.write_out(range.insert(out, pattern));
        Ok(())
    }

    /// Return every pin this context drives to input, outputs cleared
    pub fn release_all(&mut self) {
        self.bank.write_dir(0);
        self.bank.write_out(0);
    }
}
