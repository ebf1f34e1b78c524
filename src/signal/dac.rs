//! Duty-modulation D/A converter
//!
//! Feed the pin through an RC low pass filter to get a voltage of
//! `value / 2^bits` of the supply.

use super::engine::{check_resolution, DutyAccumulator};
use super::{start, Channel, Family, Handle, Launch, SignalControl, Worker, DAC};
use crate::config::{DEFAULT_DAC_BITS, SUPPLY_VOLTS};
use crate::error::Result;
use crate::types::Pin;

/// Running two-channel D/A generator
pub struct Dac<'a> {
    handle: Handle<'a>,
}

impl<'a> Dac<'a> {
    /// Start the D/A generator at the default 8-bit resolution
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`](crate::error::Error::AlreadyRunning) if it is already running,
    /// [`Error::NoFreeContext`](crate::error::Error::NoFreeContext) if no context is free.
    pub fn start<L: Launch>(launcher: &'a L) -> Result<(Self, Worker<'a, L::Context<'a>>)> {
        Self::start_with(&DAC, launcher)
    }

    /// Start on a caller-provided control block
    ///
    /// # Errors
    ///
    /// As [`start`](Self::start).
    pub fn start_with<L: Launch>(
        control: &'a SignalControl,
        launcher: &'a L,
    ) -> Result<(Self, Worker<'a, L::Context<'a>>)> {
        let worker = start(control, launcher, Family::Dac, u32::from(DEFAULT_DAC_BITS))?;
        let handle = Handle::new(control, &worker);
        Ok((Self { handle }, worker))
    }

    /// Output `value / 2^bits` of the supply on `pin` from `channel`
    ///
    /// # Errors
    ///
    /// [`Error::DacValueOutOfRange`](crate::error::Error::DacValueOutOfRange) if `value`
    /// does not fit the resolution,
    /// [`Error::PinOutOfRange`](crate::error::Error::PinOutOfRange) if the context's bank
    /// has no such pin.
    pub fn set(&mut self, channel: Channel, pin: Pin, value: u32) -> Result<()> {
        DutyAccumulator::new(value, self.resolution())?;
        self.handle.set(channel, pin, value)
    }

    /// Output the value closest to `volts` on `pin` from `channel`
    ///
    /// # Errors
    ///
    /// As [`set`](Self::set).
    pub fn set_volts(&mut self, channel: Channel, pin: Pin, volts: f32) -> Result<()> {
        let value = DutyAccumulator::value_for(volts, self.resolution(), SUPPLY_VOLTS);
        self.set(channel, pin, value)
    }

    /// Change the resolution of both channels
    ///
    /// Values already set are reinterpreted at the new resolution, keeping
    /// only their low `bits` bits.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidResolution`](crate::error::Error::InvalidResolution) outside 1..=31.
    pub fn set_resolution(&mut self, bits: u8) -> Result<()> {
        let bits = check_resolution(bits)?;
        self.handle.set_param(u32::from(bits));
        Ok(())
    }

    /// Current resolution in bits
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn resolution(&self) -> u8 {
        self.handle.param() as u8
    }

    /// Stop `channel`, its pin goes back to input
    pub fn release(&mut self, channel: Channel) {
        self.handle.release(channel);
    }

    /// Check if the worker is still generating
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Stop the generator, as [`Pwm::stop`](super::Pwm::stop)
    pub fn stop(self) {}
}
