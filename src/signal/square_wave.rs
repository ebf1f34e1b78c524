//! Two-channel square wave generator

use super::{start, Channel, Family, Handle, Launch, SignalControl, Worker, SQUARE_WAVE};
use crate::error::{Error, Result};
use crate::types::Pin;

/// Running square wave generator, 50% duty on each channel
pub struct SquareWave<'a> {
    handle: Handle<'a>,
    max_frequency: u32,
}

impl<'a> SquareWave<'a> {
    /// Start the square wave generator with both channels idle
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] if it is already running,
    /// [`Error::NoFreeContext`] if no context is free.
    pub fn start<L: Launch>(launcher: &'a L) -> Result<(Self, Worker<'a, L::Context<'a>>)> {
        Self::start_with(&SQUARE_WAVE, launcher)
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
        let worker = start(control, launcher, Family::SquareWave, 0)?;
        let handle = Handle::new(control, &worker);
        let max_frequency = worker.frequency() / 2;
        Ok((Self { handle, max_frequency }, worker))
    }

    /// Output `frequency` Hz on `pin` from `channel`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrequency`] for zero or above half the clock rate,
    /// [`Error::PinOutOfRange`] if the context's bank has no such pin.
    pub fn set(&mut self, channel: Channel, pin: Pin, frequency: u32) -> Result<()> {
        if frequency == 0 || frequency > self.max_frequency {
            return Err(Error::InvalidFrequency(frequency));
        }
        self.handle.set(channel, pin, frequency)
    }

    /// Stop `channel`, its pin goes back to input
    pub fn release(&mut self, channel: Channel) {
        self.handle.release(channel);
    }

    /// Highest frequency the launched context can produce
    #[must_use]
    pub const fn max_frequency(&self) -> u32 {
        self.max_frequency
    }

    /// Check if the worker is still generating
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Stop the generator, as [`Pwm::stop`](super::Pwm::stop)
    pub fn stop(self) {}
}
