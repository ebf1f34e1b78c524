//! Two-channel PWM with a shared cycle

use super::{start, Channel, Family, Handle, Launch, SignalControl, Worker, PWM};
use crate::config::MAX_PWM_MICROS;
use crate::error::{Error, Result};
use crate::types::Pin;

/// Running PWM generator
///
/// Both channels share the cycle set at start and stay in phase; each has its
/// own pin and high time. Dropping the handle stops the generator.
pub struct Pwm<'a> {
    handle: Handle<'a>,
    cycle_us: u32,
}

impl<'a> Pwm<'a> {
    /// Start PWM with a cycle of `cycle_us` microseconds
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCycle`] for zero or above [`MAX_PWM_MICROS`],
    /// [`Error::AlreadyRunning`] if PWM is already running,
    /// [`Error::NoFreeContext`] if no context is free.
    pub fn start<L: Launch>(launcher: &'a L, cycle_us: u32) -> Result<(Self, Worker<'a, L::Context<'a>>)> {
        Self::start_with(&PWM, launcher, cycle_us)
    }

    /// Start PWM on a caller-provided control block
    ///
    /// # Errors
    ///
    /// As [`start`](Self::start).
    pub fn start_with<L: Launch>(
        control: &'a SignalControl,
        launcher: &'a L,
        cycle_us: u32,
    ) -> Result<(Self, Worker<'a, L::Context<'a>>)> {
        if cycle_us == 0 || cycle_us > MAX_PWM_MICROS {
            return Err(Error::InvalidCycle(cycle_us));
        }
        let worker = start(control, launcher, Family::Pwm, cycle_us)?;
        let handle = Handle::new(control, &worker);
        Ok((Self { handle, cycle_us }, worker))
    }

    /// Drive `pin` high for `high_us` of every cycle on `channel`
    ///
    /// High times longer than the cycle keep the pin high. Moving a channel to
    /// another pin returns the previous pin to input.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] if the context's bank has no such pin.
    pub fn set(&mut self, channel: Channel, pin: Pin, high_us: u32) -> Result<()> {
        self.handle.set(channel, pin, high_us.min(self.cycle_us))
    }

    /// Stop driving `channel`, its pin goes back to input
    pub fn release(&mut self, channel: Channel) {
        self.handle.release(channel);
    }

    /// Cycle length in microseconds
    #[must_use]
    pub const fn cycle_us(&self) -> u32 {
        self.cycle_us
    }

    /// Check if the worker is still generating
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Stop the generator
    ///
    /// The family can be started again at once; the worker releases its pins
    /// and context on its next pass.
    pub fn stop(self) {}
}
