//! Timed I/O: pulse measurement and generation, RC decay, edge counting and
//! same-context tone output. All durations are in I/O increments unless noted.

use super::pins::PinBank;
use super::timing::{millis_to_ticks, Clock};
use super::TimedIo;
use crate::error::Result;
use crate::signal::engine::Nco;
use crate::types::{Direction, Level, Pin};
use crate::{debug, trace};

impl<B: PinBank, C: Clock> TimedIo<B, C> {
    /// Spin until the masked input reaches `level` or `limit` ticks pass since `since`
    fn await_level(&self, mask: u32, level: Level, since: u32, limit: u32) -> bool {
        loop {
            if Level::from(self.port.bank().read_in() & mask != 0) == level {
                return true;
            }
            if self.clock.elapsed(since) >= limit {
                return false;
            }
            core::hint::spin_loop();
        }
    }

    /// Measure a pulse at `level` on an input pin
    ///
    /// A pulse already in progress when called is skipped. Waiting for the
    /// pulse to start and measuring it are each bounded by the timeout.
    ///
    /// Returns the pulse width in I/O increments, or `None` on timeout.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`](crate::error::Error::PinOutOfRange) if the bank has no such pin.
    pub fn pulse_in(&mut self, pin: Pin, level: Level) -> Result<Option<u32>> {
        let mask = self.port.mask(pin)?;
        self.port.set_direction(pin, Direction::Input)?;
        let limit = self.config.timeout_ticks();

        let called = self.clock.now();
        if !self.await_level(mask, !level, called, limit) || !self.await_level(mask, level, called, limit) {
            debug!("pulse_in {}: no pulse before timeout", pin);
            return Ok(None);
        }

        let start = self.clock.now();
        if !self.await_level(mask, !level, start, limit) {
            debug!("pulse_in {}: pulse longer than timeout", pin);
            return Ok(None);
        }
        let width = self.clock.elapsed(start);
        Ok(Some(self.config.ticks_to_io(width)))
    }

    /// Emit one pulse by inverting the pin's output bit for `duration`
    ///
    /// The pin is an output for the pulse; its previous direction and output
    /// bit are restored afterwards. An input pin with a low output bit gives a
    /// positive pulse.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`](crate::error::Error::PinOutOfRange) if the bank has no such pin.
    pub fn pulse_out(&mut self, pin: Pin, duration: u32) -> Result<()> {
        let mask = self.port.mask(pin)?;
        let bank = self.port.bank_mut();
        let dir = bank.read_dir();
        let out = bank.read_out();

        bank.write_out(out ^ mask);
        bank.write_dir(dir | mask);
        self.pause_ticks(self.config.io_to_ticks(duration));

        let bank = self.port.bank_mut();
        bank.write_out((bank.read_out() & !mask) | (out & mask));
        bank.write_dir((bank.read_dir() & !mask) | (dir & mask));
        Ok(())
    }

    /// Time how long an input stays at `level`, typically an RC circuit
    /// discharging after being charged by the caller
    ///
    /// Returns the decay time in I/O increments, or `None` if the pin is still
    /// at `level` after the timeout.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`](crate::error::Error::PinOutOfRange) if the bank has no such pin.
    pub fn rc_time(&mut self, pin: Pin, level: Level) -> Result<Option<u32>> {
        let mask = self.port.mask(pin)?;
        self.port.set_direction(pin, Direction::Input)?;
        let start = self.clock.now();
        if self.await_level(mask, !level, start, self.config.timeout_ticks()) {
            Ok(Some(self.config.ticks_to_io(self.clock.elapsed(start))))
        } else {
            debug!("rc_time {}: no decay before timeout", pin);
            Ok(None)
        }
    }

    /// Count low-to-high transitions on an input over `duration`
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`](crate::error::Error::PinOutOfRange) if the bank has no such pin.
    pub fn count(&mut self, pin: Pin, duration: u32) -> Result<u32> {
        let mask = self.port.mask(pin)?;
        self.port.set_direction(pin, Direction::Input)?;
        let window = self.config.io_to_ticks(duration);
        let start = self.clock.now();

        let mut edges = 0u32;
        let mut last = self.port.bank().read_in() & mask;
        while self.clock.elapsed(start) < window {
            let now = self.port.bank().read_in() & mask;
            if now != 0 && last == 0 {
                edges = edges.saturating_add(1);
            }
            last = now;
        }
        trace!("count {}: {} edges", pin, edges);
        Ok(edges)
    }

    /// Drive a square wave of `frequency` Hz on `pin` for `millis` ms
    ///
    /// Runs in this context and blocks for the duration. The pin's direction
    /// and output bit are restored afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`](crate::error::Error::PinOutOfRange) if the bank has no such pin,
    /// [`Error::InvalidFrequency`](crate::error::Error::InvalidFrequency) for zero or above
    /// half the clock rate.
    pub fn freqout(&mut self, pin: Pin, millis: u32, frequency: u32) -> Result<()> {
        let mask = self.port.mask(pin)?;
        let clock_hz = self.clock.frequency();
        let nco = Nco::new(frequency, clock_hz)?;
        let duration = millis_to_ticks(millis, clock_hz);

        let bank = self.port.bank_mut();
        let dir = bank.read_dir();
        let out = bank.read_out();
        bank.write_out(out & !mask);
        bank.write_dir(dir | mask);

        let start = self.clock.now();
        loop {
            let elapsed = self.clock.elapsed(start);
            if elapsed >= duration {
                break;
            }
            let high = nco.level(elapsed).is_high();
            let bank = self.port.bank_mut();
            let current = bank.read_out();
            let next = if high { current | mask } else { current & !mask };
            if next != current {
                bank.write_out(next);
            }
        }

        let bank = self.port.bank_mut();
        bank.write_out((bank.read_out() & !mask) | (out & mask));
        bank.write_dir((bank.read_dir() & !mask) | (dir & mask));
        Ok(())
    }
}
