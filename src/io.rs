//! Pin & Timed-I/O Facade
//!
//! [`TimedIo`] bundles a pin bank, a clock and the timing state that the
//! register-level API kept in globals (pause increment, I/O increment, timeout
//! and the `mark` reference). Pin-only operations are reachable through
//! [`TimedIo::pins`] / [`TimedIo::pins_mut`].

pub mod pins;
pub mod shared;
pub mod shift;
pub mod timing;

mod timed;

use pins::{PinBank, Port};
use timing::{spin_until, Clock, TimingConfig};

/// Pins, clock and timing state of one execution context
pub struct TimedIo<B, C> {
    port: Port<B>,
    clock: C,
    config: TimingConfig,
    mark: u32,
}

impl<B: PinBank, C: Clock> TimedIo<B, C> {
    /// Create with default increments for the clock's frequency
    pub fn new(bank: B, clock: C) -> Self {
        let config = TimingConfig::for_clock(clock.frequency());
        Self::with_config(bank, clock, config)
    }

    /// Create with explicit increments
    pub fn with_config(bank: B, clock: C, config: TimingConfig) -> Self {
        let mark = clock.now();
        Self {
            port: Port::new(bank),
            clock,
            config,
            mark,
        }
    }

    /// Pin operations
    pub const fn pins(&self) -> &Port<B> {
        &self.port
    }

    /// Mutable pin operations
    pub fn pins_mut(&mut self) -> &mut Port<B> {
        &mut self.port
    }

    /// The clock
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Current time increments
    pub const fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Change the `pause` unit in ticks
    pub fn set_pause_dt(&mut self, ticks: u32) {
        self.config.set_pause_dt(ticks);
    }

    /// Change the timed-I/O unit in ticks
    pub fn set_io_dt(&mut self, ticks: u32) {
        self.config.set_io_dt(ticks);
    }

    /// Change the timed-I/O timeout in ticks
    pub fn set_io_timeout(&mut self, ticks: u32) {
        self.config.set_io_timeout(ticks);
    }

    /// Busy-wait `count` pause units (1 ms by default)
    pub fn pause(&self, count: u32) {
        self.pause_ticks(self.config.pause_to_ticks(count));
    }

    /// Busy-wait a number of raw clock ticks
    pub fn pause_ticks(&self, ticks: u32) {
        spin_until(&self.clock, self.clock.now(), ticks);
    }

    /// Record the current time as the reference for `timeout` and `wait`
    pub fn mark(&mut self) {
        self.mark = self.clock.now();
    }

    /// Check if `count` I/O units have passed since the last `mark`
    pub fn timeout(&self, count: u32) -> bool {
        self.clock.elapsed(self.mark) >= self.config.io_to_ticks(count)
    }

    /// Wait until `count` I/O units after the last `mark`, then advance the mark
    ///
    /// The mark moves by exactly `count` units, so a loop of `wait` calls keeps
    /// a fixed period regardless of the work done between them.
    pub fn wait(&mut self, count: u32) {
        let ticks = self.config.io_to_ticks(count);
        spin_until(&self.clock, self.mark, ticks);
        self.mark = self.mark.wrapping_add(ticks);
    }

    /// Split back into the pin bank and clock
    pub fn into_parts(self) -> (B, C) {
        (self.port.into_inner(), self.clock)
    }
}
