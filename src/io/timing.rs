//! Clock Access and Time Increments
//!
//! Everything timed is measured in ticks of a free-running 32-bit counter that
//! wraps. Intervals are computed with `wrapping_sub`, so any interval shorter
//! than 2^31 ticks is measured correctly across a wrap (about 26 s at 80 MHz).

use crate::config::{IO_INCREMENTS_PER_SECOND, PAUSE_INCREMENTS_PER_SECOND, SYSTEM_CLOCK_HZ, TIMEOUT_DIVISOR};

/// Free-running system tick counter
pub trait Clock {
    /// Current tick count, wraps at `u32::MAX`
    fn now(&self) -> u32;

    /// Ticks per second
    fn frequency(&self) -> u32;

    /// Ticks elapsed since `since`
    fn elapsed(&self, since: u32) -> u32 {
        self.now().wrapping_sub(since)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u32 {
        (**self).now()
    }

    fn frequency(&self) -> u32 {
        (**self).frequency()
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&self) -> u32 {
        (**self).now()
    }

    fn frequency(&self) -> u32 {
        (**self).frequency()
    }
}

/// Spin until `ticks` have elapsed since `start`
pub fn spin_until<C: Clock + ?Sized>(clock: &C, start: u32, ticks: u32) {
    while clock.elapsed(start) < ticks {
        core::hint::spin_loop();
    }
}

/// Convert microseconds to ticks at `frequency`, saturating
#[must_use]
pub fn micros_to_ticks(micros: u32, frequency: u32) -> u32 {
    let ticks = u64::from(micros) * u64::from(frequency) / 1_000_000;
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Convert milliseconds to ticks at `frequency`, saturating
#[must_use]
pub fn millis_to_ticks(millis: u32, frequency: u32) -> u32 {
    let ticks = u64::from(millis) * u64::from(frequency) / 1_000;
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Time increments used by `pause` and the timed I/O helpers
///
/// All three values are in clock ticks and are never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct TimingConfig {
    pause_ticks: u32,
    io_ticks: u32,
    timeout_ticks: u32,
}

impl TimingConfig {
    /// Defaults for a clock: 1 ms pause, 1 µs I/O increment, 1/4 s timeout
    #[must_use]
    pub const fn for_clock(frequency: u32) -> Self {
        Self {
            pause_ticks: at_least_one(frequency / PAUSE_INCREMENTS_PER_SECOND),
            io_ticks: at_least_one(frequency / IO_INCREMENTS_PER_SECOND),
            timeout_ticks: at_least_one(frequency / TIMEOUT_DIVISOR),
        }
    }

    /// Ticks per `pause` unit
    #[must_use]
    pub const fn pause_ticks(&self) -> u32 {
        self.pause_ticks
    }

    /// Ticks per timed-I/O unit
    #[must_use]
    pub const fn io_ticks(&self) -> u32 {
        self.io_ticks
    }

    /// Timed-I/O timeout in ticks
    #[must_use]
    pub const fn timeout_ticks(&self) -> u32 {
        self.timeout_ticks
    }

    /// Change the `pause` unit (zero is raised to one tick)
    pub fn set_pause_dt(&mut self, ticks: u32) {
        self.pause_ticks = at_least_one(ticks);
    }

    /// Change the timed-I/O unit (zero is raised to one tick)
    pub fn set_io_dt(&mut self, ticks: u32) {
        self.io_ticks = at_least_one(ticks);
    }

    /// Change the timed-I/O timeout (zero is raised to one tick)
    pub fn set_io_timeout(&mut self, ticks: u32) {
        self.timeout_ticks = at_least_one(ticks);
    }

    /// `count` pause units in ticks, saturating
    #[must_use]
    pub const fn pause_to_ticks(&self, count: u32) -> u32 {
        count.saturating_mul(self.pause_ticks)
    }

    /// `count` I/O units in ticks, saturating
    #[must_use]
    pub const fn io_to_ticks(&self, count: u32) -> u32 {
        count.saturating_mul(self.io_ticks)
    }

    /// Ticks expressed in whole I/O units
    #[must_use]
    pub const fn ticks_to_io(&self, ticks: u32) -> u32 {
        ticks / self.io_ticks
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::for_clock(SYSTEM_CLOCK_HZ)
    }
}

const fn at_least_one(ticks: u32) -> u32 {
    if ticks == 0 {
        1
    } else {
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_clock_defaults() {
        let config = TimingConfig::default();
        assert_eq!(config.pause_ticks(), 80_000);
        assert_eq!(config.io_ticks(), 80);
        assert_eq!(config.timeout_ticks(), 20_000_000);
    }

    #[test]
    fn slow_clock_never_yields_zero_increments() {
        let config = TimingConfig::for_clock(1_000);
        assert_eq!(config.io_ticks(), 1);
        assert_eq!(config.pause_ticks(), 1);
    }

    #[test]
    fn tick_conversions_saturate() {
        assert_eq!(micros_to_ticks(u32::MAX, SYSTEM_CLOCK_HZ), u32::MAX);
        assert_eq!(micros_to_ticks(1_000, 1_000_000), 1_000);
        assert_eq!(millis_to_ticks(3, 80_000_000), 240_000);
    }
}
