//! System clock over the embassy time driver

use embassy_time::{Instant, TICK_HZ};

use crate::io::timing::Clock;

/// Tick counter of the embassy time driver
///
/// The 64-bit instant is truncated to 32 bits; interval arithmetic wraps.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> u32 {
        Instant::now().as_ticks() as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn frequency(&self) -> u32 {
        TICK_HZ as u32
    }
}
