//! simpletools
//!
//! A convenience layer over a microcontroller's I/O pins, system clock and
//! peripheral drivers, in the spirit of the "simple tools" libraries used to teach
//! embedded programming: one call to drive a pin high, measure a pulse, start a PWM
//! signal or mount an SD card.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     APPLICATION / DEMOS                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │   PIN & TIMED-I/O FACADE      │   BACKGROUND SIGNAL GENERATORS│
//! │   io::Port  io::TimedIo       │   signal::{Pwm, SquareWave,   │
//! │   pulse / rc / count / shift  │            Dac} + workers     │
//! ├─────────────────────────────────────────────────────────────┤
//! │         REGISTER SEAMS: PinBank  Clock  Launch               │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │   hal (STM32G474, embassy)   │   sim (host, multi-context)   │
//! └──────────────────────────────┴──────────────────────────────┘
//!   drivers: SD / I2C / serial / WAV seams (implemented elsewhere)
//! ```
//!
//! # Design Principles
//!
//! - **Explicit timing state**: time increments, timeout and mark live in a
//!   [`io::TimedIo`] value instead of process-wide globals
//! - **Owned generator handles**: a running PWM, square wave or D/A signal is a
//!   handle; a second start of the same family is an error, not undefined behavior
//! - **Typed pins**: [`types::Pin`] and [`types::PinRange`] are validated, so bad
//!   ranges are reported instead of silently corrupting neighbouring bits
//! - **No signal is not a fault**: timed reads return `None` on timeout

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(all(feature = "std", feature = "embedded"))]
compile_error!("Features `std` and `embedded` are mutually exclusive; build the target with --no-default-features --features embedded");

#[cfg(feature = "embedded")]
#[allow(unused_imports)]
pub(crate) use defmt::{debug, error, info, trace, warn};
#[cfg(feature = "std")]
#[allow(unused_imports)]
pub(crate) use log::{debug, error, info, trace, warn};

// Bare no_std build without a logger: arguments are type-checked, nothing is emitted
#[cfg(not(any(feature = "std", feature = "embedded")))]
mod quiet {
    macro_rules! quiet {
        ($($arg:tt)*) => {{
            let _ = core::format_args!($($arg)*);
        }};
    }
    pub(crate) use quiet as debug;
    pub(crate) use quiet as error;
    pub(crate) use quiet as info;
    pub(crate) use quiet as trace;
    pub(crate) use quiet as warn;
}
#[cfg(not(any(feature = "std", feature = "embedded")))]
#[allow(unused_imports)]
pub(crate) use quiet::{debug, error, info, trace, warn};

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// System configuration and constants
pub mod config;

/// Error type shared by every fallible operation
pub mod error;

/// Shared types: pins, ranges, levels, directions
pub mod types;

/// Pin & Timed-I/O Facade
///
/// Register-level pin access, pause/mark/wait timing and timed I/O helpers.
pub mod io;

/// Background Signal Generators
///
/// PWM, square wave and duty-modulation D/A running in another execution context.
pub mod signal;

/// External Driver Seams
///
/// SD card, I2C bus, serial and WAV playback collaborators.
pub mod drivers;

/// Number formatting helpers
pub mod text;

/// Hardware Abstraction Layer
///
/// STM32G474 implementations of the register seams.
#[cfg(feature = "embedded")]
pub mod hal;

/// Simulated board for host testing
#[cfg(feature = "std")]
pub mod sim;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::error::{Error, Result};
    pub use crate::io::pins::{PinBank, Port};
    pub use crate::io::shift::{BitOrder, ShiftInMode};
    pub use crate::io::timing::{Clock, TimingConfig};
    pub use crate::io::TimedIo;
    pub use crate::signal::{Channel, Dac, Launch, Pwm, SquareWave};
    pub use crate::types::{Direction, Level, Pin, PinRange};
}
