//! I2C bus construction
//!
//! Buses are plain [`embedded_hal::i2c::I2c`] implementations, so the
//! read/write calls come from embedded-hal rather than from here.

use super::ensure_distinct;
use crate::error::{Error, Result};
use crate::types::Pin;
use crate::warn;

/// Clock and data pins of an I2C bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct I2cPins {
    /// Serial clock
    pub scl: Pin,
    /// Serial data
    pub sda: Pin,
}

impl I2cPins {
    /// Pair the pins
    ///
    /// # Errors
    ///
    /// [`Error::PinConflict`] if both are the same pin.
    pub fn new(scl: Pin, sda: Pin) -> Result<Self> {
        ensure_distinct(&[scl, sda])?;
        Ok(Self { scl, sda })
    }
}

/// Driver able to bring up an I2C bus on arbitrary pins
pub trait I2cBusFactory {
    /// Bus handle used for transfers
    type Bus: embedded_hal::i2c::I2c;

    /// Create a bus, or return a driver status code
    ///
    /// # Errors
    ///
    /// Non-zero driver status when the bus cannot be created.
    fn new_bus(&mut self, pins: I2cPins) -> core::result::Result<Self::Bus, i32>;
}

/// Set up an I2C bus on `scl`/`sda`
///
/// # Errors
///
/// [`Error::PinConflict`] if both are the same pin,
/// [`Error::Driver`] with the driver's status if it fails.
pub fn i2c_newbus<F: I2cBusFactory>(factory: &mut F, scl: Pin, sda: Pin) -> Result<F::Bus> {
    let pins = I2cPins::new(scl, sda)?;
    factory.new_bus(pins).map_err(|status| {
        warn!("i2c bus on {}/{} failed with status {}", scl, sda, status);
        Error::Driver(status)
    })
}
