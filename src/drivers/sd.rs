//! SD card mounting over the minimal 4-wire SPI interface

use super::{check_status, ensure_distinct};
use crate::error::Result;
use crate::types::Pin;
use crate::{error, info};

/// Pins of a 4-wire SD card connection, all distinct
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct SdPins {
    /// Card data out (MISO)
    pub data_out: Pin,
    /// SPI clock
    pub clock: Pin,
    /// Card data in (MOSI)
    pub data_in: Pin,
    /// Chip select
    pub chip_select: Pin,
}

impl SdPins {
    /// Group the four pins
    ///
    /// # Errors
    ///
    /// [`Error::PinConflict`](crate::error::Error::PinConflict) if a pin is used twice.
    pub fn new(data_out: Pin, clock: Pin, data_in: Pin, chip_select: Pin) -> Result<Self> {
        ensure_distinct(&[data_out, clock, data_in, chip_select])?;
        Ok(Self {
            data_out,
            clock,
            data_in,
            chip_select,
        })
    }
}

/// SD card and filesystem driver
pub trait SdDriver {
    /// Mount the card, returning 0 on success or a driver status code
    fn mount(&mut self, pins: &SdPins) -> i32;
}

/// Mount an SD card
///
/// # Errors
///
/// [`Error::PinConflict`](crate::error::Error::PinConflict) if a pin is used twice,
/// [`Error::Driver`](crate::error::Error::Driver) with the driver's status otherwise.
pub fn sd_mount<D: SdDriver>(driver: &mut D, data_out: Pin, clock: Pin, data_in: Pin, chip_select: Pin) -> Result<()> {
    let pins = SdPins::new(data_out, clock, data_in, chip_select)?;
    let status = driver.mount(&pins);
    if status == 0 {
        info!("sd card mounted");
    } else {
        error!("sd mount failed with status {}", status);
    }
    check_status(status)
}
