//! External Driver Seams
//!
//! The SD card, I2C, serial and WAV drivers live outside this crate. Each is
//! reached through a trait; the functions here validate pins and arguments
//! and turn the drivers' integer status codes into [`Error::Driver`].

pub mod i2c;
pub mod sd;
pub mod serial;
pub mod wav;

use crate::error::{Error, Result};
use crate::types::Pin;

/// Reject pin lists that name the same pin twice
pub(crate) fn ensure_distinct(pins: &[Pin]) -> Result<()> {
    for (i, pin) in pins.iter().enumerate() {
        if pins[i + 1..].contains(pin) {
            return Err(Error::PinConflict(pin.number()));
        }
    }
    Ok(())
}

/// Map a driver status (0 = success) to a result
pub(crate) fn check_status(status: i32) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(Error::Driver(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pin_is_reported() {
        let pins = [Pin::new(1).unwrap(), Pin::new(2).unwrap(), Pin::new(1).unwrap()];
        assert_eq!(ensure_distinct(&pins), Err(Error::PinConflict(1)));
        assert_eq!(ensure_distinct(&pins[..2]), Ok(()));
    }
}
