//! Asynchronous serial drivers
//!
//! Simple (half-duplex, one or two wire) and full-duplex serial ports. The
//! driver returns a byte stream implementing [`embedded_io`] traits, so
//! formatted text goes through `core::fmt::Write` adapters or `write_fmt`.

use core::ops::BitOr;

use super::{check_status, ensure_distinct};
use crate::error::{Error, Result};
use crate::types::Pin;
use crate::{debug, warn};

/// Serial bit rate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct Baud(u32);

impl Baud {
    /// 9600 bit/s
    pub const B9600: Self = Self(9_600);
    /// 115200 bit/s
    pub const B115200: Self = Self(115_200);

    /// Create a baud rate
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBaud`] for zero.
    pub const fn new(bits_per_second: u32) -> Result<Self> {
        if bits_per_second == 0 {
            Err(Error::InvalidBaud(bits_per_second))
        } else {
            Ok(Self(bits_per_second))
        }
    }

    /// Bits per second
    #[must_use]
    pub const fn bits_per_second(self) -> u32 {
        self.0
    }

    /// Clock ticks per bit at `clock_hz`
    #[must_use]
    pub const fn ticks_per_bit(self, clock_hz: u32) -> u32 {
        clock_hz / self.0
    }
}

/// Full-duplex line options, combined with `|`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct FdserMode(u8);

impl FdserMode {
    /// Plain, non-inverted lines
    pub const NONE: Self = Self(0);
    /// Receive line is inverted
    pub const INVERT_RX: Self = Self(0b0001);
    /// Transmit line is inverted
    pub const INVERT_TX: Self = Self(0b0010);
    /// Transmit line is open drain/source
    pub const OPEN_DRAIN_TX: Self = Self(0b0100);
    /// Drop bytes received while transmitting (echo on shared lines)
    pub const IGNORE_TX_ECHO: Self = Self(0b1000);

    /// Mode from raw flag bits, unknown bits dropped
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// Raw flag bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if every flag of `other` is set
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FdserMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Everything a driver needs to open a port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct SerialConfig {
    /// Transmit pin, `None` for receive-only
    pub tx: Option<Pin>,
    /// Receive pin, `None` for transmit-only
    pub rx: Option<Pin>,
    /// Bit rate
    pub baud: Baud,
    /// Line options (full-duplex driver only)
    pub mode: FdserMode,
}

impl SerialConfig {
    /// Validate pin assignment
    ///
    /// # Errors
    ///
    /// [`Error::PinConflict`] if `tx` and `rx` are the same pin.
    pub fn new(tx: Option<Pin>, rx: Option<Pin>, baud: Baud, mode: FdserMode) -> Result<Self> {
        if let (Some(tx), Some(rx)) = (tx, rx) {
            ensure_distinct(&[tx, rx])?;
        }
        Ok(Self { tx, rx, baud, mode })
    }
}

/// Serial port driver
pub trait SerialDriver {
    /// Open port handle
    type Stream: embedded_io::Read + embedded_io::Write;

    /// Open a port, or return a driver status code
    ///
    /// # Errors
    ///
    /// Non-zero driver status when the port cannot be opened.
    fn open(&mut self, config: &SerialConfig) -> core::result::Result<Self::Stream, i32>;

    /// Close a port, returning 0 on success or a driver status code
    fn close(&mut self, stream: Self::Stream) -> i32;
}

fn open<D: SerialDriver>(driver: &mut D, config: &SerialConfig) -> Result<D::Stream> {
    debug!("serial open at {} baud", config.baud.bits_per_second());
    driver.open(config).map_err(|status| {
        warn!("serial open failed with status {}", status);
        Error::Driver(status)
    })
}

/// Simple serial port transmitting on `tx` and receiving on `rx`
///
/// # Errors
///
/// [`Error::PinConflict`] if both are the same pin,
/// [`Error::Driver`] with the driver's status if it fails.
pub fn sser_set_tx_rx<D: SerialDriver>(driver: &mut D, tx: Pin, rx: Pin, baud: Baud) -> Result<D::Stream> {
    open(driver, &SerialConfig::new(Some(tx), Some(rx), baud, FdserMode::NONE)?)
}

/// Transmit-only simple serial port
///
/// # Errors
///
/// [`Error::Driver`] with the driver's status if it fails.
pub fn sser_set_tx<D: SerialDriver>(driver: &mut D, tx: Pin, baud: Baud) -> Result<D::Stream> {
    open(driver, &SerialConfig::new(Some(tx), None, baud, FdserMode::NONE)?)
}

/// Receive-only simple serial port
///
/// # Errors
///
/// [`Error::Driver`] with the driver's status if it fails.
pub fn sser_set_rx<D: SerialDriver>(driver: &mut D, rx: Pin, baud: Baud) -> Result<D::Stream> {
    open(driver, &SerialConfig::new(None, Some(rx), baud, FdserMode::NONE)?)
}

/// Full-duplex serial port with line options
///
/// # Errors
///
/// [`Error::PinConflict`] if both are the same pin,
/// [`Error::Driver`] with the driver's status if it fails.
pub fn fdser_start<D: SerialDriver>(driver: &mut D, tx: Pin, rx: Pin, baud: Baud, mode: FdserMode) -> Result<D::Stream> {
    open(driver, &SerialConfig::new(Some(tx), Some(rx), baud, mode)?)
}

/// Close a port opened by any of the functions above
///
/// # Errors
///
/// [`Error::Driver`] with the driver's status if it fails.
pub fn close<D: SerialDriver>(driver: &mut D, stream: D::Stream) -> Result<()> {
    check_status(driver.close(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_flags_combine() {
        let mode = FdserMode::INVERT_RX | FdserMode::IGNORE_TX_ECHO;
        assert!(mode.contains(FdserMode::INVERT_RX));
        assert!(!mode.contains(FdserMode::INVERT_TX));
        assert_eq!(FdserMode::from_bits(0xFF).bits(), 0b1111);
    }

    #[test]
    fn zero_baud_rejected() {
        assert_eq!(Baud::new(0), Err(Error::InvalidBaud(0)));
        assert_eq!(Baud::B9600.ticks_per_bit(80_000_000), 8_333);
    }
}
