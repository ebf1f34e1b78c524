//! Shared types used across simpletools
//!
//! Pins are plain register bit numbers on the hardware; here they are
//! validated newtypes so that a bad number or an inverted range is caught when
//! it is built rather than when it corrupts a neighbouring bit.

use core::fmt;
use core::ops::Not;

use crate::config::MAX_PINS;
use crate::error::{Error, Result};

/// I/O pin identifier
///
/// A bit number in the pin registers, `0..MAX_PINS`. Banks narrower than
/// [`MAX_PINS`] check the pin again when it is used.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(u8);

impl Pin {
    /// Create a pin, returns None if the number exceeds the widest bank
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number < MAX_PINS {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Get the pin number
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Register mask with only this pin's bit set
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

impl TryFrom<u8> for Pin {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number).ok_or(Error::PinOutOfRange {
            pin: number,
            count: MAX_PINS,
        })
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin({})", self.0)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Pin {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "P{}", self.0);
    }
}

/// Logic level of a pin or output register bit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum Level {
    /// 0 V
    #[default]
    Low,
    /// Supply voltage
    High,
}

impl Level {
    /// Level from the lowest bit of a register value
    #[must_use]
    pub const fn from_bit(bit: u32) -> Self {
        if bit & 1 == 0 {
            Self::Low
        } else {
            Self::High
        }
    }

    /// 1 for high, 0 for low
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// The opposite level
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Check if high
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Check if low
    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl Not for Level {
    type Output = Self;

    fn not(self) -> Self {
        self.toggle()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Level {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(f, "LOW"),
            Self::High => defmt::write!(f, "HIGH"),
        }
    }
}

/// Pin direction as seen by one execution context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Pin connected to the input buffer only
    #[default]
    Input,
    /// Pin driven from the output register
    Output,
}

impl Direction {
    /// Direction from the lowest bit of a register value
    #[must_use]
    pub const fn from_bit(bit: u32) -> Self {
        if bit & 1 == 0 {
            Self::Input
        } else {
            Self::Output
        }
    }

    /// 1 for output, 0 for input
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Input => 0,
            Self::Output => 1,
        }
    }

    /// The opposite direction
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Input => defmt::write!(f, "IN"),
            Self::Output => defmt::write!(f, "OUT"),
        }
    }
}

/// Contiguous group of pins, `start..=end`
///
/// Batched reads and writes pack the group into a value with `start` at
/// bit 0, `start + 1` at bit 1 and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PinRange {
    start: Pin,
    end: Pin,
}

impl PinRange {
    /// Create a range, fails if `start` is above `end`
    ///
    /// # Errors
    ///
    /// [`Error::InvertedRange`] when `start > end`.
    pub const fn new(start: Pin, end: Pin) -> Result<Self> {
        if start.0 > end.0 {
            Err(Error::InvertedRange {
                start: start.0,
                end: end.0,
            })
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range from raw pin numbers
    ///
    /// # Errors
    ///
    /// [`Error::PinOutOfRange`] for a pin beyond the widest bank,
    /// [`Error::InvertedRange`] when `start > end`.
    pub fn from_numbers(start: u8, end: u8) -> Result<Self> {
        Self::new(Pin::try_from(start)?, Pin::try_from(end)?)
    }

    /// Lowest pin (bit 0 of packed values)
    #[must_use]
    pub const fn start(self) -> Pin {
        self.start
    }

    /// Highest pin
    #[must_use]
    pub const fn end(self) -> Pin {
        self.end
    }

    /// Number of pins in the range
    #[must_use]
    pub const fn width(self) -> u8 {
        self.end.0 - self.start.0 + 1
    }

    /// Mask of the range's bits, right-aligned (bit 0 = `start`)
    #[must_use]
    pub const fn value_mask(self) -> u32 {
        let width = self.width();
        if width >= 32 {
            u32::MAX
        } else {
            (1 << width) - 1
        }
    }

    /// Mask of the range's bits in register position
    #[must_use]
    pub const fn mask(self) -> u32 {
        self.value_mask() << self.start.0
    }

    /// Pull the range's bits out of a register value
    #[must_use]
    pub const fn extract(self, register: u32) -> u32 {
        (register & self.mask()) >> self.start.0
    }

    /// Replace the range's bits of a register value with `pattern`
    ///
    /// Bits of `pattern` above the range width are dropped.
    #[must_use]
    pub const fn insert(self, register: u32, pattern: u32) -> u32 {
        (register & !self.mask()) | ((pattern & self.value_mask()) << self.start.0)
    }

    /// Check if a pin belongs to the range
    #[must_use]
    pub const fn contains(self, pin: Pin) -> bool {
        pin.0 >= self.start.0 && pin.0 <= self.end.0
    }

    /// Iterate over the pins, lowest first
    pub fn pins(self) -> impl Iterator<Item = Pin> {
        (self.start.0..=self.end.0).map(Pin)
    }
}

impl fmt::Display for PinRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}..=P{}", self.start.0, self.end.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PinRange {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "P{}..=P{}", self.start.0, self.end.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_range_masks_everything() {
        let range = PinRange::from_numbers(0, 31).unwrap();
        assert_eq!(range.width(), 32);
        assert_eq!(range.mask(), u32::MAX);
        assert_eq!(range.extract(0xDEAD_BEEF), 0xDEAD_BEEF);
    }

    #[test]
    fn insert_keeps_neighbours() {
        let range = PinRange::from_numbers(4, 7).unwrap();
        assert_eq!(range.insert(0xFFFF_FFFF, 0), 0xFFFF_FF0F);
        assert_eq!(range.insert(0, 0xFF), 0x0000_00F0);
    }

    #[test]
    fn level_round_trips_bits() {
        assert_eq!(Level::from_bit(Level::High.bit()), Level::High);
        assert_eq!(!Level::Low, Level::High);
        assert_eq!(Direction::Input.reverse(), Direction::Output);
    }
}
