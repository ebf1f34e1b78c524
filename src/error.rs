//! Error types
//!
//! Caller mistakes that the register-level API used to leave undefined (a pin
//! outside the bank, an inverted range, a second start of a running generator)
//! are reported here. Timeouts of timed reads are *not* errors; those return
//! `None`.

use core::fmt;

/// Result type for simpletools operations
pub type Result<T> = core::result::Result<T, Error>;

/// simpletools errors
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Pin number does not exist on the bank in use
    PinOutOfRange {
        /// Requested pin
        pin: u8,
        /// Pins available on the bank
        count: u8,
    },
    /// Range given with its start above its end
    InvertedRange {
        /// Lowest pin requested
        start: u8,
        /// Highest pin requested
        end: u8,
    },
    /// The same pin was given for two roles of one driver
    PinConflict(u8),
    /// Shift transfers move 1 to 32 bits
    InvalidBitCount(u8),
    /// Frequency of zero or above half the clock rate
    InvalidFrequency(u32),
    /// PWM cycle of zero or too long for a channel slot
    InvalidCycle(u32),
    /// D/A resolution outside 1..=31 bits
    InvalidResolution(u8),
    /// D/A value does not fit the configured resolution
    DacValueOutOfRange {
        /// Requested value
        value: u32,
        /// Resolution in bits
        bits: u8,
    },
    /// Number base outside 2..=36
    InvalidBase(u32),
    /// Baud rate of zero
    InvalidBaud(u32),
    /// WAV volume above the player maximum
    InvalidVolume(u8),
    /// Generator of this family is already running
    AlreadyRunning,
    /// Every execution context is in use
    NoFreeContext,
    /// External driver reported a non-zero status
    Driver(i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinOutOfRange { pin, count } => {
                write!(f, "pin {pin} out of range (bank has {count} pins)")
            }
            Self::InvertedRange { start, end } => {
                write!(f, "pin range start {start} is above end {end}")
            }
            Self::PinConflict(pin) => write!(f, "pin {pin} assigned twice"),
            Self::InvalidBitCount(bits) => write!(f, "invalid bit count {bits}"),
            Self::InvalidFrequency(hz) => write!(f, "invalid frequency {hz} Hz"),
            Self::InvalidCycle(us) => write!(f, "invalid PWM cycle {us} us"),
            Self::InvalidResolution(bits) => write!(f, "invalid D/A resolution {bits} bits"),
            Self::DacValueOutOfRange { value, bits } => {
                write!(f, "D/A value {value} does not fit {bits} bits")
            }
            Self::InvalidBase(base) => write!(f, "invalid number base {base}"),
            Self::InvalidBaud(baud) => write!(f, "invalid baud rate {baud}"),
            Self::InvalidVolume(volume) => write!(f, "invalid volume {volume}"),
            Self::AlreadyRunning => write!(f, "generator already running"),
            Self::NoFreeContext => write!(f, "no free execution context"),
            Self::Driver(code) => write!(f, "driver failed with status {code}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
