//! System configuration and hardware constants
//!
//! Compile-time defaults for pin counts, clock rates and timing increments.
//! Runtime overrides go through [`TimingConfig`](crate::io::timing::TimingConfig)
//! and the generator handles.

/// Widest pin bank supported (one 32-bit register)
pub const MAX_PINS: u8 = 32;

/// Reference system clock (80 MHz, 12.5 ns per tick)
pub const SYSTEM_CLOCK_HZ: u32 = 80_000_000;

/// Default `pause` increment: 1 ms
pub const PAUSE_INCREMENTS_PER_SECOND: u32 = 1_000;

/// Default timed-I/O increment: 1 µs
pub const IO_INCREMENTS_PER_SECOND: u32 = 1_000_000;

/// Default timed-I/O timeout divisor: 1/4 s
pub const TIMEOUT_DIVISOR: u32 = 4;

/// Execution contexts on the reference part (one runs `main`)
pub const NUM_CONTEXTS: u8 = 8;

/// Channels per background generator (two counter modules per context)
pub const CHANNELS_PER_GENERATOR: usize = 2;

/// Default D/A resolution in bits (value is in 256ths of the supply)
pub const DEFAULT_DAC_BITS: u8 = 8;

/// Highest supported D/A resolution in bits
pub const MAX_DAC_BITS: u8 = 31;

/// Longest PWM cycle or high time representable in a channel slot (µs)
pub const MAX_PWM_MICROS: u32 = (1 << 24) - 1;

/// Supply voltage driving the pins, used by D/A voltage helpers
pub const SUPPLY_VOLTS: f32 = 3.3;

/// Largest WAV playback volume
pub const MAX_WAV_VOLUME: u8 = 10;

/// Pin assignments for the demo binary
pub mod pins {
    //! GPIO pin assignments (port A bit numbers) used by the demo binary

    /// Status LED, blinked with `high`/`low`/`pause`
    pub const LED_STATUS: u8 = 5;

    /// PWM channel A output
    pub const PWM_OUT: u8 = 8;

    /// Square wave output
    pub const TONE_OUT: u8 = 9;

    /// D/A (duty modulation) output, feed through an RC low pass filter
    pub const DAC_OUT: u8 = 10;

    /// RC-time sensor pin
    pub const RC_SENSOR: u8 = 0;
}
