//! Waveform arithmetic shared by the generators and `freqout`
//!
//! Each engine maps ticks elapsed since its anchor to a pin level. They are
//! the software equivalent of a counter module: an NCO whose phase register
//! MSB is the output, a duty accumulator whose carry is the output, and a
//! plain period/high-time comparison for PWM.

use crate::error::{Error, Result};
use crate::types::Level;

/// Numerically controlled oscillator, 50% duty square wave
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nco {
    increment: u32,
}

impl Nco {
    /// Oscillator for `frequency` Hz on a clock of `clock_hz` ticks per second
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFrequency`] for zero or anything above `clock_hz / 2`.
    pub fn new(frequency: u32, clock_hz: u32) -> Result<Self> {
        if frequency == 0 || frequency > clock_hz / 2 {
            return Err(Error::InvalidFrequency(frequency));
        }
        let increment = (u64::from(frequency) << 32) / u64::from(clock_hz);
        // frequency <= clock_hz / 2 keeps this at or below 2^31
        let increment = u32::try_from(increment).map_err(|_| Error::InvalidFrequency(frequency))?;
        Ok(Self { increment })
    }

    /// Phase added per tick
    #[must_use]
    pub const fn increment(&self) -> u32 {
        self.increment
    }

    /// Level after `elapsed` ticks: the phase accumulator MSB
    #[must_use]
    pub const fn level(&self, elapsed: u32) -> Level {
        Level::from_bit(self.increment.wrapping_mul(elapsed) >> 31)
    }
}

/// Duty-modulation accumulator for D/A output
///
/// Adds `value << (32 - bits)` every tick and outputs the carry, so the
/// average level is `value / 2^bits` of the supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DutyAccumulator {
    increment: u32,
}

impl DutyAccumulator {
    /// Accumulator for `value` at `bits` of resolution
    ///
    /// # Errors
    ///
    /// [`Error::InvalidResolution`] for `bits` outside 1..=31,
    /// [`Error::DacValueOutOfRange`] if `value` needs more than `bits` bits.
    pub fn new(value: u32, bits: u8) -> Result<Self> {
        check_resolution(bits)?;
        if value >> bits != 0 {
            return Err(Error::DacValueOutOfRange { value, bits });
        }
        Ok(Self {
            increment: value << (32 - u32::from(bits)),
        })
    }

    /// Value added per tick
    #[must_use]
    pub const fn increment(&self) -> u32 {
        self.increment
    }

    /// Level on tick `elapsed`: high when adding the increment carried
    #[must_use]
    pub const fn level(&self, elapsed: u32) -> Level {
        let before = self.increment.wrapping_mul(elapsed);
        Level::from_bit(before.overflowing_add(self.increment).1 as u32)
    }

    /// Average output voltage for `value` at `bits` on a `supply` volt pin
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn volts(value: u32, bits: u8, supply: f32) -> f32 {
        let full_scale = (1u64 << bits.min(31)) as f32;
        supply * value as f32 / full_scale
    }

    /// Nearest `bits`-bit value for `volts` on a `supply` volt pin
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn value_for(volts: f32, bits: u8, supply: f32) -> u32 {
        #[cfg(not(feature = "std"))]
        use micromath::F32Ext;

        let bits = bits.clamp(1, 31);
        let max = (1u32 << bits) - 1;
        let scaled = (volts / supply * (1u64 << bits) as f32).round();
        if scaled <= 0.0 {
            0
        } else if scaled >= max as f32 {
            max
        } else {
            scaled as u32
        }
    }
}

/// Check a D/A resolution
///
/// # Errors
///
/// [`Error::InvalidResolution`] for `bits` outside 1..=31.
pub const fn check_resolution(bits: u8) -> Result<u8> {
    if bits == 0 || bits > crate::config::MAX_DAC_BITS {
        Err(Error::InvalidResolution(bits))
    } else {
        Ok(bits)
    }
}

/// Fixed-period PWM timing in ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmTiming {
    cycle: u32,
    high: u32,
}

impl PwmTiming {
    /// Cycle of `cycle` ticks with `high` ticks high, high time clamped to the cycle
    #[must_use]
    pub fn new(cycle: u32, high: u32) -> Self {
        let cycle = cycle.max(1);
        Self {
            cycle,
            high: high.min(cycle),
        }
    }

    /// Cycle length in ticks
    #[must_use]
    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// High time in ticks
    #[must_use]
    pub const fn high(&self) -> u32 {
        self.high
    }

    /// Level `elapsed` ticks after the cycle anchor
    #[must_use]
    pub const fn level(&self, elapsed: u32) -> Level {
        Level::from_bit((elapsed % self.cycle < self.high) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // NCO
    // ==========================================================================

    #[test]
    fn nco_half_clock_toggles_every_tick() {
        let nco = Nco::new(500_000, 1_000_000).unwrap();
        assert_eq!(nco.increment(), 1 << 31);
        assert_eq!(nco.level(0), Level::Low);
        assert_eq!(nco.level(1), Level::High);
        assert_eq!(nco.level(2), Level::Low);
    }

    #[test]
    fn nco_rejects_zero_and_above_nyquist() {
        assert_eq!(Nco::new(0, 1_000_000), Err(Error::InvalidFrequency(0)));
        assert_eq!(Nco::new(500_001, 1_000_000), Err(Error::InvalidFrequency(500_001)));
    }

    #[test]
    fn nco_square_wave_has_even_halves() {
        // 1 kHz on a 1 MHz clock: 1000 ticks per period
        let nco = Nco::new(1_000, 1_000_000).unwrap();
        let high = (0..1_000).filter(|&t| nco.level(t).is_high()).count();
        assert!((499..=501).contains(&high), "high ticks {high}");
    }

    // ==========================================================================
    // Duty accumulator
    // ==========================================================================

    #[test]
    fn duty_average_matches_value() {
        let duty = DutyAccumulator::new(64, 8).unwrap();
        let high = (0..256).filter(|&t| duty.level(t).is_high()).count();
        assert_eq!(high, 64);
    }

    #[test]
    fn duty_zero_never_goes_high() {
        let duty = DutyAccumulator::new(0, 8).unwrap();
        assert!((0..512).all(|t| duty.level(t).is_low()));
    }

    #[test]
    fn duty_rejects_oversized_value() {
        assert_eq!(
            DutyAccumulator::new(256, 8),
            Err(Error::DacValueOutOfRange { value: 256, bits: 8 })
        );
        assert_eq!(DutyAccumulator::new(1, 0), Err(Error::InvalidResolution(0)));
        assert_eq!(DutyAccumulator::new(1, 32), Err(Error::InvalidResolution(32)));
    }

    #[test]
    fn duty_volts_round_trip() {
        let value = DutyAccumulator::value_for(1.65, 8, 3.3);
        assert_eq!(value, 128);
        let volts = DutyAccumulator::volts(value, 8, 3.3);
        assert!((volts - 1.65).abs() < 0.01);
    }

    // ==========================================================================
    // PWM
    // ==========================================================================

    #[test]
    fn pwm_high_for_first_part_of_cycle() {
        let pwm = PwmTiming::new(1_000, 250);
        assert_eq!(pwm.level(0), Level::High);
        assert_eq!(pwm.level(249), Level::High);
        assert_eq!(pwm.level(250), Level::Low);
        assert_eq!(pwm.level(1_000), Level::High);
    }

    #[test]
    fn pwm_high_time_clamped_to_cycle() {
        let pwm = PwmTiming::new(100, 500);
        assert_eq!(pwm.high(), 100);
        assert!((0..300).all(|t| pwm.level(t).is_high()));
    }
}
