//! Synchronous Serial Shift Tests
//!
//! `shift_in` against a simulated shift register for every mode, and
//! `shift_out` against a simulated latch.
//! Run with: cargo test --test shift_tests

use std::sync::{Arc, Mutex};

use simpletools::error::Error;
use simpletools::io::shift::{BitOrder, ShiftInMode};
use simpletools::io::TimedIo;
use simpletools::sim::{Circuit, SimBoard};
use simpletools::types::{Level, Pin};

const CLOCK_HZ: u32 = 1_000_000;

fn pin(n: u8) -> Pin {
    Pin::new(n).unwrap()
}

/// Peripheral that presents `word` one bit per rising clock edge
struct ShiftRegister {
    word: u32,
    bits: u8,
    msb_first: bool,
    /// First bit appears after the first clock edge instead of before it
    after_clock: bool,
    data: Pin,
    clock: Pin,
    edges: u8,
    clock_was_high: bool,
}

impl ShiftRegister {
    fn for_mode(mode: ShiftInMode, word: u32, bits: u8, data: Pin, clock: Pin) -> Self {
        Self {
            word,
            bits,
            msb_first: mode.order() == BitOrder::MsbFirst,
            after_clock: matches!(mode, ShiftInMode::MsbPost | ShiftInMode::LsbPost),
            data,
            clock,
            edges: 0,
            clock_was_high: false,
        }
    }
}

impl Circuit for ShiftRegister {
    fn respond(&mut self, _now: u32, driven: u32, levels: u32) -> u32 {
        let clock_high = driven & levels & self.clock.mask() != 0;
        if clock_high && !self.clock_was_high {
            self.edges += 1;
        }
        self.clock_was_high = clock_high;

        let index = if self.after_clock {
            self.edges.checked_sub(1)
        } else {
            Some(self.edges)
        };
        match index.filter(|&i| i < self.bits) {
            Some(i) => {
                let position = if self.msb_first { self.bits - 1 - i } else { i };
                if (self.word >> position) & 1 == 1 {
                    self.data.mask()
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}

/// Attach a latch that records the data level on every rising clock edge
fn attach_latch(board: &SimBoard, data: Pin, clock: Pin) -> Arc<Mutex<Vec<bool>>> {
    let latched = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&latched);
    let mut clock_was_high = false;
    board.attach(move |_now: u32, driven: u32, levels: u32| {
        let clock_high = driven & levels & clock.mask() != 0;
        if clock_high && !clock_was_high {
            sink.lock().unwrap().push(levels & data.mask() != 0);
        }
        clock_was_high = clock_high;
        0
    });
    latched
}

// =============================================================================
// shift_in Tests
// =============================================================================

#[test]
fn test_shift_in_every_mode() {
    let (data, clock) = (pin(1), pin(2));
    for mode in [
        ShiftInMode::MsbPre,
        ShiftInMode::LsbPre,
        ShiftInMode::MsbPost,
        ShiftInMode::LsbPost,
    ] {
        let board = SimBoard::new(CLOCK_HZ);
        board.attach(ShiftRegister::for_mode(mode, 0b1011_0010, 8, data, clock));
        let mut io = TimedIo::new(board.main(), &board);

        let value = io.shift_in(data, clock, mode, 8).unwrap();
        assert_eq!(value, 0b1011_0010, "mode {mode:?}");
    }
}

#[test]
fn test_shift_in_full_word() {
    let (data, clock) = (pin(20), pin(21));
    let board = SimBoard::new(CLOCK_HZ);
    board.attach(ShiftRegister::for_mode(ShiftInMode::MsbPre, 0xDEAD_BEEF, 32, data, clock));
    let mut io = TimedIo::new(board.main(), &board);

    assert_eq!(io.shift_in(data, clock, ShiftInMode::MsbPre, 32), Ok(0xDEAD_BEEF));
}

#[test]
fn test_shift_in_leaves_clock_low_and_data_input() {
    let (data, clock) = (pin(1), pin(2));
    let board = SimBoard::new(CLOCK_HZ);
    let mut io = TimedIo::new(board.main(), &board);
    io.pins_mut().high(data).unwrap();

    io.shift_in(data, clock, ShiftInMode::LsbPre, 4).unwrap();

    assert_eq!(io.pins().state(clock).unwrap(), Level::Low);
    assert_eq!(board.registers(0).0, clock.mask());
}

// =============================================================================
// shift_out Tests
// =============================================================================

#[test]
fn test_shift_out_msb_first() {
    let (data, clock) = (pin(5), pin(6));
    let board = SimBoard::new(CLOCK_HZ);
    let latched = attach_latch(&board, data, clock);
    let mut io = TimedIo::new(board.main(), &board);

    io.shift_out(data, clock, BitOrder::MsbFirst, 8, 0xA5).unwrap();

    let latched = latched.lock().unwrap();
    assert_eq!(latched.len(), 8);
    let value = latched.iter().fold(0u32, |value, &bit| (value << 1) | u32::from(bit));
    assert_eq!(value, 0xA5);
}

#[test]
fn test_shift_out_lsb_first() {
    let (data, clock) = (pin(5), pin(6));
    let board = SimBoard::new(CLOCK_HZ);
    let latched = attach_latch(&board, data, clock);
    let mut io = TimedIo::new(board.main(), &board);

    io.shift_out(data, clock, BitOrder::LsbFirst, 12, 0x0ABC).unwrap();

    let latched = latched.lock().unwrap();
    assert_eq!(latched.len(), 12);
    let value = latched
        .iter()
        .enumerate()
        .fold(0u32, |value, (i, &bit)| value | (u32::from(bit) << i));
    assert_eq!(value, 0x0ABC);
}

#[test]
fn test_shift_out_ignores_bits_above_count() {
    let (data, clock) = (pin(5), pin(6));
    let board = SimBoard::new(CLOCK_HZ);
    let latched = attach_latch(&board, data, clock);
    let mut io = TimedIo::new(board.main(), &board);

    io.shift_out(data, clock, BitOrder::MsbFirst, 4, 0xFFF0).unwrap();

    assert_eq!(*latched.lock().unwrap(), vec![false; 4]);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_bit_count_limits() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut io = TimedIo::new(board.main(), &board);
    assert_eq!(
        io.shift_in(pin(1), pin(2), ShiftInMode::MsbPre, 0),
        Err(Error::InvalidBitCount(0))
    );
    assert_eq!(
        io.shift_out(pin(1), pin(2), BitOrder::LsbFirst, 33, 0),
        Err(Error::InvalidBitCount(33))
    );
}

#[test]
fn test_same_pin_for_data_and_clock() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut io = TimedIo::new(board.main(), &board);
    assert_eq!(
        io.shift_out(pin(4), pin(4), BitOrder::MsbFirst, 8, 0),
        Err(Error::PinConflict(4))
    );
}
