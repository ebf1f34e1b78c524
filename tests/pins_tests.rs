//! Pin Register Tests
//!
//! Single-pin and batched operations on a simulated board.
//! Run with: cargo test --test pins_tests

use simpletools::error::Error;
use simpletools::io::pins::{PinBank, Port};
use simpletools::signal::Launch;
use simpletools::sim::SimBoard;
use simpletools::types::{Direction, Level, Pin, PinRange};

const CLOCK_HZ: u32 = 1_000_000;

fn pin(n: u8) -> Pin {
    Pin::new(n).unwrap()
}

/// An 8-pin bank, narrower than any pin number can express
#[derive(Default)]
struct NarrowBank {
    dir: u32,
    out: u32,
}

impl PinBank for NarrowBank {
    const PIN_COUNT: u8 = 8;

    fn read_dir(&self) -> u32 {
        self.dir
    }

    fn write_dir(&mut self, bits: u32) {
        self.dir = bits;
    }

    fn read_out(&self) -> u32 {
        self.out
    }

    fn write_out(&mut self, bits: u32) {
        self.out = bits;
    }

    fn read_in(&self) -> u32 {
        self.dir & self.out
    }
}

// =============================================================================
// Single Pin Tests
// =============================================================================

#[test]
fn test_high_then_state_is_high_for_every_pin() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    for n in 0..32 {
        port.high(pin(n)).unwrap();
        assert_eq!(port.state(pin(n)).unwrap(), Level::High, "pin {n}");
        port.low(pin(n)).unwrap();
        assert_eq!(port.state(pin(n)).unwrap(), Level::Low, "pin {n}");
    }
}

#[test]
fn test_high_makes_pin_an_output() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    port.high(pin(4)).unwrap();
    assert_eq!(port.direction(pin(4)).unwrap(), Direction::Output);
    assert_eq!(port.output(pin(4)).unwrap(), Level::High);
}

#[test]
fn test_toggle_twice_restores_output() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    for start in [Level::Low, Level::High] {
        port.drive(pin(3), start).unwrap();
        let first = port.toggle(pin(3)).unwrap();
        assert_eq!(first, !start);
        assert_eq!(port.state(pin(3)).unwrap(), !start);
        port.toggle(pin(3)).unwrap();
        assert_eq!(port.output(pin(3)).unwrap(), start);
    }
}

#[test]
fn test_input_releases_pin_and_samples() {
    let board = SimBoard::new(CLOCK_HZ);
    board.set_external(1 << 6);
    let mut port = Port::new(board.main());
    port.low(pin(6)).unwrap();
    assert_eq!(port.state(pin(6)).unwrap(), Level::Low);
    assert_eq!(port.input(pin(6)).unwrap(), Level::High);
    assert_eq!(port.direction(pin(6)).unwrap(), Direction::Input);
}

#[test]
fn test_set_output_keeps_direction() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    port.set_output(pin(2), Level::High).unwrap();
    assert_eq!(port.direction(pin(2)).unwrap(), Direction::Input);
    assert_eq!(port.state(pin(2)).unwrap(), Level::Low);
    port.set_direction(pin(2), Direction::Output).unwrap();
    assert_eq!(port.state(pin(2)).unwrap(), Level::High);
}

#[test]
fn test_reverse_flips_direction() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    assert_eq!(port.reverse(pin(1)).unwrap(), Direction::Output);
    assert_eq!(port.reverse(pin(1)).unwrap(), Direction::Input);
}

#[test]
fn test_state_watches_other_context() {
    let board = SimBoard::new(CLOCK_HZ);
    let main = Port::new(board.main());
    let mut other = Port::new(board.launch().unwrap());

    other.high(pin(9)).unwrap();
    assert_eq!(main.state(pin(9)).unwrap(), Level::High);
    assert_eq!(main.direction(pin(9)).unwrap(), Direction::Input);

    drop(other);
    assert_eq!(main.state(pin(9)).unwrap(), Level::Low);
}

#[test]
fn test_outputs_of_driving_contexts_combine() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut main = Port::new(board.main());
    let mut other = Port::new(board.launch().unwrap());
    main.low(pin(0)).unwrap();
    other.high(pin(0)).unwrap();
    assert_eq!(main.state(pin(0)).unwrap(), Level::High);
}

#[test]
fn test_narrow_bank_rejects_high_pins() {
    let mut port = Port::new(NarrowBank::default());
    assert!(port.high(pin(7)).is_ok());
    assert_eq!(port.high(pin(8)), Err(Error::PinOutOfRange { pin: 8, count: 8 }));
    assert_eq!(port.state(pin(20)), Err(Error::PinOutOfRange { pin: 20, count: 8 }));
    let range = PinRange::from_numbers(4, 9).unwrap();
    assert_eq!(port.set_outputs(range, 0), Err(Error::PinOutOfRange { pin: 9, count: 8 }));
}

// =============================================================================
// Batched Tests
// =============================================================================

#[test]
fn test_set_outputs_round_trips_every_range() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    let pattern = 0xA5C3_5A3C;
    for start in 0..32 {
        for end in start..32 {
            let range = PinRange::from_numbers(start, end).unwrap();
            port.set_outputs(range, pattern).unwrap();
            assert_eq!(port.outputs(range).unwrap(), pattern & range.value_mask(), "range {range}");
        }
    }
}

#[test]
fn test_set_outputs_leaves_neighbours() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    let all = PinRange::from_numbers(0, 31).unwrap();
    port.set_outputs(all, u32::MAX).unwrap();
    port.set_outputs(PinRange::from_numbers(8, 15).unwrap(), 0).unwrap();
    assert_eq!(port.outputs(all).unwrap(), 0xFFFF_00FF);
}

#[test]
fn test_set_states_drives_range() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    let range = PinRange::from_numbers(4, 7).unwrap();
    port.set_states(range, 0b1001).unwrap();
    assert_eq!(port.directions(range).unwrap(), 0b1111);
    assert_eq!(port.states(range).unwrap(), 0b1001);
    assert_eq!(board.levels(), 0b1001_0000);
}

#[test]
fn test_states_reads_external_levels() {
    let board = SimBoard::new(CLOCK_HZ);
    board.set_external(0x00F0_0000);
    let port = Port::new(board.main());
    let range = PinRange::from_numbers(18, 25).unwrap();
    assert_eq!(port.states(range).unwrap(), 0b0011_1100);
}

#[test]
fn test_set_directions_round_trips() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    let range = PinRange::from_numbers(10, 13).unwrap();
    port.set_directions(range, 0b0101).unwrap();
    assert_eq!(port.directions(range).unwrap(), 0b0101);
    assert_eq!(port.direction(pin(10)).unwrap(), Direction::Output);
    assert_eq!(port.direction(pin(11)).unwrap(), Direction::Input);
}

#[test]
fn test_release_all_returns_pins_to_input() {
    let board = SimBoard::new(CLOCK_HZ);
    let mut port = Port::new(board.main());
    port.set_states(PinRange::from_numbers(0, 7).unwrap(), 0xFF).unwrap();
    port.release_all();
    assert_eq!(board.registers(0), (0, 0));
}
