//! Pause, Mark, Timeout and Wait Tests
//!
//! Run with: cargo test --test timing_tests

use simpletools::config::SYSTEM_CLOCK_HZ;
use simpletools::io::timing::{Clock, TimingConfig};
use simpletools::io::TimedIo;
use simpletools::sim::SimBoard;

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_defaults_follow_clock() {
    let board = SimBoard::new(1_000_000);
    let io = TimedIo::new(board.main(), &board);
    assert_eq!(io.config().pause_ticks(), 1_000);
    assert_eq!(io.config().io_ticks(), 1);
    assert_eq!(io.config().timeout_ticks(), 250_000);
}

#[test]
fn test_setters_never_store_zero() {
    let mut config = TimingConfig::default();
    config.set_pause_dt(0);
    config.set_io_dt(0);
    config.set_io_timeout(0);
    assert_eq!(config.pause_ticks(), 1);
    assert_eq!(config.io_ticks(), 1);
    assert_eq!(config.timeout_ticks(), 1);
}

#[test]
fn test_facade_setters_update_config() {
    let board = SimBoard::new(1_000_000);
    let mut io = TimedIo::new(board.main(), &board);
    io.set_pause_dt(10);
    io.set_io_dt(3);
    io.set_io_timeout(500);
    assert_eq!(*io.config(), {
        let mut expected = TimingConfig::for_clock(1_000_000);
        expected.set_pause_dt(10);
        expected.set_io_dt(3);
        expected.set_io_timeout(500);
        expected
    });
}

// =============================================================================
// Pause Tests
// =============================================================================

#[test]
fn test_pause_blocks_for_increments() {
    let board = SimBoard::new(1_000_000);
    let io = TimedIo::new(board.main(), &board);
    let before = board.ticks();
    io.pause(3);
    let elapsed = board.ticks() - before;
    assert!((3_000..3_005).contains(&elapsed), "elapsed {elapsed}");
}

#[test]
fn test_pause_ticks_is_raw() {
    let board = SimBoard::new(1_000_000);
    let io = TimedIo::new(board.main(), &board);
    let before = board.ticks();
    io.pause_ticks(250);
    let elapsed = board.ticks() - before;
    assert!((250..255).contains(&elapsed), "elapsed {elapsed}");
}

// =============================================================================
// Mark / Timeout Tests
// =============================================================================

#[test]
fn test_timeout_false_right_after_mark() {
    // 80 ticks per I/O increment, the clock moves one tick per read
    let board = SimBoard::new(SYSTEM_CLOCK_HZ);
    let mut io = TimedIo::new(board.main(), &board);
    for t in [1, 2, 100, 10_000] {
        io.mark();
        assert!(!io.timeout(t), "timeout({t}) right after mark");
    }
}

#[test]
fn test_timeout_true_after_waiting() {
    let board = SimBoard::new(SYSTEM_CLOCK_HZ);
    let mut io = TimedIo::new(board.main(), &board);
    for t in [1, 5, 250] {
        io.mark();
        io.pause_ticks(io.config().io_to_ticks(t));
        assert!(io.timeout(t), "timeout({t}) after waiting");
    }
}

#[test]
fn test_timeout_across_counter_wrap() {
    let board = SimBoard::new(1_000_000);
    let mut io = TimedIo::new(board.main(), &board);
    board.set_now(u32::MAX - 10);
    io.mark();
    assert!(!io.timeout(100));
    board.advance(200);
    assert!(io.timeout(100));
}

// =============================================================================
// Wait Tests
// =============================================================================

#[test]
fn test_wait_does_not_drift() {
    let board = SimBoard::new(1_000_000);
    let mut io = TimedIo::new(board.main(), &board);
    let start = board.ticks();
    io.mark();
    for _ in 0..5 {
        // work between waits must not stretch the period
        board.advance(37);
        io.wait(100);
    }
    let elapsed = board.ticks() - start;
    assert!((500..=502).contains(&elapsed), "elapsed {elapsed}");
}

#[test]
fn test_wait_after_deadline_returns_immediately() {
    let board = SimBoard::new(1_000_000);
    let mut io = TimedIo::new(board.main(), &board);
    io.mark();
    board.advance(1_000);
    let before = board.ticks();
    io.wait(10);
    assert!(board.ticks() - before <= 2);
}

#[test]
fn test_clock_elapsed_wraps() {
    let board = SimBoard::new(1_000_000);
    board.set_now(u32::MAX);
    let start = board.now();
    board.advance(9);
    assert_eq!(board.elapsed(start), 10);
}
