//! Shared state between a generator handle and its worker
//!
//! The handle and the worker usually run in different execution contexts,
//! so everything here is lock-free and usable from a `static`.

use core::sync::atomic::{fence, AtomicU32, Ordering};

use crate::config::CHANNELS_PER_GENERATOR;
use crate::error::{Error, Result};
use crate::types::Pin;

const STOPPED: u32 = 0;
const RUNNING: u32 = 1;
const STOPPING: u32 = 2;
// Worker gone while the handle is still alive
const ORPHANED: u32 = 3;

const STATE_BITS: u32 = 2;
const STATE_MASK: u32 = (1 << STATE_BITS) - 1;

const NO_PIN: u32 = u32::MAX;

const fn pack(generation: u32, state: u32) -> u32 {
    (generation << STATE_BITS) | state
}

const fn generation_of(word: u32) -> u32 {
    word >> STATE_BITS
}

/// Lifecycle of one generator family
///
/// The word packs a generation count above the state bits. Every start bumps
/// the generation, so a stopping worker from an earlier start can tell it has
/// been replaced and its late acknowledgement cannot touch the new one.
pub(crate) struct Lifecycle(AtomicU32);

impl Lifecycle {
    pub(crate) const fn new() -> Self {
        Self(AtomicU32::new(pack(0, STOPPED)))
    }

    /// Claim the family and return the new generation
    ///
    /// A family whose worker has not yet acknowledged a stop is taken over;
    /// that worker releases its pins and context on its next pass.
    pub(crate) fn try_start(&self) -> Result<u32> {
        let mut word = self.0.load(Ordering::Acquire);
        loop {
            if !matches!(word & STATE_MASK, STOPPED | STOPPING) {
                return Err(Error::AlreadyRunning);
            }
            let generation = generation_of(word).wrapping_add(1) & (u32::MAX >> STATE_BITS);
            match self.0.compare_exchange(
                word,
                pack(generation, RUNNING),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(generation),
                Err(current) => word = current,
            }
        }
    }

    /// Handle side: ask the worker to stop, or finish if it is already gone
    pub(crate) fn request_stop(&self, generation: u32) {
        if self.swap(generation, RUNNING, STOPPING) {
            return;
        }
        self.swap(generation, ORPHANED, STOPPED);
    }

    /// Worker side: stop requested, or a later start took the family over
    pub(crate) fn should_stop(&self, generation: u32) -> bool {
        self.0.load(Ordering::Acquire) != pack(generation, RUNNING)
    }

    /// Worker side: pins released, acknowledge a stop or mark the handle orphaned
    pub(crate) fn worker_exit(&self, generation: u32) {
        if self.swap(generation, STOPPING, STOPPED) {
            return;
        }
        self.swap(generation, RUNNING, ORPHANED);
    }

    /// Give up a claim that never got a worker
    pub(crate) fn abandon(&self, generation: u32) {
        self.swap(generation, RUNNING, STOPPED);
    }

    pub(crate) fn is_running(&self, generation: u32) -> bool {
        self.0.load(Ordering::Acquire) == pack(generation, RUNNING)
    }

    fn swap(&self, generation: u32, from: u32, to: u32) -> bool {
        self.0
            .compare_exchange(
                pack(generation, from),
                pack(generation, to),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire) & STATE_MASK != STOPPED
    }
}

/// One channel's pin and value, published with a sequence lock
///
/// There is a single writer (the handle), so the sequence counter only needs
/// to guard readers against torn pin/value pairs.
pub(crate) struct ChannelSlot {
    seq: AtomicU32,
    pin: AtomicU32,
    value: AtomicU32,
}

impl ChannelSlot {
    pub(crate) const fn new() -> Self {
        Self {
            seq: AtomicU32::new(0),
            pin: AtomicU32::new(NO_PIN),
            value: AtomicU32::new(0),
        }
    }

    pub(crate) fn store(&self, pin: Option<Pin>, value: u32) {
        let seq = self.seq.load(Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        self.pin
            .store(pin.map_or(NO_PIN, |p| u32::from(p.number())), Ordering::Relaxed);
        self.value.store(value, Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    pub(crate) fn load(&self) -> (Option<Pin>, u32) {
        loop {
            let before = self.seq.load(Ordering::Acquire);
            if before & 1 == 1 {
                core::hint::spin_loop();
                continue;
            }
            let pin = self.pin.load(Ordering::Relaxed);
            let value = self.value.load(Ordering::Relaxed);
            fence(Ordering::Acquire);
            if self.seq.load(Ordering::Relaxed) == before {
                let pin = u8::try_from(pin).ok().and_then(Pin::new);
                return (pin, value);
            }
        }
    }
}

/// Control block for one generator family
///
/// Declare one as a `static` per family (the crate provides
/// [`PWM`](super::PWM), [`SQUARE_WAVE`](super::SQUARE_WAVE) and
/// [`DAC`](super::DAC)); the lifecycle inside keeps at most one instance of
/// the family running.
pub struct SignalControl {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) channels: [ChannelSlot; CHANNELS_PER_GENERATOR],
    /// Family parameter: PWM cycle in µs or D/A resolution in bits
    pub(crate) param: AtomicU32,
}

impl SignalControl {
    /// Stopped control block with both channels idle
    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const IDLE: ChannelSlot = ChannelSlot::new();
        Self {
            lifecycle: Lifecycle::new(),
            channels: [IDLE; CHANNELS_PER_GENERATOR],
            param: AtomicU32::new(0),
        }
    }

    /// Check if a generator holds this block (running or still stopping)
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub(crate) fn reset(&self, param: u32) {
        for slot in &self.channels {
            slot.store(None, 0);
        }
        self.param.store(param, Ordering::Release);
    }

    pub(crate) fn param(&self) -> u32 {
        self.param.load(Ordering::Acquire)
    }
}

impl Default for SignalControl {
    fn default() -> Self {
        Self::new()
    }
}
