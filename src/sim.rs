//! Simulated Board
//!
//! A host-side stand-in for the pin hardware: [`NUM_CONTEXTS`] execution
//! contexts, each with private direction and output registers, a shared
//! input register and a tick counter that advances on every read. External
//! hardware is modelled by a [`Circuit`] that drives the pins no context
//! drives.
//!
//! ```text
//!   ctx0 dir/out ─┐
//!   ctx1 dir/out ─┼─ OR of driven outputs ─┐
//!   ...           ┘                         ├─▶ input register
//!   Circuit / external levels ──(undriven)──┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::{MAX_PINS, NUM_CONTEXTS};
use crate::error::{Error, Result};
use crate::io::pins::PinBank;
use crate::io::shared::Drive;
use crate::io::timing::Clock;
use crate::signal::Launch;

const CONTEXTS: usize = NUM_CONTEXTS as usize;

/// External hardware attached to the simulated pins
///
/// Called on every register write and input read with the current tick, the
/// mask of pins driven by some context and the levels they are driven to.
/// Returns the levels the circuit puts on the undriven pins.
pub trait Circuit: Send {
    /// Levels for the undriven pins at tick `now`
    fn respond(&mut self, now: u32, driven: u32, levels: u32) -> u32;
}

impl<F> Circuit for F
where
    F: FnMut(u32, u32, u32) -> u32 + Send,
{
    fn respond(&mut self, now: u32, driven: u32, levels: u32) -> u32 {
        self(now, driven, levels)
    }
}

struct Inner {
    now: u32,
    step: u32,
    dir: [u32; CONTEXTS],
    out: [u32; CONTEXTS],
    busy: u32,
    external: u32,
    circuit: Option<Box<dyn Circuit>>,
}

impl Inner {
    fn levels(&mut self) -> u32 {
        let drive = Drive::combine(self.dir.iter().copied().zip(self.out.iter().copied()));
        let now = self.now;
        let external = match self.circuit.as_mut() {
            Some(circuit) => circuit.respond(now, drive.driven, drive.high),
            None => self.external,
        };
        drive.levels(external)
    }
}

/// Simulated pins, contexts and clock
pub struct SimBoard {
    frequency: u32,
    inner: Mutex<Inner>,
}

impl SimBoard {
    /// Board with a clock of `frequency` Hz advancing one tick per read
    #[must_use]
    pub fn new(frequency: u32) -> Self {
        Self {
            frequency,
            inner: Mutex::new(Inner {
                now: 0,
                step: 1,
                dir: [0; CONTEXTS],
                out: [0; CONTEXTS],
                busy: 1,
                external: 0,
                circuit: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ticks the clock advances on every read
    pub fn set_step(&self, step: u32) {
        self.lock().step = step;
    }

    /// Move the clock to `ticks` (e.g. just before a wrap)
    pub fn set_now(&self, ticks: u32) {
        self.lock().now = ticks;
    }

    /// Advance the clock without reading it
    pub fn advance(&self, ticks: u32) {
        let mut inner = self.lock();
        inner.now = inner.now.wrapping_add(ticks);
    }

    /// Current tick count, without advancing
    pub fn ticks(&self) -> u32 {
        self.lock().now
    }

    /// Fixed levels on undriven pins (ignored while a circuit is attached)
    pub fn set_external(&self, levels: u32) {
        self.lock().external = levels;
    }

    /// Attach external hardware
    pub fn attach(&self, circuit: impl Circuit + 'static) {
        self.lock().circuit = Some(Box::new(circuit));
    }

    /// Remove the attached circuit
    pub fn detach(&self) {
        self.lock().circuit = None;
    }

    /// Physical pin levels
    pub fn levels(&self) -> u32 {
        self.lock().levels()
    }

    /// Direction and output registers of context `id`
    ///
    /// # Panics
    ///
    /// If `id` is not a context number.
    pub fn registers(&self, id: usize) -> (u32, u32) {
        let inner = self.lock();
        (inner.dir[id], inner.out[id])
    }

    /// Number of contexts in use, including the main one
    pub fn contexts_in_use(&self) -> u32 {
        self.lock().busy.count_ones()
    }

    /// View of the main context (context 0), which is never released
    pub fn main(&self) -> SimContext<'_> {
        SimContext {
            board: self,
            id: 0,
            owned: false,
        }
    }
}

impl Clock for SimBoard {
    fn now(&self) -> u32 {
        let mut inner = self.lock();
        let now = inner.now;
        inner.now = now.wrapping_add(inner.step);
        now
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }
}

impl Launch for SimBoard {
    type Context<'a> = SimContext<'a>;

    fn launch(&self) -> Result<SimContext<'_>> {
        let mut inner = self.lock();
        let id = (1..CONTEXTS)
            .find(|id| inner.busy & (1 << id) == 0)
            .ok_or(Error::NoFreeContext)?;
        inner.busy |= 1 << id;
        crate::debug!("sim: context {} launched", id);
        Ok(SimContext {
            board: self,
            id,
            owned: true,
        })
    }
}

/// One context's view of a [`SimBoard`]
pub struct SimContext<'a> {
    board: &'a SimBoard,
    id: usize,
    owned: bool,
}

impl SimContext<'_> {
    /// Context number on the board
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }
}

impl PinBank for SimContext<'_> {
    const PIN_COUNT: u8 = MAX_PINS;

    fn read_dir(&self) -> u32 {
        self.board.lock().dir[self.id]
    }

    fn write_dir(&mut self, bits: u32) {
        let mut inner = self.board.lock();
        inner.dir[self.id] = bits;
        inner.levels();
    }

    fn read_out(&self) -> u32 {
        self.board.lock().out[self.id]
    }

    fn write_out(&mut self, bits: u32) {
        let mut inner = self.board.lock();
        inner.out[self.id] = bits;
        inner.levels();
    }

    fn read_in(&self) -> u32 {
        self.board.lock().levels()
    }
}

impl Clock for SimContext<'_> {
    fn now(&self) -> u32 {
        self.board.now()
    }

    fn frequency(&self) -> u32 {
        self.board.frequency
    }
}

impl Drop for SimContext<'_> {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        let mut inner = self.board.lock();
        inner.dir[self.id] = 0;
        inner.out[self.id] = 0;
        inner.busy &= !(1 << self.id);
        inner.levels();
    }
}
