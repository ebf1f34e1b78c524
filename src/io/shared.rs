//! Pin registers shared by several execution contexts
//!
//! Every context owns a direction and an output word. The physical pins see
//! their combination: a pin is driven while any context has it as an output,
//! and driven high while any of those contexts outputs high. A context
//! treating the pin as input never overrides one that drives it.

use core::sync::atomic::{AtomicU32, Ordering};

/// Combined drive of all contexts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Drive {
    /// Pins some context has as output
    pub driven: u32,
    /// Driven pins some context outputs high
    pub high: u32,
}

impl Drive {
    /// Combine `(dir, out)` register pairs
    pub fn combine(registers: impl IntoIterator<Item = (u32, u32)>) -> Self {
        registers
            .into_iter()
            .fold(Self::default(), |drive, (dir, out)| Self {
                driven: drive.driven | dir,
                high: drive.high | (dir & out),
            })
    }

    /// Physical levels with `external` on the undriven pins
    #[must_use]
    pub const fn levels(self, external: u32) -> u32 {
        self.high | (external & !self.driven)
    }
}

/// Hardware bits to touch when the combined drive changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Drive before the register write
    pub before: Drive,
    /// Drive after it
    pub after: Drive,
}

impl Transition {
    /// Pins no context drives any more
    #[must_use]
    pub const fn to_input(&self) -> u32 {
        self.before.driven & !self.after.driven
    }

    /// Pins that just became driven
    #[must_use]
    pub const fn to_output(&self) -> u32 {
        self.after.driven & !self.before.driven
    }

    /// Driven pins whose level must go high
    #[must_use]
    pub const fn set_high(&self) -> u32 {
        self.after.high & !self.before.high
    }

    /// Driven pins whose level must go low (were high, or were undriven)
    #[must_use]
    pub const fn set_low(&self) -> u32 {
        self.after.driven & !self.after.high & (self.before.high | !self.before.driven)
    }
}

/// Per-context direction and output words for `N` contexts
///
/// Writers must not interleave: the hardware layer wraps [`update`](Self::update)
/// and the register writes it implies in one critical section.
pub struct SharedRegisters<const N: usize> {
    dir: [AtomicU32; N],
    out: [AtomicU32; N],
}

impl<const N: usize> SharedRegisters<N> {
    /// All contexts with every pin as input
    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const ZERO: AtomicU32 = AtomicU32::new(0);
        Self {
            dir: [ZERO; N],
            out: [ZERO; N],
        }
    }

    /// Direction word of context `id`
    ///
    /// # Panics
    ///
    /// If `id` is not below `N`.
    pub fn dir(&self, id: usize) -> u32 {
        self.dir[id].load(Ordering::Acquire)
    }

    /// Output word of context `id`
    ///
    /// # Panics
    ///
    /// If `id` is not below `N`.
    pub fn out(&self, id: usize) -> u32 {
        self.out[id].load(Ordering::Acquire)
    }

    /// Combined drive of all contexts
    pub fn drive(&self) -> Drive {
        Drive::combine((0..N).map(|id| (self.dir(id), self.out(id))))
    }

    /// Store context `id`'s words and report how the combined drive moved
    ///
    /// # Panics
    ///
    /// If `id` is not below `N`.
    pub fn update(&self, id: usize, dir: u32, out: u32) -> Transition {
        let before = self.drive();
        self.dir[id].store(dir, Ordering::Release);
        self.out[id].store(out, Ordering::Release);
        Transition {
            before,
            after: self.drive(),
        }
    }
}

impl<const N: usize> Default for SharedRegisters<N> {
    fn default() -> Self {
        Self::new()
    }
}
