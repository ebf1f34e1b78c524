//! Background Signal Generators
//!
//! PWM, square wave and duty-modulation D/A signals produced by a worker that
//! runs in its own execution context. Starting a generator returns a handle
//! for the caller and a [`Worker`] to be run in the launched context:
//!
//! ```text
//!   caller context                  launched context
//!   ┌──────────────┐  SignalControl  ┌──────────────┐
//!   │ Pwm handle   │ ──(atomics)───▶ │ Worker::run  │ ──▶ pins
//!   │  set/release │                 │  service()   │
//!   └──────────────┘                 └──────────────┘
//! ```
//!
//! Each family has one [`SignalControl`], so at most one generator per family
//! runs at a time. Dropping the handle stops the family at once: it can be
//! started again right away, and the old worker returns its pins to input and
//! gives back its context on its next pass.

mod control;
pub mod dac;
pub mod engine;
pub mod pwm;
pub mod square_wave;

pub use control::SignalControl;
pub use dac::Dac;
pub use pwm::Pwm;
pub use square_wave::SquareWave;

use crate::config::CHANNELS_PER_GENERATOR;
use crate::error::{Error, Result};
use crate::io::pins::{PinBank, Port};
use crate::io::timing::{micros_to_ticks, Clock};
use crate::types::{Level, Pin};
use crate::{debug, info};
use engine::{DutyAccumulator, Nco, PwmTiming};

/// Control block of the PWM family
pub static PWM: SignalControl = SignalControl::new();

/// Control block of the square wave family
pub static SQUARE_WAVE: SignalControl = SignalControl::new();

/// Control block of the D/A family
pub static DAC: SignalControl = SignalControl::new();

/// Source of execution contexts for generator workers
///
/// A context is a view of the pin registers private to one thread of control,
/// plus the shared clock. Dropping the context gives it back.
pub trait Launch {
    /// Register view handed to a worker
    type Context<'a>: PinBank + Clock
    where
        Self: 'a;

    /// Claim a free context
    ///
    /// # Errors
    ///
    /// [`Error::NoFreeContext`] when every context is in use.
    fn launch(&self) -> Result<Self::Context<'_>>;
}

/// Generator channel, one per counter module of a context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Channel {
    /// First counter
    A,
    /// Second counter
    B,
}

impl Channel {
    /// Both channels, in slot order
    pub const ALL: [Self; CHANNELS_PER_GENERATOR] = [Self::A, Self::B];

    /// Slot index of the channel
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Result of one worker service pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Activity {
    /// Still generating, call again
    Running,
    /// Stopped and pins released
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Family {
    Pwm,
    SquareWave,
    Dac,
}

impl Family {
    const fn name(self) -> &'static str {
        match self {
            Self::Pwm => "pwm",
            Self::SquareWave => "square wave",
            Self::Dac => "dac",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Waveform {
    Pwm(PwmTiming),
    Square(Nco),
    Duty(DutyAccumulator),
}

impl Waveform {
    fn build(family: Family, value: u32, param: u32, clock_hz: u32) -> Option<Self> {
        match family {
            Family::Pwm => Some(Self::Pwm(PwmTiming::new(
                micros_to_ticks(param, clock_hz),
                micros_to_ticks(value, clock_hz),
            ))),
            Family::SquareWave => Nco::new(value, clock_hz).ok().map(Self::Square),
            Family::Dac => {
                let bits = engine::check_resolution(u8::try_from(param).ok()?).ok()?;
                let value = value & ((1u32 << bits) - 1);
                DutyAccumulator::new(value, bits).ok().map(Self::Duty)
            }
        }
    }

    const fn level(&self, elapsed: u32) -> Level {
        match self {
            Self::Pwm(timing) => timing.level(elapsed),
            Self::Square(nco) => nco.level(elapsed),
            Self::Duty(duty) => duty.level(elapsed),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ChannelRun {
    pin: Option<Pin>,
    value: u32,
    param: u32,
    waveform: Option<Waveform>,
    anchor: u32,
}

/// Generator loop for one launched execution context
///
/// Call [`service`](Self::service) repeatedly (or [`run`](Self::run) to loop
/// until stopped). Each pass picks up channel changes published by the handle
/// and updates the output register for the current tick.
pub struct Worker<'a, X: PinBank + Clock> {
    control: &'a SignalControl,
    port: Port<X>,
    family: Family,
    generation: u32,
    channels: [ChannelRun; CHANNELS_PER_GENERATOR],
    started: u32,
    finished: bool,
}

impl<'a, X: PinBank + Clock> Worker<'a, X> {
    fn new(control: &'a SignalControl, context: X, family: Family, generation: u32) -> Self {
        let started = context.now();
        Self {
            control,
            port: Port::new(context),
            family,
            generation,
            channels: [ChannelRun::default(); CHANNELS_PER_GENERATOR],
            started,
            finished: false,
        }
    }

    /// The launched context's clock frequency
    pub fn frequency(&self) -> u32 {
        self.port.bank().frequency()
    }

    fn claimed(&self) -> u32 {
        self.channels
            .iter()
            .filter_map(|run| run.pin)
            .fold(0, |mask, pin| mask | pin.mask())
    }

    /// Run one pass: apply channel changes, then drive the pins for this tick
    pub fn service(&mut self) -> Activity {
        if self.finished {
            return Activity::Finished;
        }
        if self.control.lifecycle.should_stop(self.generation) {
            self.shutdown();
            return Activity::Finished;
        }

        let param = self.control.param();
        let clock_hz = self.port.bank().frequency();
        let now = self.port.bank().now();
        let before = self.claimed();

        let mut high = 0u32;
        for (slot, run) in self.control.channels.iter().zip(self.channels.iter_mut()) {
            let (pin, value) = slot.load();
            let pin = pin.filter(|pin| pin.number() < X::PIN_COUNT);

            if pin != run.pin {
                debug!("{} channel moved to pin {}", self.family.name(), pin.map_or(-1, |p| i32::from(p.number())));
                run.pin = pin;
            }
            if run.pin.is_some() && (run.waveform.is_none() || value != run.value || param != run.param) {
                run.value = value;
                run.param = param;
                run.waveform = Waveform::build(self.family, value, param, clock_hz);
                run.anchor = if self.family == Family::Pwm { self.started } else { now };
            }

            if let (Some(pin), Some(waveform)) = (run.pin, run.waveform) {
                if waveform.level(now.wrapping_sub(run.anchor)).is_high() {
                    high |= pin.mask();
                }
            }
        }

        // A restart may have reset the slots while they were read
        if self.control.lifecycle.should_stop(self.generation) {
            self.shutdown();
            return Activity::Finished;
        }

        let claimed = self.claimed();
        let released = before & !claimed;
        let bank = self.port.bank_mut();
        let dir = bank.read_dir();
        let out = bank.read_out();
        let next_out = (out & !(claimed | released)) | high;
        let next_dir = (dir & !released) | claimed;
        if next_out != out {
            bank.write_out(next_out);
        }
        if next_dir != dir {
            bank.write_dir(next_dir);
        }
        Activity::Running
    }

    /// Service until the handle stops the generator
    pub fn run(mut self) {
        while self.service() == Activity::Running {
            core::hint::spin_loop();
        }
    }

    fn shutdown(&mut self) {
        // The context is the worker's alone, so every pin it drives goes back to input
        let bank = self.port.bank_mut();
        bank.write_out(0);
        bank.write_dir(0);
        for run in &mut self.channels {
            run.pin = None;
            run.waveform = None;
        }
        self.finished = true;
        self.control.lifecycle.worker_exit(self.generation);
        info!("{} stopped, pins released", self.family.name());
    }
}

impl<X: PinBank + Clock> Drop for Worker<'_, X> {
    fn drop(&mut self) {
        if !self.finished {
            self.shutdown();
        }
    }
}

/// Claim a family and a context for a new generator
pub(crate) fn start<'a, L: Launch>(
    control: &'a SignalControl,
    launcher: &'a L,
    family: Family,
    param: u32,
) -> Result<Worker<'a, L::Context<'a>>> {
    let generation = control.lifecycle.try_start()?;
    let context = match launcher.launch() {
        Ok(context) => context,
        Err(error) => {
            control.lifecycle.abandon(generation);
            return Err(error);
        }
    };
    control.reset(param);
    info!("{} started", family.name());
    Ok(Worker::new(control, context, family, generation))
}

/// Caller-side half shared by the family handles
pub(crate) struct Handle<'a> {
    control: &'a SignalControl,
    generation: u32,
    pin_count: u8,
}

impl<'a> Handle<'a> {
    pub(crate) fn new<X: PinBank + Clock>(control: &'a SignalControl, worker: &Worker<'a, X>) -> Self {
        Self {
            control,
            generation: worker.generation,
            pin_count: X::PIN_COUNT,
        }
    }

    pub(crate) fn set(&self, channel: Channel, pin: Pin, value: u32) -> Result<()> {
        if pin.number() >= self.pin_count {
            return Err(Error::PinOutOfRange {
                pin: pin.number(),
                count: self.pin_count,
            });
        }
        self.control.channels[channel.index()].store(Some(pin), value);
        Ok(())
    }

    pub(crate) fn release(&self, channel: Channel) {
        self.control.channels[channel.index()].store(None, 0);
    }

    pub(crate) fn set_param(&self, param: u32) {
        self.control
            .param
            .store(param, core::sync::atomic::Ordering::Release);
    }

    pub(crate) fn param(&self) -> u32 {
        self.control.param()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.control.lifecycle.is_running(self.generation)
    }
}

impl Drop for Handle<'_> {
    fn drop(&mut self) {
        self.control.lifecycle.request_stop(self.generation);
    }
}
