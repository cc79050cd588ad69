//! One-shot signal generators and the state machine that rebuilds them.
//!
//! A [`Generator`] is single use: once stopped it cannot run again. The
//! owning module keeps it in a [`GeneratorSlot`], which constructs a fresh
//! generator every time it enters [`GeneratorState::Running`].

use core::f64::consts::PI;
use libm::{floor, sin};

/// Generator waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Pure fundamental.
    #[default]
    Sine,
    /// 50% duty cycle.
    Square,
    /// Rising ramp.
    Sawtooth,
    /// Symmetric ramp.
    Triangle,
}

impl Waveform {
    /// Names accepted by the `waveform` parameter, in declaration order.
    pub const NAMES: &'static [&'static str] = &["sine", "square", "sawtooth", "triangle"];

    /// Parameter name of this waveform.
    pub const fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    /// Parses a waveform name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sine" => Some(Waveform::Sine),
            "square" => Some(Waveform::Square),
            "sawtooth" => Some(Waveform::Sawtooth),
            "triangle" => Some(Waveform::Triangle),
            _ => None,
        }
    }

    /// Value at normalized `phase` in `[0, 1)`, in `[-1, 1]`.
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => sin(2.0 * PI * phase),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
        }
    }
}

/// A running tone source.
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    serial: u64,
    /// Normalized phase [0.0, 1.0)
    phase: f64,
    frequency: f64,
    waveform: Waveform,
}

impl Generator {
    fn new(serial: u64, waveform: Waveform, frequency: f64) -> Self {
        Self {
            serial,
            phase: 0.0,
            frequency,
            waveform,
        }
    }

    /// Build number; each start produces a new one.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Normalized phase.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Output value at the current phase.
    pub fn value(&self) -> f64 {
        self.waveform.sample(self.phase)
    }

    fn advance(&mut self, seconds: f64) {
        let phase = self.phase + self.frequency * seconds;
        self.phase = if phase.is_finite() { phase - floor(phase) } else { 0.0 };
    }
}

/// Lifecycle of a generator slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GeneratorState {
    /// Never started.
    #[default]
    Idle,
    /// Producing signal.
    Running(Generator),
    /// Started once and stopped since; the old generator is gone.
    Stopped,
}

/// Holds the current generator and the settings the next one is built with.
#[derive(Debug, Clone, Default)]
pub struct GeneratorSlot {
    state: GeneratorState,
    waveform: Waveform,
    frequency: f64,
    built: u64,
}

impl GeneratorSlot {
    /// An idle slot that will build generators with these settings.
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            state: GeneratorState::Idle,
            waveform,
            frequency,
            built: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// The running generator, if any.
    pub fn generator(&self) -> Option<&Generator> {
        match &self.state {
            GeneratorState::Running(generator) => Some(generator),
            _ => None,
        }
    }

    /// Whether a generator is running.
    pub fn is_running(&self) -> bool {
        matches!(self.state, GeneratorState::Running(_))
    }

    /// Number of generators built so far.
    pub fn built(&self) -> u64 {
        self.built
    }

    /// Frequency the slot holds, running or not.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Waveform the slot holds, running or not.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Enters `Running` with a freshly built generator. No-op while running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.built += 1;
        self.state = GeneratorState::Running(Generator::new(
            self.built,
            self.waveform,
            self.frequency,
        ));
    }

    /// Enters `Stopped`, discarding the generator. No-op unless running.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.state = GeneratorState::Stopped;
        }
    }

    /// Changes the frequency now and for future generators.
    pub fn set_frequency(&mut self, hz: f64) {
        self.frequency = hz;
        if let GeneratorState::Running(generator) = &mut self.state {
            generator.frequency = hz;
        }
    }

    /// Changes the waveform now and for future generators.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        if let GeneratorState::Running(generator) = &mut self.state {
            generator.waveform = waveform;
        }
    }

    /// Accumulates phase on the running generator.
    pub fn advance(&mut self, seconds: f64) {
        if let GeneratorState::Running(generator) = &mut self.state {
            generator.advance(seconds);
        }
    }
}
