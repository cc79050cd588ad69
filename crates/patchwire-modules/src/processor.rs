//! Audio-path modules with numeric settings only.
//!
//! Gain, delay, and reverb shape the signal; destination, visualizer, and
//! spectrum only consume or observe it. None of them reacts to events, so a
//! single table-driven [`Processor`] covers all six kinds.

use patchwire_core::{Module, ModuleError, ParamDescriptor, ParamUnit, ParamValue, PortDescriptor};

use crate::params::{ParamSet, delegate_params};

const AUDIO: &[PortDescriptor] = &[PortDescriptor::audio("audio")];

/// Static description of a processor kind.
#[derive(Debug)]
pub struct ProcessorKind {
    /// Kind tag.
    pub name: &'static str,
    /// Input ports.
    pub inputs: &'static [PortDescriptor],
    /// Output ports.
    pub outputs: &'static [PortDescriptor],
    /// Parameter descriptors.
    pub params: &'static [ParamDescriptor],
    /// Default value per descriptor.
    pub defaults: &'static [f64],
}

/// Output level.
pub static GAIN: ProcessorKind = ProcessorKind {
    name: "gain",
    inputs: AUDIO,
    outputs: AUDIO,
    params: &[ParamDescriptor::number("gain", "Gain", ParamUnit::None, 0.0, 1.0)],
    defaults: &[0.5],
};

/// Feedback delay line.
pub static DELAY: ProcessorKind = ProcessorKind {
    name: "delay",
    inputs: AUDIO,
    outputs: AUDIO,
    params: &[
        ParamDescriptor::number("mix", "Mix", ParamUnit::None, 0.0, 1.0),
        ParamDescriptor::number("time", "Time", ParamUnit::Seconds, 0.01, 2.0),
        ParamDescriptor::number("feedback", "Feedback", ParamUnit::None, 0.0, 0.95),
    ],
    defaults: &[0.5, 0.3, 0.7],
};

/// Convolution-style reverb.
pub static REVERB: ProcessorKind = ProcessorKind {
    name: "reverb",
    inputs: AUDIO,
    outputs: AUDIO,
    params: &[
        ParamDescriptor::number("mix", "Mix", ParamUnit::None, 0.0, 1.0),
        ParamDescriptor::number("decay", "Decay", ParamUnit::Seconds, 0.1, 5.0),
    ],
    defaults: &[0.5, 2.0],
};

/// The speakers.
pub static DESTINATION: ProcessorKind = ProcessorKind {
    name: "destination",
    inputs: AUDIO,
    outputs: &[],
    params: &[],
    defaults: &[],
};

/// Oscilloscope view, passes audio through.
pub static VISUALIZER: ProcessorKind = ProcessorKind {
    name: "visualizer",
    inputs: AUDIO,
    outputs: AUDIO,
    params: &[],
    defaults: &[],
};

/// Spectrum analyzer view, passes audio through.
pub static SPECTRUM: ProcessorKind = ProcessorKind {
    name: "spectrum",
    inputs: AUDIO,
    outputs: AUDIO,
    params: &[],
    defaults: &[],
};

/// A module described entirely by a [`ProcessorKind`].
///
/// ```rust
/// use patchwire_core::{Module, ParamValue};
/// use patchwire_modules::Processor;
///
/// let delay = Processor::delay();
/// assert_eq!(delay.parameter("feedback"), Some(ParamValue::Number(0.7)));
/// ```
#[derive(Debug, Clone)]
pub struct Processor {
    kind: &'static ProcessorKind,
    params: ParamSet,
    playing: bool,
}

impl Processor {
    /// Creates a stopped processor with default settings.
    pub fn new(kind: &'static ProcessorKind) -> Self {
        let defaults = kind.defaults.iter().copied().map(ParamValue::Number).collect();
        Self {
            kind,
            params: ParamSet::new(kind.params, defaults),
            playing: false,
        }
    }

    /// A gain stage.
    pub fn gain() -> Self {
        Self::new(&GAIN)
    }

    /// A delay.
    pub fn delay() -> Self {
        Self::new(&DELAY)
    }

    /// A reverb.
    pub fn reverb() -> Self {
        Self::new(&REVERB)
    }

    /// The audio output.
    pub fn destination() -> Self {
        Self::new(&DESTINATION)
    }

    /// A waveform display.
    pub fn visualizer() -> Self {
        Self::new(&VISUALIZER)
    }

    /// A spectrum display.
    pub fn spectrum() -> Self {
        Self::new(&SPECTRUM)
    }

    /// Numeric setting by name.
    pub fn setting(&self, name: &str) -> Option<f64> {
        self.find_param(name).map(|i| self.params.number(i))
    }
}

impl Module for Processor {
    fn kind(&self) -> &'static str {
        self.kind.name
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        self.kind.inputs
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        self.kind.outputs
    }

    delegate_params!();

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        self.params.set(index, value);
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
