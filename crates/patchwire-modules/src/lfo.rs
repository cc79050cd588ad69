//! Low-frequency oscillator for vibrato and tremolo.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use patchwire_core::{Emission, Module, ModuleError, ParamDescriptor, ParamUnit, ParamValue, PortDescriptor};

use crate::generator::{GeneratorSlot, Waveform};
use crate::params::{ParamSet, delegate_params};

const OUTPUTS: &[PortDescriptor] = &[PortDescriptor::modulation("modulation")];

const WAVEFORM: usize = 0;
const RATE: usize = 1;
const DEPTH: usize = 2;
const VALUE: usize = 3;

const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::choice("waveform", "Wave", Waveform::NAMES),
    ParamDescriptor::number("rate", "Rate", ParamUnit::Hertz, 0.1, 20.0),
    ParamDescriptor::number("depth", "Depth", ParamUnit::Percent, 0.0, 100.0),
    ParamDescriptor::number("value", "Value", ParamUnit::None, -1.0, 1.0).read_only(),
];

/// Modulation source.
///
/// Its only output is a frequency-modulation port. The port decides where
/// an LFO may be wired (an oscillator's frequency input or any audio input)
/// but carries no events: the graph schedules notes, not audio-rate signals.
/// The current modulation is metered on the read-only `value` parameter,
/// refreshed on every clock tick. Like the oscillator it rebuilds its
/// generator on every start.
#[derive(Debug, Clone)]
pub struct Lfo {
    params: ParamSet,
    slot: GeneratorSlot,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Lfo {
    /// Creates a stopped square LFO at 2 Hz, 50% depth.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(
                PARAMS,
                vec![
                    ParamValue::text(Waveform::Square.name()),
                    ParamValue::Number(2.0),
                    ParamValue::Number(50.0),
                    ParamValue::Number(0.0),
                ],
            ),
            slot: GeneratorSlot::new(Waveform::Square, 2.0),
        }
    }

    /// Depth as a fraction in `[0, 1]`.
    pub fn depth(&self) -> f64 {
        self.params.number(DEPTH) / 100.0
    }

    /// Current modulation value in `[-depth, depth]`, or 0 when stopped.
    pub fn value(&self) -> f64 {
        self.slot
            .generator()
            .map_or(0.0, |generator| generator.value() * self.depth())
    }

    /// Generator slot, for inspecting the run state.
    pub fn generator(&self) -> &GeneratorSlot {
        &self.slot
    }

    fn meter(&mut self) {
        let value = self.value();
        self.params.set(VALUE, ParamValue::Number(value));
    }
}

impl Module for Lfo {
    fn kind(&self) -> &'static str {
        "lfo"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        &[]
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        OUTPUTS
    }

    delegate_params!();

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        match index {
            WAVEFORM => {
                if let Some(waveform) = value.as_text().and_then(Waveform::from_name) {
                    self.slot.set_waveform(waveform);
                }
            }
            RATE => {
                if let Some(hz) = value.as_number() {
                    self.slot.set_frequency(hz);
                }
            }
            _ => {}
        }
        self.params.set(index, value);
        self.meter();
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        self.slot.start();
        self.meter();
        Ok(())
    }

    fn stop(&mut self) {
        self.slot.stop();
        self.meter();
    }

    fn is_playing(&self) -> bool {
        self.slot.is_running()
    }

    fn advance(&mut self, seconds: f64) -> Vec<Emission> {
        self.slot.advance(seconds);
        self.meter();
        Vec::new()
    }
}
