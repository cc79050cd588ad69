//! Tone oscillator with a pitch-controlled frequency input.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use patchwire_core::{
    Emission, Module, ModuleError, ParamDescriptor, ParamUnit, ParamValue, PortDescriptor,
    SignalEvent, SignalKind,
};

use crate::generator::{GeneratorSlot, Waveform};
use crate::params::{ParamSet, delegate_params};

const INPUTS: &[PortDescriptor] = &[PortDescriptor::control("frequency")];
const OUTPUTS: &[PortDescriptor] = &[PortDescriptor::audio("audio")];

const WAVEFORM: usize = 0;
const FREQUENCY: usize = 1;
const LIVE_FREQUENCY: usize = 2;

const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::choice("waveform", "Wave", Waveform::NAMES),
    ParamDescriptor::number("frequency", "Frequency", ParamUnit::Hertz, 20.0, 2000.0),
    ParamDescriptor::number("live_frequency", "Live Frequency", ParamUnit::Hertz, 0.0, 20000.0)
        .read_only(),
];

/// Default frequency in Hz (A4).
pub const DEFAULT_FREQUENCY: f64 = 440.0;

/// Audio oscillator.
///
/// `frequency` is the knob setting. `live_frequency` is what the oscillator
/// is actually producing: it follows the knob, and is overridden by pitch
/// events arriving on the `frequency` input. Removing the last pitch
/// connection into that input parks the live frequency at 0 Hz until the
/// knob moves or a new pitch arrives. Modulation connections never carry
/// pitch, so removing one leaves the frequency alone.
///
/// ```rust
/// use patchwire_core::{Module, ParamValue};
/// use patchwire_modules::Oscillator;
///
/// let mut osc = Oscillator::new();
/// osc.set_parameter("frequency", ParamValue::Number(220.0)).unwrap();
/// assert_eq!(osc.live_frequency(), 220.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    params: ParamSet,
    slot: GeneratorSlot,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator {
    /// Creates a stopped sine oscillator at 440 Hz.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(
                PARAMS,
                vec![
                    ParamValue::text(Waveform::Sine.name()),
                    ParamValue::Number(DEFAULT_FREQUENCY),
                    ParamValue::Number(DEFAULT_FREQUENCY),
                ],
            ),
            slot: GeneratorSlot::new(Waveform::Sine, DEFAULT_FREQUENCY),
        }
    }

    /// Frequency currently produced, in Hz.
    pub fn live_frequency(&self) -> f64 {
        self.slot.frequency()
    }

    /// Generator slot, for inspecting the run state.
    pub fn generator(&self) -> &GeneratorSlot {
        &self.slot
    }

    fn set_live(&mut self, hz: f64) {
        self.slot.set_frequency(hz);
        self.params.set(LIVE_FREQUENCY, ParamValue::Number(hz));
    }
}

impl Module for Oscillator {
    fn kind(&self) -> &'static str {
        "oscillator"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        INPUTS
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
            FREQUENCY => {
                if let Some(hz) = value.as_number() {
                    self.set_live(hz);
                }
            }
            _ => {}
        }
        self.params.set(index, value);
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        self.slot.start();
        Ok(())
    }

    fn stop(&mut self) {
        self.slot.stop();
    }

    fn is_playing(&self) -> bool {
        self.slot.is_running()
    }

    fn release_input(&mut self, port: usize, signal: SignalKind) -> Vec<Emission> {
        if port == 0 && signal == SignalKind::Control {
            self.set_live(0.0);
        }
        Vec::new()
    }

    fn receive(&mut self, port: usize, event: SignalEvent) -> Vec<Emission> {
        if let (0, SignalEvent::Pitch(hz)) = (port, event) {
            self.set_live(hz);
        }
        Vec::new()
    }

    fn advance(&mut self, seconds: f64) -> Vec<Emission> {
        self.slot.advance(seconds);
        Vec::new()
    }
}
