//! Note-triggered sample player.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use patchwire_core::{
    Emission, Module, ModuleError, Note, ParamDescriptor, ParamUnit, ParamValue, PortDescriptor,
    SignalEvent, SignalKind,
};

use crate::params::{ParamSet, delegate_params};

const INPUTS: &[PortDescriptor] = &[PortDescriptor::trigger("trigger")];
const OUTPUTS: &[PortDescriptor] = &[PortDescriptor::audio("audio")];

const SAMPLE: usize = 0;
const START: usize = 1;
const RATE: usize = 2;
const VOICES: usize = 4;

const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::text("sample", "Sample"),
    ParamDescriptor::number("start", "Start", ParamUnit::Percent, 0.0, 100.0),
    ParamDescriptor::number("rate", "Rate", ParamUnit::None, 0.0, 2.0),
    ParamDescriptor::number("gain", "Volume", ParamUnit::None, 0.0, 1.0),
    ParamDescriptor::number("voices", "Voices", ParamUnit::None, 0.0, 13.0).read_only(),
];

/// The sample plays at its recorded speed for this note.
pub const ROOT_NOTE: Note = Note::A;

/// Playback-rate bounds applied to every voice.
pub const RATE_LIMITS: (f64, f64) = (0.1, 4.0);

/// One sounding note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Note that started the voice.
    pub note: Note,
    /// Playback speed relative to the recording.
    pub rate: f64,
    /// Start offset as a fraction of the sample length.
    pub offset: f64,
}

/// Sample player.
///
/// `sample` names the audio resource; the sampler refuses to start
/// without one. Each note-on starts a voice pitched relative to A4 (one
/// voice per note, a repeated note restarts it). Any note-off, or losing
/// the trigger connection, silences every voice.
#[derive(Debug, Clone)]
pub struct Sampler {
    params: ParamSet,
    voices: Vec<Voice>,
    playing: bool,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Creates a sampler with no sample assigned.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(
                PARAMS,
                vec![
                    ParamValue::text(""),
                    ParamValue::Number(0.0),
                    ParamValue::Number(1.0),
                    ParamValue::Number(1.0),
                    ParamValue::Number(0.0),
                ],
            ),
            voices: Vec::new(),
            playing: false,
        }
    }

    /// Sounding voices, oldest first.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn play(&mut self, note: Note, octave_shift: i32) {
        let (low, high) = RATE_LIMITS;
        let rate = note.frequency_shifted(octave_shift) / ROOT_NOTE.frequency()
            * self.params.number(RATE);
        let rate = if rate.is_finite() { rate.clamp(low, high) } else { 1.0 };
        self.voices.retain(|voice| voice.note != note);
        self.voices.push(Voice {
            note,
            rate,
            offset: self.params.number(START) / 100.0,
        });
        self.sync_voice_count();
    }

    fn silence(&mut self) {
        self.voices.clear();
        self.sync_voice_count();
    }

    fn sync_voice_count(&mut self) {
        self.params
            .set(VOICES, ParamValue::Number(self.voices.len() as f64));
    }
}

impl Module for Sampler {
    fn kind(&self) -> &'static str {
        "sampler"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        OUTPUTS
    }

    delegate_params!();

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        self.params.set(index, value);
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        if self.params.text(SAMPLE).is_empty() {
            return Err(ModuleError::MissingResource {
                kind: "sampler",
                resource: "sample",
            });
        }
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.silence();
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn release_input(&mut self, port: usize, signal: SignalKind) -> Vec<Emission> {
        if port == 0 && signal == SignalKind::Trigger {
            self.silence();
        }
        Vec::new()
    }

    fn receive(&mut self, port: usize, event: SignalEvent) -> Vec<Emission> {
        match (port, event) {
            (0, SignalEvent::NoteOn { note, octave_shift }) if self.playing => {
                self.play(note, octave_shift);
            }
            (0, SignalEvent::NoteOff) => self.silence(),
            _ => {}
        }
        Vec::new()
    }
}
