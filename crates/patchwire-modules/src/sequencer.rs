//! Eight-step note sequencer.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::mem;

use patchwire_core::{
    Emission, Module, ModuleError, Note, ParamDescriptor, ParamUnit, ParamValue, PortDescriptor,
    SignalEvent, StepKind,
};

use crate::clock::{STEPS, StepClock, step_interval};
use crate::params::{ParamSet, delegate_params};

const OUTPUTS: &[PortDescriptor] = &[PortDescriptor::trigger("trigger")];

const BPM: usize = 0;
const SEQUENCE: usize = 1;
const OCTAVES: usize = 2;
const IS_PLAYING: usize = 3;

const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::number("bpm", "BPM", ParamUnit::Bpm, 30.0, 300.0),
    ParamDescriptor::steps("sequence", "Sequence", STEPS, StepKind::Note),
    ParamDescriptor::steps("octaves", "Octaves", STEPS, StepKind::Octave),
    ParamDescriptor::flag("isPlaying", "Playing"),
];

/// Octave that plays notes unshifted.
pub const BASE_OCTAVE: i32 = 4;

/// Step sequencer driving keyboards through its trigger output.
///
/// The module can be started with the rest of the patch while its own
/// transport (`isPlaying`) stays off; steps only fire when both are on.
/// Each step fires one beat apart. On every step the sequencer first sends
/// a note-off if the previous step held a note, then a note-on for the
/// current step if it has one.
#[derive(Debug, Clone)]
pub struct Sequencer {
    params: ParamSet,
    clock: StepClock,
    playing: bool,
    outbox: Vec<Emission>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Creates an empty sequence at 120 BPM, transport off.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(
                PARAMS,
                vec![
                    ParamValue::Number(120.0),
                    ParamValue::List(vec![ParamValue::text(""); STEPS]),
                    ParamValue::List(vec![ParamValue::Number(f64::from(BASE_OCTAVE)); STEPS]),
                    ParamValue::Flag(false),
                ],
            ),
            clock: StepClock::new(),
            playing: false,
            outbox: Vec::new(),
        }
    }

    /// Whether the transport is running.
    pub fn transport(&self) -> bool {
        self.params.flag(IS_PLAYING)
    }

    /// Index of the step that fires next.
    pub fn position(&self) -> usize {
        self.clock.position()
    }

    /// Note at `step`, or `None` for a rest.
    pub fn note_at(&self, step: usize) -> Option<Note> {
        self.params
            .steps(SEQUENCE)
            .get(step)
            .and_then(ParamValue::as_text)
            .and_then(Note::from_name)
    }

    /// Octave shift of `step` relative to [`BASE_OCTAVE`].
    pub fn octave_shift(&self, step: usize) -> i32 {
        self.params
            .steps(OCTAVES)
            .get(step)
            .and_then(ParamValue::as_number)
            .map_or(0, |octave| octave as i32 - BASE_OCTAVE)
    }

    fn fire(&self, step: usize, out: &mut Vec<Emission>) {
        let previous = (step + STEPS - 1) % STEPS;
        if self.note_at(previous).is_some() {
            out.push(Emission::new(0, SignalEvent::NoteOff));
        }
        if let Some(note) = self.note_at(step) {
            out.push(Emission::new(
                0,
                SignalEvent::NoteOn {
                    note,
                    octave_shift: self.octave_shift(step),
                },
            ));
        }
    }
}

impl Module for Sequencer {
    fn kind(&self) -> &'static str {
        "sequencer"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        &[]
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        OUTPUTS
    }

    delegate_params!();

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        let was_running = self.transport();
        match (index, value.as_flag()) {
            (IS_PLAYING, Some(true)) => self.clock.reset(),
            (IS_PLAYING, Some(false)) if was_running => {
                self.outbox.push(Emission::new(0, SignalEvent::NoteOff));
            }
            (BPM, _) if was_running => self.clock.reset(),
            _ => {}
        }
        self.params.set(index, value);
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.params.set(IS_PLAYING, ParamValue::Flag(false));
        self.clock.reset();
        self.outbox.clear();
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn advance(&mut self, seconds: f64) -> Vec<Emission> {
        let mut out = mem::take(&mut self.outbox);
        if !self.playing || !self.transport() {
            return out;
        }
        let interval = step_interval(self.params.number(BPM), 1.0);
        for step in self.clock.advance(seconds, interval) {
            self.fire(step, &mut out);
        }
        out
    }
}
