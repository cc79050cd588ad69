//! One-octave keyboard that turns note events into pitch.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::mem;

use patchwire_core::{
    Emission, Module, ModuleError, Note, ParamDescriptor, ParamValue, PortDescriptor, SignalEvent,
    SignalKind,
};

use crate::params::{ParamSet, delegate_params};

const INPUTS: &[PortDescriptor] = &[PortDescriptor::trigger("trigger")];
const OUTPUTS: &[PortDescriptor] = &[PortDescriptor::control("frequency")];

const SUSTAIN: usize = 0;
const NOTE: usize = 1;

const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::flag("sustain", "Sustain"),
    ParamDescriptor::text("note", "Note").read_only(),
];

/// Pitch emitted when a keyboard is first wired to a frequency input.
pub const PRIME_NOTE: Note = Note::A;

/// Keyboard module.
///
/// Note-on events (from a sequencer or a key press) set the held note and
/// send its frequency out of the `frequency` port. With sustain on, a
/// note-off keeps the last pitch sounding; with sustain off it sends
/// `Pitch(0.0)`. Losing the trigger connection always releases.
#[derive(Debug, Clone)]
pub struct Keyboard {
    params: ParamSet,
    held: Option<(Note, i32)>,
    playing: bool,
    outbox: Vec<Emission>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    /// Creates a keyboard with sustain on and no held note.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(PARAMS, vec![ParamValue::Flag(true), ParamValue::text("")]),
            held: None,
            playing: false,
            outbox: Vec::new(),
        }
    }

    /// Held note and its octave shift.
    pub fn held(&self) -> Option<(Note, i32)> {
        self.held
    }

    fn sustain(&self) -> bool {
        self.params.flag(SUSTAIN)
    }

    fn hold(&mut self, note: Note, octave_shift: i32) -> Emission {
        self.held = Some((note, octave_shift));
        self.params.set(NOTE, ParamValue::text(note.name()));
        Emission::new(0, SignalEvent::Pitch(note.frequency_shifted(octave_shift)))
    }

    fn release(&mut self) -> Option<Emission> {
        self.held.take()?;
        self.params.set(NOTE, ParamValue::text(""));
        Some(Emission::new(0, SignalEvent::Pitch(0.0)))
    }
}

impl Module for Keyboard {
    fn kind(&self) -> &'static str {
        "keyboard"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        OUTPUTS
    }

    delegate_params!();

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        let sustain_off = index == SUSTAIN && value.as_flag() == Some(false);
        self.params.set(index, value);
        if sustain_off {
            let released = self.release();
            self.outbox.extend(released);
        }
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.outbox.clear();
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn connect_to(
        &mut self,
        target: &mut dyn Module,
        _from_port: usize,
        to_port: usize,
    ) -> Option<SignalEvent> {
        (target.input_signal(to_port) == Some(SignalKind::Control))
            .then(|| SignalEvent::Pitch(PRIME_NOTE.frequency()))
    }

    fn release_input(&mut self, port: usize, signal: SignalKind) -> Vec<Emission> {
        if port != 0 || signal != SignalKind::Trigger {
            return Vec::new();
        }
        self.release().into_iter().collect()
    }

    fn receive(&mut self, port: usize, event: SignalEvent) -> Vec<Emission> {
        if port != 0 {
            return Vec::new();
        }
        match event {
            SignalEvent::NoteOn { note, octave_shift } => vec![self.hold(note, octave_shift)],
            SignalEvent::NoteOff if !self.sustain() => self.release().into_iter().collect(),
            SignalEvent::NoteOff | SignalEvent::Pitch(_) => Vec::new(),
        }
    }

    fn advance(&mut self, _seconds: f64) -> Vec<Emission> {
        mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Oscillator;

    fn note_on(note: Note, octave_shift: i32) -> SignalEvent {
        SignalEvent::NoteOn { note, octave_shift }
    }

    #[test]
    fn test_note_on_emits_shifted_pitch() {
        let mut kbd = Keyboard::new();
        let out = kbd.receive(0, note_on(Note::A, -1));
        assert_eq!(out, vec![Emission::new(0, SignalEvent::Pitch(220.0))]);
        assert_eq!(kbd.parameter("note"), Some(ParamValue::text("A")));
        assert_eq!(kbd.held(), Some((Note::A, -1)));
    }

    #[test]
    fn test_sustain_holds_through_note_off() {
        let mut kbd = Keyboard::new();
        kbd.receive(0, note_on(Note::C, 0));
        assert!(kbd.receive(0, SignalEvent::NoteOff).is_empty());
        assert_eq!(kbd.held(), Some((Note::C, 0)));
    }

    #[test]
    fn test_note_off_without_sustain_silences() {
        let mut kbd = Keyboard::new();
        kbd.set_parameter("sustain", ParamValue::Flag(false)).unwrap();
        kbd.receive(0, note_on(Note::E, 0));
        let out = kbd.receive(0, SignalEvent::NoteOff);
        assert_eq!(out, vec![Emission::new(0, SignalEvent::Pitch(0.0))]);
        assert_eq!(kbd.held(), None);
    }

    #[test]
    fn test_trigger_release_forces_note_off() {
        let mut kbd = Keyboard::new();
        kbd.receive(0, note_on(Note::G, 0));
        let out = kbd.release_input(0, SignalKind::Trigger);
        assert_eq!(out, vec![Emission::new(0, SignalEvent::Pitch(0.0))]);
        assert!(kbd.release_input(0, SignalKind::Trigger).is_empty());
    }

    #[test]
    fn test_turning_sustain_off_queues_release() {
        let mut kbd = Keyboard::new();
        kbd.receive(0, note_on(Note::D, 0));
        kbd.set_parameter("sustain", ParamValue::Flag(false)).unwrap();
        assert_eq!(
            kbd.advance(0.01),
            vec![Emission::new(0, SignalEvent::Pitch(0.0))]
        );
        assert!(kbd.advance(0.01).is_empty());
    }

    #[test]
    fn test_primes_control_inputs_only() {
        let mut kbd = Keyboard::new();
        let mut osc = Oscillator::new();
        assert_eq!(
            kbd.connect_to(&mut osc, 0, 0),
            Some(SignalEvent::Pitch(440.0))
        );
        let mut other = Keyboard::new();
        assert_eq!(kbd.connect_to(&mut other, 0, 0), None);
    }

    #[test]
    fn test_note_is_read_only() {
        let mut kbd = Keyboard::new();
        assert!(kbd.set_parameter("note", ParamValue::text("C")).is_err());
    }
}
