//! Port descriptors, signal kinds, and the events that travel along
//! realized connections.
//!
//! Every port carries a [`SignalKind`]. Legality of a connection is decided
//! structurally from the kinds of the two ports involved, never from the
//! concrete module type on either end.

use crate::note::Note;

/// What travels through a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Continuous audio.
    Audio,
    /// Pitch / frequency control (keyboard output, oscillator frequency input).
    Control,
    /// Discrete note on / note off events.
    Trigger,
    /// Low-frequency modulation, routed to a frequency or amplitude target.
    FrequencyModulation,
}

impl SignalKind {
    /// Returns `true` if an output of kind `self` may drive an input of kind `input`.
    ///
    /// Equal kinds always connect. A [`FrequencyModulation`](Self::FrequencyModulation)
    /// output may additionally drive a [`Control`](Self::Control) input (vibrato)
    /// or an [`Audio`](Self::Audio) input (tremolo).
    ///
    /// ```rust
    /// use patchwire_core::SignalKind;
    ///
    /// assert!(SignalKind::Audio.can_drive(SignalKind::Audio));
    /// assert!(SignalKind::FrequencyModulation.can_drive(SignalKind::Control));
    /// assert!(!SignalKind::Trigger.can_drive(SignalKind::Audio));
    /// ```
    pub const fn can_drive(self, input: SignalKind) -> bool {
        matches!(
            (self, input),
            (SignalKind::Audio, SignalKind::Audio)
                | (SignalKind::Control, SignalKind::Control)
                | (SignalKind::Trigger, SignalKind::Trigger)
                | (
                    SignalKind::FrequencyModulation,
                    SignalKind::FrequencyModulation
                        | SignalKind::Control
                        | SignalKind::Audio
                )
        )
    }

    /// Lowercase name used in messages and listings.
    pub const fn name(self) -> &'static str {
        match self {
            SignalKind::Audio => "audio",
            SignalKind::Control => "control",
            SignalKind::Trigger => "trigger",
            SignalKind::FrequencyModulation => "frequency-modulation",
        }
    }
}

impl core::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of a module a port sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Consumes a signal.
    Input,
    /// Produces a signal.
    Output,
}

impl Direction {
    /// The opposite side.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }
}

/// A declared connection point on a module.
///
/// Port lists are fixed for the lifetime of a module; ports are addressed by
/// their index in the declared list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Port name for display (e.g. `"audio"`, `"frequency"`).
    pub name: &'static str,
    /// Signal carried by the port.
    pub signal: SignalKind,
}

impl PortDescriptor {
    /// An audio port.
    pub const fn audio(name: &'static str) -> Self {
        Self {
            name,
            signal: SignalKind::Audio,
        }
    }

    /// A pitch / frequency control port.
    pub const fn control(name: &'static str) -> Self {
        Self {
            name,
            signal: SignalKind::Control,
        }
    }

    /// A note trigger port.
    pub const fn trigger(name: &'static str) -> Self {
        Self {
            name,
            signal: SignalKind::Trigger,
        }
    }

    /// A low-frequency modulation port.
    pub const fn modulation(name: &'static str) -> Self {
        Self {
            name,
            signal: SignalKind::FrequencyModulation,
        }
    }
}

/// A discrete event delivered along realized connections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SignalEvent {
    /// Start a note, shifted by whole octaves from the base octave.
    NoteOn {
        /// Note to play.
        note: Note,
        /// Octave offset relative to the keyboard's base octave.
        octave_shift: i32,
    },
    /// Release whatever note is playing.
    NoteOff,
    /// Drive a frequency target to this value in Hz. `0.0` silences it.
    Pitch(f64),
}

/// An event produced by a module on one of its output ports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
    /// Output port index the event leaves from.
    pub port: usize,
    /// The event itself.
    pub event: SignalEvent,
}

impl Emission {
    /// Creates an emission on the given output port.
    pub const fn new(port: usize, event: SignalEvent) -> Self {
        Self { port, event }
    }
}
