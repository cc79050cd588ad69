//! Patchwire Modules - the module kinds of the patchwire modular editor
//!
//! Every type here implements [`patchwire_core::Module`]:
//!
//! - [`Oscillator`] - Tone source with a pitch-controlled frequency input
//! - [`Lfo`] - Modulation source for vibrato and tremolo
//! - [`Processor`] - Gain, delay, reverb, destination, visualizer, spectrum
//! - [`Keyboard`] - Turns note events into pitch, with sustain
//! - [`Sequencer`] - Eight-step note sequencer with per-step octaves
//! - [`Slicer`] - Eight-step audio gate
//! - [`Sampler`] - Note-triggered sample player
//!
//! Tone sources keep their generator in a [`GeneratorSlot`], an explicit
//! `Idle -> Running -> Stopped` state machine that builds a fresh
//! [`Generator`] on every start.
//!
//! ## Example
//!
//! ```rust
//! use patchwire_core::{Module, Note, SignalEvent};
//! use patchwire_modules::{Keyboard, Oscillator};
//!
//! let mut kbd = Keyboard::new();
//! let mut osc = Oscillator::new();
//!
//! for emission in kbd.receive(0, SignalEvent::NoteOn { note: Note::C5, octave_shift: 0 }) {
//!     osc.receive(0, emission.event);
//! }
//! assert_eq!(osc.live_frequency(), 523.25);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod params;

pub mod clock;
pub mod generator;
pub mod keyboard;
pub mod lfo;
pub mod oscillator;
pub mod processor;
pub mod sampler;
pub mod sequencer;
pub mod slicer;

pub use clock::{STEPS, StepClock};
pub use generator::{Generator, GeneratorSlot, GeneratorState, Waveform};
pub use keyboard::Keyboard;
pub use lfo::Lfo;
pub use oscillator::Oscillator;
pub use params::ParamSet;
pub use processor::{Processor, ProcessorKind};
pub use sampler::{Sampler, Voice};
pub use sequencer::Sequencer;
pub use slicer::Slicer;
