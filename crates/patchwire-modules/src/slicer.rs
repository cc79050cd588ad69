//! Rhythmic gate that chops an audio signal on an eight-step pattern.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use patchwire_core::{
    Emission, Module, ModuleError, ParamDescriptor, ParamUnit, ParamValue, PortDescriptor, StepKind,
};

use crate::clock::{STEPS, StepClock, step_interval};
use crate::params::{ParamSet, delegate_params};

const AUDIO: &[PortDescriptor] = &[PortDescriptor::audio("audio")];

const BPM: usize = 0;
const DEPTH: usize = 1;
const SEQUENCE: usize = 2;
const IS_PLAYING: usize = 3;
const LEVEL: usize = 4;

const PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::number("bpm", "BPM", ParamUnit::Bpm, 30.0, 300.0),
    ParamDescriptor::number("depth", "Depth", ParamUnit::None, 0.0, 1.0),
    ParamDescriptor::steps("sequence", "Pattern", STEPS, StepKind::Gate),
    ParamDescriptor::flag("isPlaying", "Playing"),
    ParamDescriptor::number("level", "Level", ParamUnit::None, 0.0, 1.0).read_only(),
];

/// Slicer steps run at eighth notes: two per beat.
const STEPS_PER_BEAT: f64 = 2.0;

/// Audio gate.
///
/// While its transport runs, every step sets the output level to `1.0` for
/// an open gate and `1.0 - depth` for a closed one. Stopping resets the
/// level to `1.0`.
#[derive(Debug, Clone)]
pub struct Slicer {
    params: ParamSet,
    clock: StepClock,
    playing: bool,
}

impl Default for Slicer {
    fn default() -> Self {
        Self::new()
    }
}

impl Slicer {
    /// Creates an all-open pattern at 120 BPM, full depth, transport off.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(
                PARAMS,
                vec![
                    ParamValue::Number(120.0),
                    ParamValue::Number(1.0),
                    ParamValue::List(vec![ParamValue::Number(1.0); STEPS]),
                    ParamValue::Flag(false),
                    ParamValue::Number(1.0),
                ],
            ),
            clock: StepClock::new(),
            playing: false,
        }
    }

    /// Current gate level.
    pub fn level(&self) -> f64 {
        self.params.number(LEVEL)
    }

    fn transport(&self) -> bool {
        self.params.flag(IS_PLAYING)
    }

    fn gate_open(&self, step: usize) -> bool {
        self.params
            .steps(SEQUENCE)
            .get(step)
            .and_then(ParamValue::as_number)
            .is_some_and(|gate| gate != 0.0)
    }

    fn open(&mut self) {
        self.params.set(LEVEL, ParamValue::Number(1.0));
    }
}

impl Module for Slicer {
    fn kind(&self) -> &'static str {
        "slicer"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        AUDIO
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        AUDIO
    }

    delegate_params!();

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        match (index, value.as_flag()) {
            (IS_PLAYING, Some(true)) => self.clock.reset(),
            (IS_PLAYING, Some(false)) => self.open(),
            (BPM, _) if self.transport() => self.clock.reset(),
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
        self.open();
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn advance(&mut self, seconds: f64) -> Vec<Emission> {
        if self.playing && self.transport() {
            let interval = step_interval(self.params.number(BPM), STEPS_PER_BEAT);
            if let Some(&step) = self.clock.advance(seconds, interval).last() {
                let level = if self.gate_open(step) {
                    1.0
                } else {
                    1.0 - self.params.number(DEPTH)
                };
                self.params.set(LEVEL, ParamValue::Number(level));
            }
        }
        Vec::new()
    }
}
