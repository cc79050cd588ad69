//! Recording module used by unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::module::{Module, ModuleError};
use crate::param::{ParamDescriptor, ParamUnit, ParamValue};
use crate::signal::{Emission, PortDescriptor, SignalEvent, SignalKind};

const INPUTS: &[PortDescriptor] = &[
    PortDescriptor::audio("in"),
    PortDescriptor::trigger("trigger"),
    PortDescriptor::control("frequency"),
];

const OUTPUTS: &[PortDescriptor] = &[
    PortDescriptor::audio("out"),
    PortDescriptor::trigger("trigger"),
    PortDescriptor::control("frequency"),
];

const SINK_INPUTS: &[PortDescriptor] = &[PortDescriptor::audio("in")];

/// Everything that happened to a probe.
#[derive(Default, Debug)]
pub struct ProbeLog {
    pub starts: usize,
    pub stops: usize,
    pub connects: Vec<(usize, usize)>,
    pub disconnects: Vec<(usize, usize)>,
    pub released: Vec<(usize, SignalKind)>,
    pub received: Vec<(usize, SignalEvent)>,
}

/// Shared view of a probe's log that survives boxing the probe.
#[derive(Clone, Default)]
pub struct ProbeHandle(Arc<Mutex<ProbeLog>>);

impl ProbeHandle {
    pub fn log(&self) -> MutexGuard<'_, ProbeLog> {
        self.0.lock().unwrap()
    }
}

/// Test module that records every call made on it.
///
/// Events received on input `n` are relayed out of output `n`, so chains of
/// probes pass events along. A pulsing probe emits `NoteOff` on its trigger
/// output each time it advances.
pub struct Probe {
    kind: &'static str,
    playing: bool,
    fail_start: bool,
    pulse: bool,
    level: f64,
    handle: ProbeHandle,
}

impl Probe {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            playing: false,
            fail_start: kind == "broken",
            pulse: false,
            level: 1.0,
            handle: ProbeHandle::default(),
        }
    }

    pub fn pulsing(mut self) -> Self {
        self.pulse = true;
        self
    }

    pub fn handle(&self) -> ProbeHandle {
        self.handle.clone()
    }
}

impl Module for Probe {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        if self.kind == "sink" { SINK_INPUTS } else { INPUTS }
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        if self.kind == "sink" { &[] } else { OUTPUTS }
    }

    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::number(
                "level",
                "Level",
                ParamUnit::None,
                0.0,
                1.0,
            )),
            1 => Some(
                ParamDescriptor::number("received", "Received", ParamUnit::None, 0.0, 1e9)
                    .read_only(),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> Option<ParamValue> {
        match index {
            0 => Some(ParamValue::Number(self.level)),
            1 => Some(ParamValue::Number(self.handle.log().received.len() as f64)),
            _ => None,
        }
    }

    fn apply_param(&mut self, index: usize, value: ParamValue) {
        if let (0, Some(v)) = (index, value.as_number()) {
            self.level = v;
        }
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        if self.fail_start {
            return Err(ModuleError::Backend("probe refused".into()));
        }
        if !self.playing {
            self.handle.log().starts += 1;
            self.playing = true;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.playing {
            self.handle.log().stops += 1;
            self.playing = false;
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn connect_to(
        &mut self,
        _target: &mut dyn Module,
        from_port: usize,
        to_port: usize,
    ) -> Option<SignalEvent> {
        self.handle.log().connects.push((from_port, to_port));
        None
    }

    fn disconnect_from(&mut self, _target: &mut dyn Module, from_port: usize, to_port: usize) {
        self.handle.log().disconnects.push((from_port, to_port));
    }

    fn release_input(&mut self, port: usize, signal: SignalKind) -> Vec<Emission> {
        self.handle.log().released.push((port, signal));
        Vec::new()
    }

    fn receive(&mut self, port: usize, event: SignalEvent) -> Vec<Emission> {
        self.handle.log().received.push((port, event));
        if port < self.outputs().len() {
            vec![Emission::new(port, event)]
        } else {
            Vec::new()
        }
    }

    fn advance(&mut self, _seconds: f64) -> Vec<Emission> {
        if self.pulse {
            vec![Emission::new(1, SignalEvent::NoteOff)]
        } else {
            Vec::new()
        }
    }
}

/// Factory for `probe`, `sink` (single audio input), and `broken` (refuses
/// to start) kinds.
pub fn probe_factory(kind: &str) -> Option<Box<dyn Module>> {
    let kind = ["probe", "sink", "broken"].into_iter().find(|k| *k == kind)?;
    Some(Box::new(Probe::new(kind)))
}
