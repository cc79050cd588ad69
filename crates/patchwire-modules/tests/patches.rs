//! Module kinds wired together in a live session.

use patchwire_core::{
    Connection, GraphError, GraphSession, Module, ModuleId, Note, ParamValue, PortMismatch,
};
use patchwire_modules::{Keyboard, Lfo, Oscillator, Processor, Sampler, Sequencer, Slicer};

fn factory(kind: &str) -> Option<Box<dyn Module>> {
    let module: Box<dyn Module> = match kind {
        "oscillator" => Box::new(Oscillator::new()),
        "lfo" => Box::new(Lfo::new()),
        "gain" => Box::new(Processor::gain()),
        "destination" => Box::new(Processor::destination()),
        "keyboard" => Box::new(Keyboard::new()),
        "sequencer" => Box::new(Sequencer::new()),
        "slicer" => Box::new(Slicer::new()),
        "sampler" => Box::new(Sampler::new()),
        _ => return None,
    };
    Some(module)
}

fn param(session: &GraphSession, id: &ModuleId, name: &str) -> ParamValue {
    session.module(id).unwrap().parameter(name).unwrap()
}

fn live_frequency(session: &GraphSession, id: &ModuleId) -> f64 {
    param(session, id, "live_frequency").as_number().unwrap()
}

fn steps(notes: &[&str]) -> ParamValue {
    let mut list: Vec<ParamValue> = notes.iter().map(|n| ParamValue::text(*n)).collect();
    list.resize(8, ParamValue::text(""));
    ParamValue::List(list)
}

#[test]
fn keyboard_primes_oscillator_on_start() {
    let mut session = GraphSession::open(factory);
    let kbd = session.create_module("keyboard", 0.0, 0.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 0.0).unwrap();
    session
        .set_parameter(&osc, "frequency", ParamValue::Number(110.0))
        .unwrap();
    session.connect(Connection::new(&kbd, 0, &osc, 0)).unwrap();
    assert_eq!(live_frequency(&session, &osc), 110.0);

    session.start().unwrap();
    assert_eq!(live_frequency(&session, &osc), 440.0);
}

#[test]
fn key_press_reaches_oscillator_only_while_playing() {
    let mut session = GraphSession::open(factory);
    let kbd = session.create_module("keyboard", 0.0, 0.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 0.0).unwrap();
    session.connect(Connection::new(&kbd, 0, &osc, 0)).unwrap();

    assert_eq!(session.press_key(&kbd, Note::E).unwrap(), 0);
    assert_eq!(live_frequency(&session, &osc), 440.0);

    session.start().unwrap();
    assert_eq!(session.press_key(&kbd, Note::E).unwrap(), 1);
    assert_eq!(live_frequency(&session, &osc), 329.63);
}

#[test]
fn sequencer_drives_keyboard_and_oscillator() {
    let mut session = GraphSession::open(factory);
    let seq = session.create_module("sequencer", 0.0, 0.0).unwrap();
    let kbd = session.create_module("keyboard", 0.0, 200.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 200.0).unwrap();
    session.connect(Connection::new(&seq, 0, &kbd, 0)).unwrap();
    session.connect(Connection::new(&kbd, 0, &osc, 0)).unwrap();
    session
        .set_parameter(&seq, "sequence", steps(&["C", "G"]))
        .unwrap();

    session.start().unwrap();
    session
        .set_parameter(&seq, "isPlaying", ParamValue::Flag(true))
        .unwrap();

    session.advance(0.5);
    assert_eq!(live_frequency(&session, &osc), 261.63);
    assert_eq!(param(&session, &kbd, "note"), ParamValue::text("C"));

    session.advance(0.5);
    assert_eq!(live_frequency(&session, &osc), 392.0);
}

#[test]
fn disconnecting_sequencer_releases_held_note() {
    let mut session = GraphSession::open(factory);
    let seq = session.create_module("sequencer", 0.0, 0.0).unwrap();
    let kbd = session.create_module("keyboard", 0.0, 200.0).unwrap();
    let edge = session.connect(Connection::new(&seq, 0, &kbd, 0)).unwrap();

    session.press_key(&kbd, Note::A).unwrap();
    assert_eq!(param(&session, &kbd, "note"), ParamValue::text("A"));

    assert!(session.disconnect(&edge));
    assert_eq!(param(&session, &kbd, "note"), ParamValue::text(""));
}

#[test]
fn disconnecting_keyboard_silences_oscillator() {
    let mut session = GraphSession::open(factory);
    let kbd = session.create_module("keyboard", 0.0, 0.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 0.0).unwrap();
    let edge = session.connect(Connection::new(&kbd, 0, &osc, 0)).unwrap();
    session.start().unwrap();

    session.disconnect(&edge);
    assert_eq!(live_frequency(&session, &osc), 0.0);
    assert!(session.module(&osc).unwrap().is_playing());
}

#[test]
fn removing_lfo_keeps_keyboard_pitch() {
    let mut session = GraphSession::open(factory);
    let kbd = session.create_module("keyboard", 0.0, 0.0).unwrap();
    let lfo = session.create_module("lfo", 0.0, 200.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 0.0).unwrap();
    session.connect(Connection::new(&kbd, 0, &osc, 0)).unwrap();
    let modulation = session.connect(Connection::new(&lfo, 0, &osc, 0)).unwrap();
    session.start().unwrap();

    session.press_key(&kbd, Note::C).unwrap();
    assert_eq!(live_frequency(&session, &osc), 261.63);

    assert!(session.disconnect(&modulation));
    assert_eq!(live_frequency(&session, &osc), 261.63);
}

#[test]
fn removing_one_of_two_keyboards_keeps_pitch() {
    let mut session = GraphSession::open(factory);
    let upper = session.create_module("keyboard", 0.0, 0.0).unwrap();
    let lower = session.create_module("keyboard", 0.0, 200.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 0.0).unwrap();
    let first = session.connect(Connection::new(&upper, 0, &osc, 0)).unwrap();
    let second = session.connect(Connection::new(&lower, 0, &osc, 0)).unwrap();
    session.start().unwrap();

    session.press_key(&lower, Note::G).unwrap();
    session.disconnect(&first);
    assert_eq!(live_frequency(&session, &osc), 392.0);

    session.disconnect(&second);
    assert_eq!(live_frequency(&session, &osc), 0.0);
}

#[test]
fn huge_clock_advance_returns() {
    let mut session = GraphSession::open(factory);
    let seq = session.create_module("sequencer", 0.0, 0.0).unwrap();
    let kbd = session.create_module("keyboard", 0.0, 200.0).unwrap();
    session.connect(Connection::new(&seq, 0, &kbd, 0)).unwrap();
    session
        .set_parameter(&seq, "sequence", steps(&["C", "G"]))
        .unwrap();
    session.start().unwrap();
    session
        .set_parameter(&seq, "isPlaying", ParamValue::Flag(true))
        .unwrap();

    session.advance(1.0e18);
    session.advance(f64::MAX);
    assert!(session.module(&seq).unwrap().is_playing());

    session.stop();
    session.start().unwrap();
    session
        .set_parameter(&seq, "isPlaying", ParamValue::Flag(true))
        .unwrap();
    session.advance(0.5);
    assert_eq!(param(&session, &kbd, "note"), ParamValue::text("C"));
}

#[test]
fn lfo_value_is_metered_while_playing() {
    let mut session = GraphSession::open(factory);
    let lfo = session.create_module("lfo", 0.0, 0.0).unwrap();
    let osc = session.create_module("oscillator", 200.0, 0.0).unwrap();
    session.connect(Connection::new(&lfo, 0, &osc, 0)).unwrap();
    session.start().unwrap();
    assert_eq!(param(&session, &lfo, "value"), ParamValue::Number(0.5));

    assert_eq!(session.advance(0.3), 0);
    assert_eq!(param(&session, &lfo, "value"), ParamValue::Number(-0.5));
    assert_eq!(live_frequency(&session, &osc), 440.0);
}

#[test]
fn oscillator_rebuilds_generator_across_restarts() {
    let mut session = GraphSession::open(factory);
    let osc = session.create_module("oscillator", 0.0, 0.0).unwrap();
    for _ in 0..3 {
        session.start().unwrap();
        assert!(session.module(&osc).unwrap().is_playing());
        session.stop();
        assert!(!session.module(&osc).unwrap().is_playing());
    }
}

#[test]
fn sampler_without_sample_fails_alone() {
    let mut session = GraphSession::open(factory);
    session.create_module("oscillator", 0.0, 0.0).unwrap();
    let sampler = session.create_module("sampler", 0.0, 0.0).unwrap();
    session.create_module("destination", 0.0, 0.0).unwrap();

    let err = session.start().unwrap_err();
    assert_eq!(err.to_string(), "1 of 3 modules failed to start");
    assert_eq!(err.failures[0].0, sampler);
    assert!(session.is_playing());
}

#[test]
fn sequencer_triggers_sampler_voices() {
    let mut session = GraphSession::open(factory);
    let seq = session.create_module("sequencer", 0.0, 0.0).unwrap();
    let sampler = session.create_module("sampler", 0.0, 200.0).unwrap();
    session
        .set_parameter(&sampler, "sample", ParamValue::text("pad.wav"))
        .unwrap();
    session
        .set_parameter(&seq, "sequence", steps(&["C", "E"]))
        .unwrap();
    session.connect(Connection::new(&seq, 0, &sampler, 0)).unwrap();
    session.start().unwrap();
    session
        .set_parameter(&seq, "isPlaying", ParamValue::Flag(true))
        .unwrap();

    session.advance(0.5);
    assert_eq!(param(&session, &sampler, "voices"), ParamValue::Number(1.0));
    // note-off for C clears, then E starts
    session.advance(0.5);
    assert_eq!(param(&session, &sampler, "voices"), ParamValue::Number(1.0));
}

#[test]
fn slicer_gates_on_clock() {
    let mut session = GraphSession::open(factory);
    let slicer = session.create_module("slicer", 0.0, 0.0).unwrap();
    let gates = ParamValue::List(vec![ParamValue::Number(0.0); 8]);
    session.set_parameter(&slicer, "sequence", gates).unwrap();
    session.start().unwrap();
    session
        .set_parameter(&slicer, "isPlaying", ParamValue::Flag(true))
        .unwrap();

    session.advance(0.25);
    assert_eq!(param(&session, &slicer, "level"), ParamValue::Number(0.0));
    session.stop();
    assert_eq!(param(&session, &slicer, "level"), ParamValue::Number(1.0));
}

#[test]
fn lfo_targets_frequency_and_audio_but_not_triggers() {
    let mut session = GraphSession::open(factory);
    let lfo = session.create_module("lfo", 0.0, 0.0).unwrap();
    let osc = session.create_module("oscillator", 0.0, 0.0).unwrap();
    let gain = session.create_module("gain", 0.0, 0.0).unwrap();
    let kbd = session.create_module("keyboard", 0.0, 0.0).unwrap();

    assert!(session.connect(Connection::new(&lfo, 0, &osc, 0)).is_ok());
    assert!(session.connect(Connection::new(&lfo, 0, &gain, 0)).is_ok());
    assert!(matches!(
        session.connect(Connection::new(&lfo, 0, &kbd, 0)),
        Err(GraphError::PortTypeMismatch {
            reason: PortMismatch::Incompatible { .. },
            ..
        })
    ));
}

#[test]
fn audio_cannot_drive_frequency_input() {
    let mut session = GraphSession::open(factory);
    let a = session.create_module("oscillator", 0.0, 0.0).unwrap();
    let b = session.create_module("oscillator", 0.0, 0.0).unwrap();
    let err = session.connect(Connection::new(&a, 0, &b, 0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot connect module-0:0 -> module-1:0: audio output cannot drive control input"
    );
}

#[test]
fn invalid_parameter_is_reported_with_module() {
    let mut session = GraphSession::open(factory);
    let osc = session.create_module("oscillator", 0.0, 0.0).unwrap();
    let err = session
        .set_parameter(&osc, "frequency", ParamValue::Number(5000.0))
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidParameter { ref module, .. } if *module == osc));
}
