//! Patches bundled with the library, available without any files on disk.

use crate::GraphDocument;

/// Names of the built-in patches.
pub static FACTORY_PATCH_NAMES: &[&str] = &["default", "sequenced_bass", "sliced_drone"];

static FACTORY_PATCHES_JSON: &[(&str, &str)] = &[
    ("default", DEFAULT_PATCH),
    ("sequenced_bass", SEQUENCED_BASS_PATCH),
    ("sliced_drone", SLICED_DRONE_PATCH),
];

/// Keyboard into a sine oscillator, through gain to the speakers.
const DEFAULT_PATCH: &str = r#"{
  "modules": [
    { "id": "module-0", "type": "keyboard", "x": 40.0, "y": 120.0,
      "settings": { "sustain": true } },
    { "id": "module-1", "type": "oscillator", "x": 280.0, "y": 120.0,
      "settings": { "waveform": "sine", "frequency": 440.0 } },
    { "id": "module-2", "type": "gain", "x": 520.0, "y": 120.0,
      "settings": { "gain": 0.5 } },
    { "id": "module-3", "type": "destination", "x": 760.0, "y": 120.0 }
  ],
  "connections": [
    { "from": "module-0", "to": "module-1", "fromPort": 0, "toPort": 0 },
    { "from": "module-1", "to": "module-2", "fromPort": 0, "toPort": 0 },
    { "from": "module-2", "to": "module-3", "fromPort": 0, "toPort": 0 }
  ],
  "autoplay": false
}"#;

/// Sequencer walking a bass line through a sawtooth and a delay.
const SEQUENCED_BASS_PATCH: &str = r#"{
  "modules": [
    { "id": "module-0", "type": "sequencer", "x": 40.0, "y": 40.0,
      "settings": {
        "bpm": 110.0,
        "sequence": ["C", "", "C", "D#", "", "G", "F", ""],
        "octaves": [2.0, 2.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0],
        "isPlaying": true
      } },
    { "id": "module-1", "type": "keyboard", "x": 40.0, "y": 240.0,
      "settings": { "sustain": false } },
    { "id": "module-2", "type": "oscillator", "x": 280.0, "y": 240.0,
      "settings": { "waveform": "sawtooth", "frequency": 110.0 } },
    { "id": "module-3", "type": "delay", "x": 520.0, "y": 240.0,
      "settings": { "mix": 0.3, "time": 0.27, "feedback": 0.4 } },
    { "id": "module-4", "type": "destination", "x": 760.0, "y": 240.0 }
  ],
  "connections": [
    { "from": "module-0", "to": "module-1" },
    { "from": "module-1", "to": "module-2" },
    { "from": "module-2", "to": "module-3" },
    { "from": "module-3", "to": "module-4" }
  ],
  "autoplay": false
}"#;

/// Low triangle drone with vibrato, chopped by the slicer into a reverb.
const SLICED_DRONE_PATCH: &str = r#"{
  "modules": [
    { "id": "module-0", "type": "lfo", "x": 40.0, "y": 40.0,
      "settings": { "waveform": "sine", "rate": 0.5, "depth": 20.0 } },
    { "id": "module-1", "type": "oscillator", "x": 40.0, "y": 240.0,
      "settings": { "waveform": "triangle", "frequency": 110.0 } },
    { "id": "module-2", "type": "slicer", "x": 280.0, "y": 240.0,
      "settings": {
        "bpm": 90.0,
        "depth": 0.8,
        "sequence": [1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0],
        "isPlaying": true
      } },
    { "id": "module-3", "type": "reverb", "x": 520.0, "y": 240.0,
      "settings": { "mix": 0.6, "decay": 3.5 } },
    { "id": "module-4", "type": "destination", "x": 760.0, "y": 240.0 }
  ],
  "connections": [
    { "from": "module-0", "to": "module-1" },
    { "from": "module-1", "to": "module-2" },
    { "from": "module-2", "to": "module-3" },
    { "from": "module-3", "to": "module-4" }
  ],
  "autoplay": false
}"#;

/// All factory patches with their names, in listing order.
pub fn factory_patches() -> Vec<(&'static str, GraphDocument)> {
    FACTORY_PATCHES_JSON
        .iter()
        .filter_map(|(name, json)| GraphDocument::from_json(json).ok().map(|doc| (*name, doc)))
        .collect()
}

/// Factory patch by name, matched case-insensitively.
///
/// ```rust
/// use patchwire_config::factory_patch;
///
/// let patch = factory_patch("Sliced_Drone").unwrap();
/// assert_eq!(patch.modules.len(), 5);
/// ```
pub fn factory_patch(name: &str) -> Option<GraphDocument> {
    FACTORY_PATCHES_JSON
        .iter()
        .find(|(patch, _)| patch.eq_ignore_ascii_case(name))
        .and_then(|(_, json)| GraphDocument::from_json(json).ok())
}

/// Names of all factory patches.
pub fn factory_patch_names() -> Vec<&'static str> {
    FACTORY_PATCH_NAMES.to_vec()
}

/// Returns true if `name` is a factory patch (case-insensitive).
pub fn is_factory_patch(name: &str) -> bool {
    FACTORY_PATCH_NAMES
        .iter()
        .any(|patch| patch.eq_ignore_ascii_case(name))
}
