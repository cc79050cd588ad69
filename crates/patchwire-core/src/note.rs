//! Note names shared by keyboards, sequencers, and samplers.
//!
//! The instrument spans one octave plus the top C: twelve chromatic notes
//! starting at middle C (C4) and `C5`. Frequencies are equal-tempered with
//! A4 = 440 Hz, rounded to two decimals.

/// A playable note on the one-octave keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Note {
    /// C4
    C,
    /// C#4
    CSharp,
    /// D4
    D,
    /// D#4
    DSharp,
    /// E4
    E,
    /// F4
    F,
    /// F#4
    FSharp,
    /// G4
    G,
    /// G#4
    GSharp,
    /// A4 (concert pitch)
    A,
    /// A#4
    ASharp,
    /// B4
    B,
    /// C5, the top key
    C5,
}

impl Note {
    /// Every note in keyboard order.
    pub const ALL: [Note; 13] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
        Note::C5,
    ];

    /// Returns the display / persistence name (`"C#"`, `"C5"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
            Note::C5 => "C5",
        }
    }

    /// Returns the frequency in Hz at the keyboard's base octave.
    pub const fn frequency(self) -> f64 {
        match self {
            Note::C => 261.63,
            Note::CSharp => 277.18,
            Note::D => 293.66,
            Note::DSharp => 311.13,
            Note::E => 329.63,
            Note::F => 349.23,
            Note::FSharp => 369.99,
            Note::G => 392.0,
            Note::GSharp => 415.3,
            Note::A => 440.0,
            Note::ASharp => 466.16,
            Note::B => 493.88,
            Note::C5 => 523.25,
        }
    }

    /// Frequency shifted by whole octaves relative to the base octave.
    ///
    /// ```rust
    /// use patchwire_core::Note;
    ///
    /// assert_eq!(Note::A.frequency_shifted(1), 880.0);
    /// assert_eq!(Note::A.frequency_shifted(-2), 110.0);
    /// ```
    pub fn frequency_shifted(self, octaves: i32) -> f64 {
        libm::ldexp(self.frequency(), octaves)
    }

    /// Parses a note name. Returns `None` for anything that is not one of
    /// the thirteen names.
    pub fn from_name(name: &str) -> Option<Note> {
        Note::ALL.iter().copied().find(|n| n.name() == name)
    }
}

impl core::fmt::Display for Note {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
