//! Fixed pitch catalogue
//!
//! Equal-tempered pitches from C0 (MIDI 12, 16.35 Hz) to B7 (MIDI 107,
//! 3951 Hz), tuned to A4 = 440 Hz. Catalogue order is ascending frequency, so
//! neighbouring entries bracket any in-range frequency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Lowest MIDI note number in the catalogue (C0)
pub const LOWEST_MIDI: u8 = 12;

/// Highest MIDI note number in the catalogue (B7)
pub const HIGHEST_MIDI: u8 = 107;

/// Number of pitches in the catalogue
pub const PITCH_COUNT: usize = (HIGHEST_MIDI - LOWEST_MIDI + 1) as usize;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Octave-independent pitch class (0 = C, 1 = C#, ..., 11 = B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Create a pitch class, wrapping values above 11
    pub const fn new(value: u8) -> Self {
        Self(value % 12)
    }

    /// Semitones above C
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Pitch class `semitones` above this one
    pub const fn transpose(self, semitones: u8) -> Self {
        Self::new(self.0 + semitones % 12)
    }

    /// Note name without octave (e.g., "C#")
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A catalogue pitch, identified by its MIDI note number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pitch(u8);

/// The full catalogue, lowest to highest
pub static CATALOGUE: [Pitch; PITCH_COUNT] = build_catalogue();

const fn build_catalogue() -> [Pitch; PITCH_COUNT] {
    let mut pitches = [Pitch(LOWEST_MIDI); PITCH_COUNT];
    let mut i = 0;
    while i < PITCH_COUNT {
        pitches[i] = Pitch(LOWEST_MIDI + i as u8);
        i += 1;
    }
    pitches
}

fn frequency_table() -> &'static [f64; PITCH_COUNT] {
    static TABLE: OnceLock<[f64; PITCH_COUNT]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0; PITCH_COUNT];
        for (i, freq) in table.iter_mut().enumerate() {
            let midi = LOWEST_MIDI as f64 + i as f64;
            *freq = 440.0 * 2f64.powf((midi - 69.0) / 12.0);
        }
        table
    })
}

impl Pitch {
    /// Look up a pitch by MIDI note number
    ///
    /// Returns `None` outside the catalogue range (12..=107).
    pub fn from_midi(number: u8) -> Option<Self> {
        (LOWEST_MIDI..=HIGHEST_MIDI)
            .contains(&number)
            .then_some(Self(number))
    }

    /// Lowest catalogue pitch (C0)
    pub const fn lowest() -> Self {
        Self(LOWEST_MIDI)
    }

    /// Highest catalogue pitch (B7)
    pub const fn highest() -> Self {
        Self(HIGHEST_MIDI)
    }

    /// MIDI note number
    pub const fn midi_number(self) -> u8 {
        self.0
    }

    /// Position in [`CATALOGUE`]
    pub const fn index(self) -> usize {
        (self.0 - LOWEST_MIDI) as usize
    }

    /// Fundamental frequency in Hz
    pub fn frequency(self) -> f64 {
        frequency_table()[self.index()]
    }

    /// Octave-independent pitch class
    pub const fn class(self) -> PitchClass {
        PitchClass::new(self.0)
    }

    /// Scientific pitch notation octave (A4 = 440 Hz)
    pub const fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// Label such as "A4" or "C#3"
    pub fn name(self) -> String {
        self.to_string()
    }

    /// Next lower catalogue pitch
    pub fn below(self) -> Option<Self> {
        Self::from_midi(self.0.checked_sub(1)?)
    }

    /// Next higher catalogue pitch
    pub fn above(self) -> Option<Self> {
        Self::from_midi(self.0.checked_add(1)?)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class().name(), self.octave())
    }
}

/// Catalogue frequencies in ascending order
pub fn frequencies() -> &'static [f64] {
    frequency_table()
}
