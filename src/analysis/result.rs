//! Transcription result types

use super::metadata::TranscriptionMetadata;
use crate::features::pitch::{Pitch, PitchClass};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u8),
    /// Natural minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u8),
}

impl Key {
    /// All 24 keys: majors C..B, then minors C..B
    pub const ALL: [Key; 24] = [
        Key::Major(0),
        Key::Major(1),
        Key::Major(2),
        Key::Major(3),
        Key::Major(4),
        Key::Major(5),
        Key::Major(6),
        Key::Major(7),
        Key::Major(8),
        Key::Major(9),
        Key::Major(10),
        Key::Major(11),
        Key::Minor(0),
        Key::Minor(1),
        Key::Minor(2),
        Key::Minor(3),
        Key::Minor(4),
        Key::Minor(5),
        Key::Minor(6),
        Key::Minor(7),
        Key::Minor(8),
        Key::Minor(9),
        Key::Minor(10),
        Key::Minor(11),
    ];

    /// Tonic pitch class
    pub fn tonic(&self) -> PitchClass {
        match self {
            Key::Major(i) | Key::Minor(i) => PitchClass::new(*i),
        }
    }

    /// True for major keys
    pub fn is_major(&self) -> bool {
        matches!(self, Key::Major(_))
    }

    /// The seven pitch classes of the key's scale, starting at the tonic
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_transcribe::analysis::result::Key;
    ///
    /// let names: Vec<&str> = Key::Minor(9).scale().iter().map(|c| c.name()).collect();
    /// assert_eq!(names, ["A", "B", "C", "D", "E", "F", "G"]);
    /// ```
    pub fn scale(&self) -> [PitchClass; 7] {
        let steps = if self.is_major() {
            &MAJOR_STEPS
        } else {
            &MINOR_STEPS
        };
        let tonic = self.tonic();
        let mut classes = [tonic; 7];
        for (class, &step) in classes.iter_mut().zip(steps.iter()) {
            *class = tonic.transpose(step);
        }
        classes
    }

    /// Whether a pitch class belongs to the key's scale
    pub fn contains(&self, class: PitchClass) -> bool {
        self.scale().contains(&class)
    }

    /// Relative major/minor sharing the same scale
    pub fn relative(&self) -> Key {
        match self {
            Key::Major(i) => Key::Minor((i + 9) % 12),
            Key::Minor(i) => Key::Major((i + 3) % 12),
        }
    }

    /// Key name (e.g., "C Major", "F# Minor")
    pub fn name(&self) -> String {
        let mode = if self.is_major() { "Major" } else { "Minor" };
        format!("{} {}", self.tonic().name(), mode)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Offset state of a note event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteOffset {
    /// Not yet computed
    Unset,
    /// Reopened for extension by a later segment
    Open,
    /// Finalized offset tick
    Closed(u64),
}

/// One transcribed note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Quantized pitch
    pub pitch: Pitch,

    /// Onset in MIDI ticks
    pub onset_tick: u64,

    /// Offset state
    pub offset: NoteOffset,

    /// MIDI velocity (50-90 with the default configuration)
    pub velocity: u8,

    /// Onset time in milliseconds
    pub onset_ms: f64,

    /// Sounding length in seconds the offset was derived from
    pub length_seconds: f64,
}

impl NoteEvent {
    /// Create a note with an unset offset
    pub fn new(pitch: Pitch, onset_tick: u64, velocity: u8, onset_ms: f64) -> Self {
        Self {
            pitch,
            onset_tick,
            offset: NoteOffset::Unset,
            velocity,
            onset_ms,
            length_seconds: 0.0,
        }
    }

    /// Finalized offset tick, if any
    pub fn offset_tick(&self) -> Option<u64> {
        match self.offset {
            NoteOffset::Closed(tick) => Some(tick),
            _ => None,
        }
    }

    /// Close the note; offsets before the onset are clamped to the onset
    pub fn close_at(&mut self, tick: u64) {
        self.offset = NoteOffset::Closed(tick.max(self.onset_tick));
    }

    /// Mark the note as open for extension
    pub fn reopen(&mut self) {
        self.offset = NoteOffset::Open;
    }

    /// Duration in ticks once closed
    pub fn duration_ticks(&self) -> Option<u64> {
        self.offset_tick().map(|off| off - self.onset_tick)
    }
}

/// Non-fatal conditions recorded during transcription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptionFlag {
    /// Segment had no dominant spectral peak; treated as a rest
    DegenerateSegment {
        /// Onset sample of the segment
        onset_sample: usize,
    },
    /// No key could be estimated; accidental removal skipped
    KeyIndeterminate,
    /// Rare out-of-key notes were dropped
    AccidentalsRemoved {
        /// Number of notes removed
        count: usize,
    },
    /// Slicing artifacts were merged into earlier notes
    DuplicatesMerged {
        /// Number of notes absorbed
        count: usize,
    },
}

/// Result of transcribing one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelTranscription {
    /// Notes sorted by onset tick, then pitch
    pub notes: Vec<NoteEvent>,

    /// Estimated key, `None` when undetermined
    pub key: Option<Key>,

    /// Onset sample indices used for segmentation
    pub onsets: Vec<usize>,

    /// Silence boundary sample indices
    pub silences: Vec<usize>,

    /// Conditions recorded for this channel
    pub flags: Vec<TranscriptionFlag>,
}

/// Complete transcription result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Merged notes of all channels, sorted by onset tick
    pub notes: Vec<NoteEvent>,

    /// Estimated key (first channel with a determined key)
    pub key: Option<Key>,

    /// Per-channel results, in input order
    pub channels: Vec<ChannelTranscription>,

    /// Transcription metadata
    pub metadata: TranscriptionMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::Major(0).name(), "C Major");
        assert_eq!(Key::Major(6).name(), "F# Major");
        assert_eq!(Key::Minor(9).name(), "A Minor");
        assert_eq!(Key::Minor(1).to_string(), "C# Minor");
    }

    #[test]
    fn test_every_scale_has_seven_distinct_classes() {
        for key in Key::ALL {
            let scale = key.scale();
            let mut values: Vec<u8> = scale.iter().map(|c| c.value()).collect();
            values.sort_unstable();
            values.dedup();
            assert_eq!(values.len(), 7, "{} scale is not 7 distinct classes", key);
            assert_eq!(scale[0], key.tonic());
        }
    }

    #[test]
    fn test_c_major_scale() {
        let names: Vec<&str> = Key::Major(0).scale().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["C", "D", "E", "F", "G", "A", "B"]);
        assert!(!Key::Major(0).contains(PitchClass::new(6)));
    }

    #[test]
    fn test_relative_keys_share_scale() {
        for key in Key::ALL {
            let relative = key.relative();
            assert_ne!(key.is_major(), relative.is_major());
            assert_eq!(relative.relative(), key);
            for class in key.scale() {
                assert!(relative.contains(class));
            }
        }
        assert_eq!(Key::Major(0).relative(), Key::Minor(9));
    }

    #[test]
    fn test_note_close_clamps_to_onset() {
        let pitch = Pitch::from_midi(69).unwrap();
        let mut note = NoteEvent::new(pitch, 100, 70, 2083.3);
        assert_eq!(note.offset, NoteOffset::Unset);
        assert_eq!(note.duration_ticks(), None);

        note.close_at(40);
        assert_eq!(note.offset_tick(), Some(100));

        note.reopen();
        assert_eq!(note.offset, NoteOffset::Open);
        note.close_at(148);
        assert_eq!(note.duration_ticks(), Some(48));
    }
}
