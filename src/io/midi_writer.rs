//! Standard MIDI File export using midly
//!
//! Writes a single-track (format 0) file: a General MIDI reset SysEx, a tempo
//! meta event, then Note-On/Note-Off pairs on channel 0.

use crate::analysis::result::{Key, NoteEvent};
use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::io::Write;
use std::path::Path;

/// General MIDI System On (`F0 7E 7F 09 01 F7`), without the leading `F0`
const GM_RESET: [u8; 5] = [0x7E, 0x7F, 0x09, 0x01, 0xF7];

const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Build the in-memory SMF for a note list
fn build_smf(notes: &[NoteEvent], config: &TranscriptionConfig) -> Smf<'static> {
    let header = Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(config.ticks_per_quarter.min(0x7FFF))),
    );

    // (tick, note-off before note-on, key, message)
    let mut timed: Vec<(u64, u8, u8, MidiMessage)> = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        let key = u7::new(note.pitch.midi_number().min(127));
        let vel = u7::new(note.velocity.clamp(1, 127));
        let off = note.offset_tick().unwrap_or(note.onset_tick);
        timed.push((note.onset_tick, 1, key.as_int(), MidiMessage::NoteOn { key, vel }));
        timed.push((off, 0, key.as_int(), MidiMessage::NoteOff { key, vel: u7::new(0) }));
    }
    timed.sort_by_key(|&(tick, order, key, _)| (tick, order, key));

    let micros_per_quarter = (60_000_000.0 / config.tempo_bpm).round().clamp(1.0, 16_777_215.0);

    let mut track: Vec<TrackEvent<'static>> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::SysEx(&GM_RESET),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_quarter as u32))),
        },
    ];

    let mut last_tick = 0u64;
    for (tick, _, _, message) in timed {
        let delta = (tick - last_tick).min(MAX_DELTA as u64) as u32;
        last_tick = tick;
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(header);
    smf.tracks.push(track);
    smf
}

/// Write notes as a Standard MIDI File
///
/// # Errors
///
/// Returns `TranscriptionError::EncodingError` if writing fails.
pub fn write_midi<W: Write>(
    notes: &[NoteEvent],
    config: &TranscriptionConfig,
    writer: &mut W,
) -> Result<(), TranscriptionError> {
    build_smf(notes, config)
        .write_std(writer)
        .map_err(|e| TranscriptionError::EncodingError(format!("Failed to write MIDI: {}", e)))
}

/// Encode notes as Standard MIDI File bytes
///
/// # Errors
///
/// Returns `TranscriptionError::EncodingError` if encoding fails.
pub fn to_midi_bytes(
    notes: &[NoteEvent],
    config: &TranscriptionConfig,
) -> Result<Vec<u8>, TranscriptionError> {
    let mut bytes = Vec::new();
    write_midi(notes, config, &mut bytes)?;
    Ok(bytes)
}

/// Save notes to a `.mid` file
///
/// # Errors
///
/// Returns `TranscriptionError::EncodingError` if the file cannot be written.
pub fn save_midi<P: AsRef<Path>>(
    notes: &[NoteEvent],
    config: &TranscriptionConfig,
    path: P,
) -> Result<(), TranscriptionError> {
    let path = path.as_ref();
    build_smf(notes, config).save(path).map_err(|e| {
        TranscriptionError::EncodingError(format!("Failed to save {}: {}", path.display(), e))
    })?;
    log::debug!("Wrote {} notes to {}", notes.len(), path.display());
    Ok(())
}

/// Output file name annotated with the estimated key
///
/// # Example
///
/// ```
/// use stratum_transcribe::analysis::result::Key;
/// use stratum_transcribe::io::midi_writer::annotated_file_name;
///
/// assert_eq!(annotated_file_name("song", Some(Key::Major(0))), "song - C Major.mid");
/// assert_eq!(annotated_file_name("song", None), "song.mid");
/// ```
pub fn annotated_file_name(stem: &str, key: Option<Key>) -> String {
    match key {
        Some(key) => format!("{} - {}.mid", stem, key.name()),
        None => format!("{}.mid", stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pitch::Pitch;

    fn note(midi: u8, onset: u64, offset: u64, velocity: u8) -> NoteEvent {
        let mut n = NoteEvent::new(Pitch::from_midi(midi).unwrap(), onset, velocity, 0.0);
        n.close_at(offset);
        n
    }

    #[test]
    fn test_header_and_preamble() {
        let bytes = to_midi_bytes(&[note(69, 0, 24, 70)], &TranscriptionConfig::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(24)));
        assert_eq!(smf.tracks.len(), 1);

        let track = &smf.tracks[0];
        assert_eq!(track[0].kind, TrackEventKind::SysEx(&GM_RESET));
        assert_eq!(
            track[1].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
        );
        assert_eq!(
            track.last().map(|e| e.kind),
            Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
        );
    }

    #[test]
    fn test_note_events_are_delta_encoded() {
        let notes = [note(60, 0, 24, 70), note(64, 24, 48, 80)];
        let bytes = to_midi_bytes(&notes, &TranscriptionConfig::default()).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        let midi: Vec<(u32, MidiMessage)> = smf.tracks[0]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi { message, .. } => Some((e.delta.as_int(), message)),
                _ => None,
            })
            .collect();

        assert_eq!(
            midi,
            vec![
                (0, MidiMessage::NoteOn { key: u7::new(60), vel: u7::new(70) }),
                // Off before on at the shared tick
                (24, MidiMessage::NoteOff { key: u7::new(60), vel: u7::new(0) }),
                (0, MidiMessage::NoteOn { key: u7::new(64), vel: u7::new(80) }),
                (24, MidiMessage::NoteOff { key: u7::new(64), vel: u7::new(0) }),
            ]
        );
    }

    #[test]
    fn test_tempo_follows_config() {
        let config = TranscriptionConfig {
            tempo_bpm: 60.0,
            ..Default::default()
        };
        let bytes = to_midi_bytes(&[], &config).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(
            smf.tracks[0][1].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(1_000_000)))
        );
    }

    #[test]
    fn test_annotated_file_name() {
        assert_eq!(
            annotated_file_name("take 3", Some(Key::Minor(6))),
            "take 3 - F# Minor.mid"
        );
        assert_eq!(annotated_file_name("take 3", None), "take 3.mid");
    }
}
