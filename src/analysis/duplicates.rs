//! Slicing artifact merge
//!
//! A sustained note cut by a spurious onset shows up as two notes of the same
//! pitch where the first ends on the exact tick the second starts. The second
//! note is absorbed into the first.

use super::result::NoteEvent;
use crate::features::pitch::Pitch;
use std::collections::HashMap;

/// Merge same-pitch notes that abut exactly
///
/// For notes `a` and `b` of the same pitch with `a.offset == b.onset`, `b` is
/// removed and `a` takes `b`'s offset. Repeats until no such pair remains, so
/// merging an already merged list changes nothing. The result is sorted with
/// [`sort_notes`].
///
/// # Returns
///
/// Number of notes absorbed
pub fn merge_duplicates(notes: &mut Vec<NoteEvent>) -> usize {
    let mut total = 0;
    loop {
        let merged = merge_pass(notes);
        if merged == 0 {
            break;
        }
        total += merged;
    }

    sort_notes(notes);

    if total > 0 {
        log::debug!("Merged {} sliced note(s)", total);
    }
    total
}

fn merge_pass(notes: &mut Vec<NoteEvent>) -> usize {
    notes.sort_by(|a, b| {
        a.pitch
            .cmp(&b.pitch)
            .then(a.onset_tick.cmp(&b.onset_tick))
            .then(a.offset_tick().cmp(&b.offset_tick()))
    });

    let mut kept: Vec<NoteEvent> = Vec::with_capacity(notes.len());
    // (pitch, offset tick) of kept notes that can still absorb a successor
    let mut ends: HashMap<(Pitch, u64), usize> = HashMap::new();
    let mut merged = 0;

    for note in notes.drain(..) {
        match ends.remove(&(note.pitch, note.onset_tick)) {
            Some(index) => {
                let target = &mut kept[index];
                target.offset = note.offset;
                target.length_seconds += note.length_seconds;
                if let Some(end) = target.offset_tick() {
                    ends.insert((target.pitch, end), index);
                }
                merged += 1;
            }
            None => {
                if let Some(end) = note.offset_tick() {
                    ends.insert((note.pitch, end), kept.len());
                }
                kept.push(note);
            }
        }
    }

    *notes = kept;
    merged
}

/// Sort notes by onset tick, then pitch
pub fn sort_notes(notes: &mut [NoteEvent]) {
    notes.sort_by(|a, b| {
        a.onset_tick
            .cmp(&b.onset_tick)
            .then(a.pitch.cmp(&b.pitch))
            .then(a.offset_tick().cmp(&b.offset_tick()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(midi: u8, onset: u64, offset: u64) -> NoteEvent {
        let mut n = NoteEvent::new(Pitch::from_midi(midi).unwrap(), onset, 70, 0.0);
        n.close_at(offset);
        n
    }

    #[test]
    fn test_abutting_same_pitch_notes_merge() {
        let mut notes = vec![note(69, 0, 16), note(69, 16, 32), note(69, 32, 48)];
        assert_eq!(merge_duplicates(&mut notes), 2);
        assert_eq!(notes, vec![note(69, 0, 48)]);
    }

    #[test]
    fn test_different_pitch_or_gap_does_not_merge() {
        let mut notes = vec![note(69, 0, 16), note(71, 16, 32), note(69, 17, 32)];
        assert_eq!(merge_duplicates(&mut notes), 0);
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut notes = vec![
            note(60, 30, 40),
            note(64, 0, 10),
            note(60, 10, 20),
            note(60, 20, 30),
            note(64, 10, 25),
            note(67, 5, 9),
        ];
        merge_duplicates(&mut notes);
        let once = notes.clone();

        assert_eq!(merge_duplicates(&mut notes), 0);
        assert_eq!(notes, once);
        assert_eq!(
            once,
            vec![note(64, 0, 25), note(67, 5, 9), note(60, 10, 40)]
        );
    }

    #[test]
    fn test_output_sorted_by_onset() {
        let mut notes = vec![note(72, 20, 30), note(60, 0, 5), note(64, 0, 10)];
        merge_duplicates(&mut notes);
        let onsets: Vec<(u64, u8)> = notes
            .iter()
            .map(|n| (n.onset_tick, n.pitch.midi_number()))
            .collect();
        assert_eq!(onsets, vec![(0, 60), (0, 64), (20, 72)]);
    }
}
