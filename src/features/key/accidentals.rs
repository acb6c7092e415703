//! Rare accidental removal
//!
//! Out-of-key notes that occur as rarely as the rarest pitch of the piece are
//! more likely misdetections than real accidentals.

use super::detector::KeyEstimate;
use crate::analysis::result::NoteEvent;

/// Drop rare out-of-key notes
///
/// Let `lowest` be the smallest occurrence count of any pitch. When
/// `lowest < total_notes / 12`, every note whose pitch class is outside the
/// estimated key and whose pitch occurs exactly `lowest` times is removed.
///
/// # Returns
///
/// Number of notes removed
pub fn remove_accidentals(notes: &mut Vec<NoteEvent>, estimate: &KeyEstimate) -> usize {
    let Some(&lowest) = estimate.occurrences.values().min() else {
        return 0;
    };

    if lowest >= estimate.total_notes / 12 {
        return 0;
    }

    let before = notes.len();
    notes.retain(|note| {
        estimate.key.contains(note.pitch.class())
            || estimate.occurrences.get(&note.pitch).copied() != Some(lowest)
    });
    let removed = before - notes.len();

    if removed > 0 {
        log::debug!(
            "Removed {} accidental(s) outside {} (occurring {} time(s))",
            removed,
            estimate.key,
            lowest
        );
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::key::estimate_key;
    use crate::features::pitch::Pitch;

    fn notes_for(midi: &[u8]) -> Vec<NoteEvent> {
        midi.iter()
            .enumerate()
            .filter_map(|(i, &m)| Pitch::from_midi(m).map(|p| (i, p)))
            .map(|(i, pitch)| NoteEvent::new(pitch, i as u64 * 12, 70, i as f64 * 250.0))
            .collect()
    }

    fn c_major_with(extra: &[u8]) -> Vec<u8> {
        let mut midi = Vec::new();
        for _ in 0..4 {
            midi.extend([60, 62, 64, 65, 67, 69, 71]);
        }
        midi.extend(extra);
        midi
    }

    #[test]
    fn test_rare_out_of_key_note_is_removed() {
        // 28 in-key notes and one F#4: total 29, threshold 2, lowest 1
        let mut notes = notes_for(&c_major_with(&[66]));
        let pitches: Vec<Pitch> = notes.iter().map(|n| n.pitch).collect();
        let estimate = estimate_key(&pitches).unwrap();

        let removed = remove_accidentals(&mut notes, &estimate);

        assert_eq!(removed, 1);
        assert_eq!(notes.len(), 28);
        assert!(notes.iter().all(|n| estimate.key.contains(n.pitch.class())));
    }

    #[test]
    fn test_rare_in_key_note_is_kept() {
        // C5 occurs once but belongs to the key
        let mut notes = notes_for(&c_major_with(&[72]));
        let pitches: Vec<Pitch> = notes.iter().map(|n| n.pitch).collect();
        let estimate = estimate_key(&pitches).unwrap();

        assert_eq!(remove_accidentals(&mut notes, &estimate), 0);
        assert_eq!(notes.len(), 29);
    }

    #[test]
    fn test_short_pieces_keep_everything() {
        // 8 notes: threshold 8 / 12 = 0
        let mut notes = notes_for(&[60, 62, 64, 65, 67, 69, 71, 66]);
        let pitches: Vec<Pitch> = notes.iter().map(|n| n.pitch).collect();
        let estimate = estimate_key(&pitches).unwrap();

        assert_eq!(remove_accidentals(&mut notes, &estimate), 0);
        assert_eq!(notes.len(), 8);
    }
}
