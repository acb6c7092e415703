//! Key estimation by scale membership
//!
//! Every distinct pitch votes once for each key whose scale contains its
//! pitch class. The key with the most votes wins.
//!
//! A major key and its relative minor always receive the same score, so ties
//! are common. They are broken by:
//! 1. Occurrence count of the key's tonic pitch class (higher wins)
//! 2. Major before minor
//! 3. Position in [`Key::ALL`]

use crate::analysis::result::Key;
use crate::features::pitch::Pitch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key estimation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Best matching key
    pub key: Key,

    /// All 24 keys with their scores, best first
    pub scores: Vec<(Key, usize)>,

    /// Occurrence count per full pitch (octave included)
    pub occurrences: BTreeMap<Pitch, usize>,

    /// Number of pitches the estimate was computed from
    pub total_notes: usize,
}

/// Estimate the key of a sequence of played pitches
///
/// # Arguments
///
/// * `pitches` - Pitch of every note, in any order (repeats count)
///
/// # Returns
///
/// `None` when there are no pitches to match, otherwise the best key with all
/// scores and the per-pitch occurrence counts
///
/// # Example
///
/// ```
/// use stratum_transcribe::features::key::{estimate_key, Key};
/// use stratum_transcribe::features::pitch::Pitch;
///
/// // C D E F G A B
/// let pitches: Vec<Pitch> = [60, 62, 64, 65, 67, 69, 71]
///     .iter()
///     .filter_map(|&m| Pitch::from_midi(m))
///     .collect();
/// let estimate = estimate_key(&pitches).unwrap();
/// assert_eq!(estimate.key, Key::Major(0));
/// ```
pub fn estimate_key(pitches: &[Pitch]) -> Option<KeyEstimate> {
    if pitches.is_empty() {
        log::debug!("No pitches to estimate a key from");
        return None;
    }

    let mut occurrences: BTreeMap<Pitch, usize> = BTreeMap::new();
    let mut class_counts = [0usize; 12];
    for &pitch in pitches {
        *occurrences.entry(pitch).or_insert(0) += 1;
        class_counts[pitch.class().value() as usize] += 1;
    }

    let mut scores: Vec<(Key, usize)> = Key::ALL
        .iter()
        .map(|&key| {
            let score = occurrences
                .keys()
                .filter(|pitch| key.contains(pitch.class()))
                .count();
            (key, score)
        })
        .collect();

    // Stable sort: equal entries keep Key::ALL order (majors first)
    scores.sort_by(|(key_a, score_a), (key_b, score_b)| {
        score_b.cmp(score_a).then_with(|| {
            let tonic_a = class_counts[key_a.tonic().value() as usize];
            let tonic_b = class_counts[key_b.tonic().value() as usize];
            tonic_b.cmp(&tonic_a)
        })
    });

    let (key, best) = scores[0];
    log::debug!(
        "Estimated key {} (score {} of {} distinct pitches, {} notes)",
        key,
        best,
        occurrences.len(),
        pitches.len()
    );

    Some(KeyEstimate {
        key,
        scores,
        occurrences,
        total_notes: pitches.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches(midi: &[u8]) -> Vec<Pitch> {
        midi.iter().filter_map(|&m| Pitch::from_midi(m)).collect()
    }

    #[test]
    fn test_c_major_scale_beats_relative_minor() {
        let estimate = estimate_key(&pitches(&[60, 62, 64, 65, 67, 69, 71])).unwrap();
        assert_eq!(estimate.key, Key::Major(0));
        assert_eq!(estimate.scores[0].1, 7);
        // A minor ties on score and loses on major-before-minor
        assert_eq!(estimate.scores[1], (Key::Minor(9), 7));
    }

    #[test]
    fn test_tonic_emphasis_selects_relative_minor() {
        // C major pitch set with A repeated
        let estimate =
            estimate_key(&pitches(&[57, 69, 69, 60, 62, 64, 65, 67, 71, 57])).unwrap();
        assert_eq!(estimate.key, Key::Minor(9));
    }

    #[test]
    fn test_distinct_pitches_vote_once() {
        // Many repeats of one pitch do not outweigh distinct pitches
        let mut played = vec![66; 20]; // F#4
        played.extend([60, 62, 64, 65, 67, 69, 71]);
        let estimate = estimate_key(&pitches(&played)).unwrap();

        // C, G major and their relatives all score 7; tonic counts tie too
        assert_eq!(estimate.scores[0].1, 7);
        assert_eq!(estimate.key, Key::Major(0));
        assert_eq!(estimate.total_notes, 27);
        assert_eq!(estimate.occurrences[&Pitch::from_midi(66).unwrap()], 20);
    }

    #[test]
    fn test_octaves_are_separate_occurrences() {
        let estimate = estimate_key(&pitches(&[60, 72, 72])).unwrap();
        assert_eq!(estimate.occurrences.len(), 2);
        assert_eq!(estimate.occurrences[&Pitch::from_midi(72).unwrap()], 2);
    }

    #[test]
    fn test_scores_cover_all_keys() {
        let estimate = estimate_key(&pitches(&[60])).unwrap();
        assert_eq!(estimate.scores.len(), 24);
        assert!(estimate.scores.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_empty_input_is_indeterminate() {
        assert!(estimate_key(&[]).is_none());
    }
}
