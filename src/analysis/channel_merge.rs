//! Combining per-channel transcriptions

use super::duplicates::sort_notes;
use super::result::{ChannelTranscription, Key, NoteEvent};
use std::collections::HashSet;

/// Merge channel note lists into one new list
///
/// Notes are concatenated in channel order; a note whose pitch, onset and
/// offset match an already merged note (the same note heard on two channels)
/// is kept once. The result is sorted by onset tick.
pub fn merge_channels(channels: &[ChannelTranscription]) -> Vec<NoteEvent> {
    let mut merged: Vec<NoteEvent> = Vec::new();
    let mut seen = HashSet::new();

    for note in channels.iter().flat_map(|c| c.notes.iter()) {
        if seen.insert((note.pitch, note.onset_tick, note.offset)) {
            merged.push(note.clone());
        }
    }

    sort_notes(&mut merged);
    merged
}

/// Key of the first channel with a determined key
pub fn merged_key(channels: &[ChannelTranscription]) -> Option<Key> {
    channels.iter().find_map(|c| c.key)
}
