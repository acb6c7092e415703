//! Per-channel transcription pipeline
//!
//! Segmentation → per-segment pitch extraction → sustain tracking → key-based
//! accidental filtering → duplicate merge → sorted note list.

use super::duplicates::merge_duplicates;
use super::result::{ChannelTranscription, NoteEvent, TranscriptionFlag};
use super::timing::{velocity_for_amplitude, TickClock};
use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use crate::features::key::{estimate_key, remove_accidentals};
use crate::features::onset::{detect_onsets, note_end};
use crate::features::pitch::{Pitch, PitchEstimator};
use crate::features::sustain::SustainTracker;
use crate::preprocessing::silence::detect_silences;
use crate::signal::Signal;
use std::collections::BTreeSet;

/// Transcribe one channel into note events
///
/// # Arguments
///
/// * `samples` - Channel samples (normalized to [-1.0, 1.0])
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Transcription configuration
///
/// # Returns
///
/// Notes sorted by onset tick, the estimated key and the segmentation used
///
/// # Errors
///
/// Returns `TranscriptionError::InvalidInput` for an empty signal, a zero
/// sample rate, an invalid configuration or a channel without onsets.
///
/// # Example
///
/// ```no_run
/// use stratum_transcribe::analysis::pipeline::transcribe_channel;
/// use stratum_transcribe::config::TranscriptionConfig;
///
/// let samples: Vec<f64> = (0..44100)
///     .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 44100.0).sin())
///     .collect();
/// let channel = transcribe_channel(&samples, 44100, &TranscriptionConfig::default())?;
/// println!("{} notes", channel.notes.len());
/// # Ok::<(), stratum_transcribe::TranscriptionError>(())
/// ```
pub fn transcribe_channel(
    samples: &[f64],
    sample_rate: u32,
    config: &TranscriptionConfig,
) -> Result<ChannelTranscription, TranscriptionError> {
    config.validate()?;
    let signal = Signal::new(samples, sample_rate)?;

    let onsets = detect_onsets(signal.samples(), config)?;
    if onsets.is_empty() {
        return Err(TranscriptionError::InvalidInput(
            "no note onsets detected in channel".to_string(),
        ));
    }
    let silences = detect_silences(signal.samples(), config);

    log::debug!(
        "Transcribing {:.2}s channel: {} onsets, {} silences",
        signal.duration_seconds(),
        onsets.len(),
        silences.len()
    );

    let estimator = PitchEstimator::new(config)?;
    let tracker = SustainTracker::new(&estimator, config);
    let clock = TickClock::new(sample_rate, config);

    let mut notes: Vec<NoteEvent> = Vec::new();
    let mut seen: BTreeSet<Pitch> = BTreeSet::new();
    let mut flags = Vec::new();

    for (index, &onset) in onsets.iter().enumerate() {
        let segment_end = onsets.get(index + 1).copied().unwrap_or(signal.len());
        let segment = &signal.samples()[onset..segment_end];
        let end = note_end(&onsets, &silences, index, signal.len());

        let velocity = velocity_for_amplitude(signal.samples()[onset], config);
        let peaks = estimator.analyze_segment(segment, sample_rate)?;

        if peaks.is_degenerate() {
            log::warn!("No dominant peak in segment at sample {}; treating as rest", onset);
            flags.push(TranscriptionFlag::DegenerateSegment {
                onset_sample: onset,
            });
            continue;
        }

        let dominant = peaks.dominant_pitches();
        apply_sustain(
            &tracker,
            &clock,
            &mut notes,
            &peaks.secondary_pitches(),
            &dominant,
            &seen,
            segment,
            sample_rate,
        );

        let onset_tick = clock.ticks_for_sample(onset);
        let offset_tick = clock.ticks_for_sample(end);
        let onset_ms = clock.sample_to_ms(onset);
        let length_seconds = (end - onset) as f64 * signal.sampling_period();

        for &pitch in &dominant {
            let mut note = NoteEvent::new(pitch, onset_tick, velocity, onset_ms);
            note.length_seconds = length_seconds;
            note.close_at(offset_tick);
            notes.push(note);
        }
        seen.extend(dominant);
    }

    let pitches: Vec<Pitch> = notes.iter().map(|n| n.pitch).collect();
    let key = match estimate_key(&pitches) {
        Some(estimate) => {
            let removed = remove_accidentals(&mut notes, &estimate);
            if removed > 0 {
                flags.push(TranscriptionFlag::AccidentalsRemoved { count: removed });
            }
            Some(estimate.key)
        }
        None => {
            log::warn!("Key could not be estimated; skipping accidental removal");
            flags.push(TranscriptionFlag::KeyIndeterminate);
            None
        }
    };

    let merged = merge_duplicates(&mut notes);
    if merged > 0 {
        flags.push(TranscriptionFlag::DuplicatesMerged { count: merged });
    }

    log::debug!(
        "Channel transcribed: {} notes, key {}",
        notes.len(),
        key.map_or_else(|| "undetermined".to_string(), |k| k.name())
    );

    Ok(ChannelTranscription {
        notes,
        key,
        onsets,
        silences,
        flags,
    })
}

/// Extend earlier notes still ringing under the current segment
///
/// A secondary pitch qualifies when it is not dominant in this segment but
/// was dominant in an earlier one. Each pitch is extended at most once per
/// segment, always on its most recent note.
///
/// # Returns
///
/// Number of notes whose length changed
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_sustain(
    tracker: &SustainTracker<'_>,
    clock: &TickClock,
    notes: &mut [NoteEvent],
    secondary: &[Pitch],
    dominant: &BTreeSet<Pitch>,
    seen: &BTreeSet<Pitch>,
    segment: &[f64],
    sample_rate: u32,
) -> usize {
    let mut handled = BTreeSet::new();
    let mut extended = 0;

    for &pitch in secondary {
        if dominant.contains(&pitch) || !seen.contains(&pitch) || !handled.insert(pitch) {
            continue;
        }
        let Some(note) = notes.iter_mut().rev().find(|n| n.pitch == pitch) else {
            continue;
        };

        let previous = note.offset_tick();
        note.reopen();

        let prior = note.length_seconds;
        let revised = tracker.extend_if_present(pitch, segment, prior, sample_rate);

        if revised > prior {
            note.length_seconds = revised;
            note.close_at(clock.ticks_for_seconds(note.onset_ms / 1000.0 + revised));
            extended += 1;
        } else {
            match previous {
                Some(tick) => note.close_at(tick),
                None => note.close_at(clock.ticks_for_seconds(note.onset_ms / 1000.0 + prior)),
            }
        }
    }

    extended
}
