//! # Stratum Transcribe
//!
//! An audio-to-MIDI transcription engine: turns decoded audio into note
//! events (pitch, onset/offset ticks, velocity) ready for MIDI encoding.
//!
//! ## Features
//!
//! - **Segmentation**: Amplitude-peak onset tracking with silence boundaries
//! - **Pitch Estimation**: FFT peak extraction quantized to equal temperament
//! - **Sustain Tracking**: Extends notes still ringing under a new attack
//! - **Key Estimation**: Scale-membership scoring used to drop rare accidentals
//! - **MIDI Export**: Single-track Standard MIDI Files at 24 PPQ
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_transcribe::{transcribe_audio, TranscriptionConfig};
//!
//! // One sample vector per channel, normalized to [-1.0, 1.0]
//! let channels: Vec<Vec<f64>> = vec![vec![]];
//! let sample_rate = 44100;
//!
//! let result = transcribe_audio(&channels, sample_rate, TranscriptionConfig::default())?;
//!
//! for note in &result.notes {
//!     println!("{} at tick {} (velocity {})", note.pitch, note.onset_tick, note.velocity);
//! }
//! # Ok::<(), stratum_transcribe::TranscriptionError>(())
//! ```
//!
//! ## Architecture
//!
//! The transcription pipeline follows this flow, once per channel:
//!
//! ```text
//! Samples → Onsets/Silences → Segment Spectra → Sustain → Key Filter → Merge → Notes
//! ```
//!
//! Channels are transcribed independently and merged at the end.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod signal;

use rayon::prelude::*;

// Re-export main types
pub use analysis::metadata::TranscriptionMetadata;
pub use analysis::pipeline::transcribe_channel;
pub use analysis::result::{
    ChannelTranscription, Key, NoteEvent, NoteOffset, TranscriptionFlag, TranscriptionResult,
};
pub use config::TranscriptionConfig;
pub use error::TranscriptionError;
pub use features::pitch::Pitch;

/// Main transcription function
///
/// Transcribes every channel and merges the results into one note list.
///
/// # Arguments
///
/// * `channels` - One sample vector per channel, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Transcription configuration parameters
///
/// # Returns
///
/// `TranscriptionResult` with the merged notes, estimated key, per-channel
/// results and metadata
///
/// # Errors
///
/// Returns `TranscriptionError` if there are no channels, the configuration is
/// invalid, or any channel fails to transcribe (e.g., no onsets detected)
///
/// # Example
///
/// ```no_run
/// use stratum_transcribe::{transcribe_audio, TranscriptionConfig};
///
/// let tone: Vec<f64> = (0..44100)
///     .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 44100.0).sin())
///     .collect();
/// let result = transcribe_audio(&[tone], 44100, TranscriptionConfig::default())?;
/// assert_eq!(result.notes[0].pitch.name(), "A4");
/// # Ok::<(), stratum_transcribe::TranscriptionError>(())
/// ```
pub fn transcribe_audio(
    channels: &[Vec<f64>],
    sample_rate: u32,
    config: TranscriptionConfig,
) -> Result<TranscriptionResult, TranscriptionError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting transcription: {} channel(s) at {} Hz",
        channels.len(),
        sample_rate
    );

    if channels.is_empty() {
        return Err(TranscriptionError::InvalidInput(
            "No audio channels".to_string(),
        ));
    }
    config.validate()?;

    let per_channel: Vec<ChannelTranscription> = if config.parallel_channels {
        channels
            .par_iter()
            .map(|samples| transcribe_channel(samples, sample_rate, &config))
            .collect::<Result<_, _>>()?
    } else {
        channels
            .iter()
            .map(|samples| transcribe_channel(samples, sample_rate, &config))
            .collect::<Result<_, _>>()?
    };

    let notes = analysis::channel_merge::merge_channels(&per_channel);
    let key = analysis::channel_merge::merged_key(&per_channel);

    let frames = channels.iter().map(|c| c.len()).max().unwrap_or(0);
    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Transcription finished: {} notes in {:.1} ms",
        notes.len(),
        processing_time_ms
    );

    Ok(TranscriptionResult {
        notes,
        key,
        metadata: TranscriptionMetadata {
            duration_seconds: frames as f32 / sample_rate as f32,
            sample_rate,
            channel_count: per_channel.len(),
            processing_time_ms,
            flags: per_channel
                .iter()
                .flat_map(|c| c.flags.iter().cloned())
                .collect(),
            ..Default::default()
        },
        channels: per_channel,
    })
}
