//! Note onset detection (segmentation)
//!
//! Amplitude-peak tracking over the raw waveform:
//! 1. Trim leading silence (recorded as an offset correction)
//! 2. Locate the first transient
//! 3. Walk to the top of its attack, discounting the ADSR ramp
//! 4. Scan forward for samples close to that reference peak, skipping a
//!    peak-width guard after each hit
//! 5. Convert peaks into note start indices
//!
//! # Example
//!
//! ```no_run
//! use stratum_transcribe::config::TranscriptionConfig;
//! use stratum_transcribe::features::onset::detect_onsets;
//!
//! let samples = vec![0.0f64; 44100];
//! let onsets = detect_onsets(&samples, &TranscriptionConfig::default())?;
//! println!("Found {} onsets", onsets.len());
//! # Ok::<(), stratum_transcribe::TranscriptionError>(())
//! ```

pub mod peaks;
pub mod transient;

use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use crate::preprocessing::silence::trim_leading_silence;

/// Detect note onsets in a full channel
///
/// # Arguments
///
/// * `samples` - Channel samples (normalized to [-1.0, 1.0])
/// * `config` - Transcription configuration
///
/// # Returns
///
/// Onset sample indices, strictly increasing. Empty if the signal never rises
/// above zero.
///
/// # Errors
///
/// Returns `TranscriptionError::InvalidInput` for empty input or a zero
/// lookahead / peak width.
pub fn detect_onsets(
    samples: &[f64],
    config: &TranscriptionConfig,
) -> Result<Vec<usize>, TranscriptionError> {
    if samples.is_empty() {
        return Err(TranscriptionError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    if config.lookahead == 0 || config.peak_width == 0 {
        return Err(TranscriptionError::InvalidInput(
            "Lookahead and peak width must be > 0".to_string(),
        ));
    }

    let (trimmed, offset) = trim_leading_silence(samples);

    let Some(first_transient) =
        transient::find_first_transient(trimmed, config.transient_passed_threshold)
    else {
        log::warn!("No positive transient found in {} samples", samples.len());
        return Ok(Vec::new());
    };

    let reference = transient::find_reference_peak(trimmed, first_transient, config.lookahead);

    log::debug!(
        "Onset detection: offset={}, first transient={}, reference peak={} ({:.4})",
        offset,
        first_transient,
        reference,
        trimmed[reference]
    );

    let peaks = peaks::find_peaks(
        trimmed,
        reference,
        config.lookahead,
        config.peak_width,
        config.peak_sensitivity,
    );
    let onsets = peaks::peaks_to_onsets(&peaks, offset, config.peak_width);

    log::debug!("Detected {} onsets from {} peaks", onsets.len(), peaks.len());

    Ok(onsets)
}

/// End index of the note starting at `onsets[index]`
///
/// A note ends at the first silence boundary strictly inside it, otherwise at
/// the next onset (or at `signal_len` for the last note).
pub fn note_end(onsets: &[usize], silences: &[usize], index: usize, signal_len: usize) -> usize {
    let start = onsets[index];
    let limit = onsets.get(index + 1).copied().unwrap_or(signal_len);

    silences
        .iter()
        .copied()
        .find(|&s| s > start && s < limit)
        .unwrap_or(limit)
}
