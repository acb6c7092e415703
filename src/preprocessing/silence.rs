//! Silence detection and trimming utilities
//!
//! Silence here means samples that are exactly zero, which is what a rendered
//! or gated recording produces between notes. Indices returned by this module
//! are always expressed in the coordinates of the untrimmed signal.

use crate::config::TranscriptionConfig;

/// Number of leading samples that are exactly zero
///
/// This count is the offset correction between the trimmed signal used for
/// peak tracking and the original signal.
pub fn leading_silence_len(samples: &[f64]) -> usize {
    samples.iter().take_while(|&&s| s == 0.0).count()
}

/// Trim leading silence
///
/// # Returns
///
/// The trimmed slice and the number of samples removed
pub fn trim_leading_silence(samples: &[f64]) -> (&[f64], usize) {
    let offset = leading_silence_len(samples);
    (&samples[offset..], offset)
}

/// Detect silence boundaries
///
/// Scans the trimmed signal for runs of exactly-zero samples lasting at least
/// `config.silence_lookahead` samples. Each run produces one boundary at its
/// start minus `config.silence_width` (saturating), so notes ringing into the
/// silence are cut before their reverb tail.
///
/// # Arguments
///
/// * `samples` - Full channel samples
/// * `config` - Transcription configuration
///
/// # Returns
///
/// Silence boundaries in samples, sorted by time
pub fn detect_silences(samples: &[f64], config: &TranscriptionConfig) -> Vec<usize> {
    let (trimmed, offset) = trim_leading_silence(samples);

    log::debug!(
        "Detecting silence in {} samples (offset {}, min run {})",
        trimmed.len(),
        offset,
        config.silence_lookahead
    );

    let mut boundaries = Vec::new();
    let mut i = 0;
    while i < trimmed.len() {
        if trimmed[i] != 0.0 {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < trimmed.len() && trimmed[i] == 0.0 {
            i += 1;
        }

        if i - run_start >= config.silence_lookahead {
            let boundary = (offset + run_start).saturating_sub(config.silence_width);
            // Keep boundaries strictly increasing even when guards overlap
            if boundaries.last().map_or(true, |&last| boundary > last) {
                boundaries.push(boundary);
            }
        }
    }

    log::debug!("Found {} silence boundaries", boundaries.len());

    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TranscriptionConfig {
        TranscriptionConfig {
            silence_lookahead: 10,
            silence_width: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_trim_leading_silence() {
        let samples = [0.0, 0.0, 0.0, 0.5, 0.0, -0.2];
        let (trimmed, offset) = trim_leading_silence(&samples);
        assert_eq!(offset, 3);
        assert_eq!(trimmed, &[0.5, 0.0, -0.2]);
    }

    #[test]
    fn test_trim_all_silent() {
        let samples = [0.0; 8];
        let (trimmed, offset) = trim_leading_silence(&samples);
        assert_eq!(offset, 8);
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_detects_long_zero_run_with_guard() {
        // 4 leading zeros, 30 samples of signal, 20 zeros, 10 samples of signal
        let mut samples = vec![0.0; 4];
        samples.extend(std::iter::repeat(0.3).take(30));
        samples.extend(std::iter::repeat(0.0).take(20));
        samples.extend(std::iter::repeat(0.3).take(10));

        let silences = detect_silences(&samples, &small_config());

        // Run starts at original index 34, guard of 5 moves it to 29
        assert_eq!(silences, vec![29]);
    }

    #[test]
    fn test_ignores_short_zero_runs() {
        let mut samples = vec![0.4; 50];
        for s in samples.iter_mut().skip(20).take(9) {
            *s = 0.0;
        }
        assert!(detect_silences(&samples, &small_config()).is_empty());
    }

    #[test]
    fn test_leading_silence_is_not_a_boundary() {
        let mut samples = vec![0.0; 100];
        samples.extend(std::iter::repeat(0.2).take(50));
        assert!(detect_silences(&samples, &small_config()).is_empty());
    }

    #[test]
    fn test_trailing_silence_is_a_boundary() {
        let mut samples = vec![0.2; 50];
        samples.extend(std::iter::repeat(0.0).take(40));
        assert_eq!(detect_silences(&samples, &small_config()), vec![45]);
    }
}
