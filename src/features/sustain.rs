//! Sustained note tracking
//!
//! A secondary peak in a segment may be an earlier note still ringing under
//! the new attack. The tracker probes the segment in short windows and
//! reports how long the pitch stays audible.

use crate::config::TranscriptionConfig;
use crate::features::pitch::{round_to_nearest_pitch, Pitch, PitchEstimator};

/// Probes segments for a held pitch
#[derive(Debug, Clone)]
pub struct SustainTracker<'a> {
    estimator: &'a PitchEstimator,
    window: usize,
    presence_threshold: f64,
}

impl<'a> SustainTracker<'a> {
    /// Create a tracker sharing the channel's FFT plan
    pub fn new(estimator: &'a PitchEstimator, config: &TranscriptionConfig) -> Self {
        Self {
            estimator,
            window: config.sustain_window.max(1),
            presence_threshold: config.sustain_presence_threshold,
        }
    }

    /// Extend a note's length while its pitch is still present
    ///
    /// # Arguments
    ///
    /// * `pitch` - Pitch of the earlier note
    /// * `segment` - Samples of the current segment, from its onset
    /// * `prior_length_seconds` - Length of the note before extension
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    ///
    /// `prior_length_seconds` plus the probed span in which the pitch was
    /// present. Unchanged when the first window does not contain it.
    pub fn extend_if_present(
        &self,
        pitch: Pitch,
        segment: &[f64],
        prior_length_seconds: f64,
        sample_rate: u32,
    ) -> f64 {
        if sample_rate == 0 {
            return prior_length_seconds;
        }

        let mut advanced = 0usize;
        for window in segment.chunks(self.window) {
            if !self.pitch_present(pitch, window, sample_rate) {
                break;
            }
            advanced += window.len();
        }

        if advanced > 0 {
            log::debug!(
                "Sustained {} for {} more samples under the current segment",
                pitch,
                advanced
            );
        }

        prior_length_seconds + advanced as f64 / sample_rate as f64
    }

    /// Whether `pitch` is audible in a probe window
    ///
    /// Only bins between the neighbouring catalogue pitches can quantize to
    /// `pitch`, so the scan is limited to that range.
    pub fn pitch_present(&self, pitch: Pitch, window: &[f64], sample_rate: u32) -> bool {
        if window.is_empty() || sample_rate == 0 {
            return false;
        }

        let half = self.estimator.window_len() / 2;
        let low = pitch.below().map_or(0.0, |p| p.frequency());
        let high = pitch
            .above()
            .map_or(sample_rate as f64 / 2.0, |p| p.frequency());
        let first = self.estimator.frequency_to_bin(low, sample_rate);
        let last = self
            .estimator
            .frequency_to_bin(high, sample_rate)
            .min(half.saturating_sub(1));
        if first > last {
            return false;
        }

        let spectrum = self.estimator.magnitude_spectrum(window);

        (first..=last).any(|bin| {
            spectrum[bin] >= self.presence_threshold
                && round_to_nearest_pitch(self.estimator.bin_to_frequency(bin, sample_rate))
                    == pitch
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn e4() -> Pitch {
        Pitch::from_midi(64).unwrap()
    }

    fn tone(pitch: Pitch, amplitude: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * pitch.frequency() * i as f64 / 44100.0).sin())
            .collect()
    }

    #[test]
    fn test_three_present_windows_extend_by_three_windows() {
        let config = TranscriptionConfig::default();
        let estimator = PitchEstimator::new(&config).unwrap();
        let tracker = SustainTracker::new(&estimator, &config);

        let mut segment = tone(e4(), 0.5, 6000);
        segment.extend(std::iter::repeat(0.0).take(4000));

        let revised = tracker.extend_if_present(e4(), &segment, 0.5, 44100);
        let expected = 0.5 + 3.0 * 2000.0 / 44100.0;
        assert!((revised - expected).abs() < 1e-12, "got {}", revised);
    }

    #[test]
    fn test_absent_pitch_leaves_length_unchanged() {
        let config = TranscriptionConfig::default();
        let estimator = PitchEstimator::new(&config).unwrap();
        let tracker = SustainTracker::new(&estimator, &config);

        let silent = vec![0.0; 8000];
        assert_eq!(tracker.extend_if_present(e4(), &silent, 1.25, 44100), 1.25);

        // Far below the presence threshold
        let faint = tone(e4(), 0.0005, 8000);
        assert_eq!(tracker.extend_if_present(e4(), &faint, 1.25, 44100), 1.25);
    }

    #[test]
    fn test_partial_final_window_is_probed() {
        let config = TranscriptionConfig::default();
        let estimator = PitchEstimator::new(&config).unwrap();
        let tracker = SustainTracker::new(&estimator, &config);

        let segment = tone(e4(), 0.5, 5000);
        let revised = tracker.extend_if_present(e4(), &segment, 0.0, 44100);
        assert!((revised - 5000.0 / 44100.0).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_present_in_tone_window() {
        let config = TranscriptionConfig::default();
        let estimator = PitchEstimator::new(&config).unwrap();
        let tracker = SustainTracker::new(&estimator, &config);

        let window = tone(e4(), 0.5, 2000);
        assert!(tracker.pitch_present(e4(), &window, 44100));
        assert!(!tracker.pitch_present(e4(), &[], 44100));
    }
}
