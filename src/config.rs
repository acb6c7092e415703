//! Configuration parameters for transcription

use crate::error::TranscriptionError;

/// Transcription configuration parameters
///
/// Every analysis constant lives here so tests can tune windows and guards
/// without touching global state. Sample counts assume roughly 44.1 kHz input.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    // Segmentation
    /// Number of positive samples below the running maximum after which the
    /// first transient is considered passed (default: 100)
    pub transient_passed_threshold: usize,

    /// Lookahead window used for attack refinement and peak scanning (default: 2000)
    pub lookahead: usize,

    /// Fraction of the reference peak amplitude a sample may fall short of and
    /// still count as a new attack (default: 0.9999)
    pub peak_sensitivity: f64,

    /// Samples skipped after a detected peak to avoid re-detecting its decay
    /// tail (default: 8000, about 180 ms at 44.1 kHz)
    pub peak_width: usize,

    /// Minimum run of exactly-zero samples treated as silence (default: 1000)
    pub silence_lookahead: usize,

    /// Guard subtracted from the start of a silence run to account for reverb
    /// tails (default: 8000)
    pub silence_width: usize,

    // Spectral analysis
    /// FFT length used for every spectral analysis, must be a power of two
    /// (default: 65536)
    pub analysis_window: usize,

    /// Bins at or above this fraction of the maximum magnitude are dominant
    /// (default: 0.8)
    pub dominant_ratio: f64,

    /// Bins at or above this fraction of the maximum magnitude (and below the
    /// dominant cutoff) are secondary (default: 0.05)
    pub secondary_ratio: f64,

    // Sustain tracking
    /// Probe window used when following a sustained note through a segment
    /// (default: 2000)
    pub sustain_window: usize,

    /// Minimum unnormalized bin magnitude for a sustained pitch to count as
    /// present (default: 2.0)
    pub sustain_presence_threshold: f64,

    // MIDI timing
    /// Fixed tempo in beats per minute (default: 120.0)
    pub tempo_bpm: f64,

    /// MIDI pulses per quarter note (default: 24)
    pub ticks_per_quarter: u16,

    /// Lowest emitted velocity (default: 50)
    pub min_velocity: u8,

    /// Highest emitted velocity (default: 90)
    pub max_velocity: u8,

    // Execution
    /// Transcribe channels in parallel (default: true)
    pub parallel_channels: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            transient_passed_threshold: 100,
            lookahead: 2000,
            peak_sensitivity: 0.9999,
            peak_width: 8000,
            silence_lookahead: 1000,
            silence_width: 8000,
            analysis_window: 65536,
            dominant_ratio: 0.8,
            secondary_ratio: 0.05,
            sustain_window: 2000,
            sustain_presence_threshold: 2.0,
            tempo_bpm: 120.0,
            ticks_per_quarter: 24,
            min_velocity: 50,
            max_velocity: 90,
            parallel_channels: true,
        }
    }
}

impl TranscriptionConfig {
    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidInput` naming the first invalid field.
    pub fn validate(&self) -> Result<(), TranscriptionError> {
        let invalid = |msg: String| Err(TranscriptionError::InvalidInput(msg));

        if self.lookahead == 0 {
            return invalid("lookahead must be > 0".to_string());
        }
        if self.peak_width == 0 {
            return invalid("peak_width must be > 0".to_string());
        }
        if self.silence_lookahead == 0 {
            return invalid("silence_lookahead must be > 0".to_string());
        }
        if self.sustain_window == 0 {
            return invalid("sustain_window must be > 0".to_string());
        }
        if !self.analysis_window.is_power_of_two() {
            return invalid(format!(
                "analysis_window must be a power of two, got {}",
                self.analysis_window
            ));
        }
        if !(0.0..=1.0).contains(&self.peak_sensitivity) {
            return invalid(format!(
                "peak_sensitivity must be within [0, 1], got {}",
                self.peak_sensitivity
            ));
        }
        if !(self.secondary_ratio > 0.0
            && self.secondary_ratio < self.dominant_ratio
            && self.dominant_ratio <= 1.0)
        {
            return invalid(format!(
                "spectral ratios must satisfy 0 < secondary ({}) < dominant ({}) <= 1",
                self.secondary_ratio, self.dominant_ratio
            ));
        }
        if !(self.tempo_bpm > 0.0) {
            return invalid(format!("tempo_bpm must be > 0, got {}", self.tempo_bpm));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return invalid(format!(
                "ticks_per_quarter must be within 1..=32767, got {}",
                self.ticks_per_quarter
            ));
        }
        if self.min_velocity > self.max_velocity || self.max_velocity > 127 {
            return invalid(format!(
                "velocity range {}..={} is not a valid MIDI range",
                self.min_velocity, self.max_velocity
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TranscriptionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_power_of_two_window() {
        let config = TranscriptionConfig {
            analysis_window: 60000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_spectral_ratios() {
        let config = TranscriptionConfig {
            dominant_ratio: 0.05,
            secondary_ratio: 0.8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_velocity_range() {
        let config = TranscriptionConfig {
            min_velocity: 100,
            max_velocity: 90,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
