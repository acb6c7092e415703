//! Spectral peak extraction
//!
//! Converts a sample window into dominant and secondary frequencies using the
//! magnitude of the conjugated forward transform.
//!
//! # Algorithm
//!
//! 1. Zero-pad or truncate the segment to the fixed analysis window `N`
//! 2. Forward FFT, complex conjugate, magnitude
//! 3. Scan bins `0..N/2` (the upper half mirrors the lower half)
//! 4. The largest bin is dominant; other bins at or above `dominant_ratio` of
//!    it are dominant too (simultaneous notes of similar loudness); bins at or
//!    above `secondary_ratio` but below the dominant cutoff are secondary
//! 5. Bin `i` maps to `((i + 1) / N) * sample_rate`

use super::quantizer::round_to_nearest_pitch;
use super::table::Pitch;
use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Numerical stability epsilon
const EPSILON: f64 = 1e-12;

/// Peaks found in one analysed segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeaks {
    /// Frequencies (Hz) within 20% of the strongest bin, strongest first
    pub dominant: Vec<f64>,

    /// Frequencies (Hz) between 5% and 80% of the strongest bin
    pub secondary: Vec<f64>,

    /// Magnitude of the strongest bin
    pub peak_magnitude: f64,
}

impl SpectralPeaks {
    /// True when the spectrum had no energy at all
    pub fn is_degenerate(&self) -> bool {
        self.dominant.is_empty()
    }

    /// Distinct pitches of the dominant frequencies
    pub fn dominant_pitches(&self) -> BTreeSet<Pitch> {
        self.dominant
            .iter()
            .map(|&f| round_to_nearest_pitch(f))
            .collect()
    }

    /// Distinct pitches of the secondary frequencies, in bin order
    pub fn secondary_pitches(&self) -> Vec<Pitch> {
        let mut seen = BTreeSet::new();
        self.secondary
            .iter()
            .map(|&f| round_to_nearest_pitch(f))
            .filter(|p| seen.insert(*p))
            .collect()
    }
}

/// Fixed-size spectral analyser
///
/// The FFT plan is created once and shared by every segment and sustain probe
/// of a channel.
#[derive(Clone)]
pub struct PitchEstimator {
    fft: Arc<dyn Fft<f64>>,
    window: usize,
    dominant_ratio: f64,
    secondary_ratio: f64,
}

impl fmt::Debug for PitchEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PitchEstimator")
            .field("window", &self.window)
            .field("dominant_ratio", &self.dominant_ratio)
            .field("secondary_ratio", &self.secondary_ratio)
            .finish()
    }
}

impl PitchEstimator {
    /// Plan the analysis FFT
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidInput` if the analysis window is not
    /// a power of two.
    pub fn new(config: &TranscriptionConfig) -> Result<Self, TranscriptionError> {
        if !config.analysis_window.is_power_of_two() {
            return Err(TranscriptionError::InvalidInput(format!(
                "Analysis window must be a power of two, got {}",
                config.analysis_window
            )));
        }

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(config.analysis_window);

        Ok(Self {
            fft,
            window: config.analysis_window,
            dominant_ratio: config.dominant_ratio,
            secondary_ratio: config.secondary_ratio,
        })
    }

    /// Transform length `N`
    pub fn window_len(&self) -> usize {
        self.window
    }

    /// Frequency of bin `i`: `((i + 1) / N) * sample_rate`
    pub fn bin_to_frequency(&self, bin: usize, sample_rate: u32) -> f64 {
        (bin + 1) as f64 / self.window as f64 * sample_rate as f64
    }

    /// Nearest bin index for a frequency (inverse of [`Self::bin_to_frequency`])
    pub fn frequency_to_bin(&self, frequency: f64, sample_rate: u32) -> usize {
        let bin = frequency * self.window as f64 / sample_rate as f64 - 1.0;
        if bin <= 0.0 {
            0
        } else {
            bin.round() as usize
        }
    }

    /// Magnitude spectrum of the conjugated transform (full length `N`)
    pub fn magnitude_spectrum(&self, samples: &[f64]) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> = samples
            .iter()
            .take(self.window)
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        buffer.resize(self.window, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.iter().map(|c| c.conj().norm()).collect()
    }

    /// Extract dominant and secondary frequencies from a segment
    ///
    /// # Arguments
    ///
    /// * `samples` - Segment samples (zero-padded or truncated to the window)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    ///
    /// Spectral peaks; empty (degenerate) when the segment has no energy
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidInput` for an empty segment or a
    /// zero sample rate.
    pub fn analyze_segment(
        &self,
        samples: &[f64],
        sample_rate: u32,
    ) -> Result<SpectralPeaks, TranscriptionError> {
        if samples.is_empty() {
            return Err(TranscriptionError::InvalidInput(
                "Empty segment".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(TranscriptionError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        let spectrum = self.magnitude_spectrum(samples);
        let half = &spectrum[..self.window / 2];

        let (peak_index, peak_magnitude) = half
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0f64), |best, (i, m)| if m > best.1 { (i, m) } else { best });

        if peak_magnitude <= EPSILON {
            log::debug!("Segment of {} samples has no spectral energy", samples.len());
            return Ok(SpectralPeaks::default());
        }

        let dominant_cutoff = peak_magnitude * self.dominant_ratio;
        let secondary_cutoff = peak_magnitude * self.secondary_ratio;

        let mut dominant = vec![self.bin_to_frequency(peak_index, sample_rate)];
        let mut secondary = Vec::new();

        for (i, &magnitude) in half.iter().enumerate() {
            if i == peak_index {
                continue;
            }
            if magnitude >= dominant_cutoff {
                dominant.push(self.bin_to_frequency(i, sample_rate));
            } else if magnitude >= secondary_cutoff {
                secondary.push(self.bin_to_frequency(i, sample_rate));
            }
        }

        log::debug!(
            "Segment analysis: peak {:.2} Hz (magnitude {:.3}), {} dominant, {} secondary bins",
            dominant[0],
            peak_magnitude,
            dominant.len(),
            secondary.len()
        );

        Ok(SpectralPeaks {
            dominant,
            secondary,
            peak_magnitude,
        })
    }
}
