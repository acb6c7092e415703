//! Borrowed view over one channel of samples

use crate::error::TranscriptionError;

/// One channel of normalized samples paired with its sample rate
#[derive(Debug, Clone, Copy)]
pub struct Signal<'a> {
    samples: &'a [f64],
    sample_rate: u32,
}

impl<'a> Signal<'a> {
    /// Wrap a channel, rejecting empty input and a zero sample rate
    pub fn new(samples: &'a [f64], sample_rate: u32) -> Result<Self, TranscriptionError> {
        if samples.is_empty() {
            return Err(TranscriptionError::InvalidInput(
                "Empty audio samples".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(TranscriptionError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Samples of the channel
    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds per sample
    pub fn sampling_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: construction rejects empty channels
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the channel in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 * self.sampling_period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_rejects_empty_and_zero_rate() {
        assert!(Signal::new(&[], 44100).is_err());
        assert!(Signal::new(&[0.1], 0).is_err());
    }

    #[test]
    fn test_signal_timing() {
        let samples = vec![0.0; 22050];
        let signal = Signal::new(&samples, 44100).unwrap();
        assert!((signal.sampling_period() - 1.0 / 44100.0).abs() < 1e-15);
        assert!((signal.duration_seconds() - 0.5).abs() < 1e-12);
    }
}
