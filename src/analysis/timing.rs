//! Sample, time and MIDI tick conversions

use crate::config::TranscriptionConfig;

/// Tolerance absorbing float error before flooring to whole ticks
const TICK_EPSILON: f64 = 1e-9;

/// Converts sample positions and durations into MIDI ticks
///
/// Ticks assume a fixed tempo: at 120 BPM and 24 ticks per quarter note one
/// tick lasts 20.83 ms.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    sample_rate: u32,
    ticks_per_second: f64,
}

impl TickClock {
    /// Create a clock for a channel
    pub fn new(sample_rate: u32, config: &TranscriptionConfig) -> Self {
        Self {
            sample_rate,
            ticks_per_second: config.tempo_bpm * config.ticks_per_quarter as f64 / 60.0,
        }
    }

    /// Length of one tick in milliseconds
    pub fn tick_length_ms(&self) -> f64 {
        1000.0 / self.ticks_per_second
    }

    /// Tick at which sample `sample` falls
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_transcribe::analysis::timing::TickClock;
    /// use stratum_transcribe::config::TranscriptionConfig;
    ///
    /// let clock = TickClock::new(44100, &TranscriptionConfig::default());
    /// assert_eq!(clock.ticks_for_sample(44100), 48);
    /// ```
    pub fn ticks_for_sample(&self, sample: usize) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.ticks_for_seconds(sample as f64 / self.sample_rate as f64)
    }

    /// Whole ticks elapsed after `seconds`
    pub fn ticks_for_seconds(&self, seconds: f64) -> u64 {
        let ticks = seconds * self.ticks_per_second + TICK_EPSILON;
        if ticks.is_finite() && ticks > 0.0 {
            ticks.floor() as u64
        } else {
            0
        }
    }

    /// Time of sample `sample` in milliseconds
    pub fn sample_to_ms(&self, sample: usize) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        sample as f64 * 1000.0 / self.sample_rate as f64
    }
}

/// MIDI velocity for a segment's leading amplitude
///
/// Quiet amplitudes are boosted by powers of ten into `[0.1, 1.0)`, then
/// mapped affinely (`40 * a + 50`) and clamped to the configured range.
pub fn velocity_for_amplitude(amplitude: f64, config: &TranscriptionConfig) -> u8 {
    let mut level = amplitude.abs();
    if level.is_finite() && level > 0.0 {
        while level < 0.1 {
            level *= 10.0;
        }
    } else {
        level = 0.0;
    }

    let velocity = (40.0 * level + 50.0).floor();
    velocity.clamp(config.min_velocity as f64, config.max_velocity as f64) as u8
}
