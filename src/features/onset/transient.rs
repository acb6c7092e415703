//! First-transient location and attack refinement
//!
//! Both searches run on a trimmed signal (leading zeros removed) and return
//! indices relative to it.

/// Find the first transient
///
/// A positive sample that establishes a new running maximum becomes the
/// transient candidate. Every positive sample below the running maximum counts
/// towards `passed_threshold`; once the count is exceeded the transient has
/// passed and the search stops.
///
/// # Returns
///
/// Index of the first transient, or `None` if the signal has no positive sample
pub fn find_first_transient(samples: &[f64], passed_threshold: usize) -> Option<usize> {
    let mut transient = None;
    let mut top = 0.0f64;
    let mut passed = 0usize;

    for (i, &s) in samples.iter().enumerate() {
        if s > top {
            transient = Some(i);
            top = s;
            passed = 0;
        } else if s > 0.0 && s < top {
            passed += 1;
        }

        if passed > passed_threshold {
            break;
        }
    }

    transient
}

/// Look `lookahead` samples ahead of `from` for a higher sample
///
/// Returns the index of the highest sample in the window if it exceeds
/// `samples[from]`, otherwise `from` itself (the amplitude is not trending up).
pub fn trending_up(samples: &[f64], from: usize, lookahead: usize) -> usize {
    let end = (from + lookahead).min(samples.len());
    let mut peak_value = samples[from];
    let mut peak_index = from;

    for (i, &s) in samples[from..end].iter().enumerate() {
        if s > peak_value {
            peak_value = s;
            peak_index = from + i;
        }
    }

    peak_index
}

/// Walk from a transient to the top of its attack
///
/// Repeats [`trending_up`] until the position no longer moves, which skips
/// over the rising part of an ADSR envelope. Each move strictly increases the
/// amplitude, so the walk terminates.
pub fn find_reference_peak(samples: &[f64], transient: usize, lookahead: usize) -> usize {
    let mut peak = transient;
    loop {
        let next = trending_up(samples, peak, lookahead);
        if next == peak {
            return peak;
        }
        peak = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_transient_stops_after_decay() {
        // Rise to 0.9 at index 3, then a long positive decay, then a louder hit
        let mut samples = vec![0.1, 0.4, 0.7, 0.9];
        samples.extend(std::iter::repeat(0.5).take(20));
        samples.push(1.0);

        assert_eq!(find_first_transient(&samples, 10), Some(3));
        // With a generous threshold the later, louder sample wins
        assert_eq!(find_first_transient(&samples, 100), Some(24));
    }

    #[test]
    fn test_first_transient_none_for_non_positive_signal() {
        let samples = vec![0.0, -0.5, -0.2, 0.0];
        assert_eq!(find_first_transient(&samples, 100), None);
    }

    #[test]
    fn test_trending_up_moves_to_window_maximum() {
        let samples = vec![0.2, 0.3, 0.8, 0.5, 0.95];
        assert_eq!(trending_up(&samples, 0, 3), 2);
        assert_eq!(trending_up(&samples, 0, 10), 4);
        assert_eq!(trending_up(&samples, 4, 10), 4);
    }

    #[test]
    fn test_reference_peak_walks_slow_attack() {
        // Linear ramp over 50 samples, then decay
        let mut samples: Vec<f64> = (0..50).map(|i| i as f64 / 50.0).collect();
        samples.extend((0..50).map(|i| 1.0 - i as f64 / 100.0));

        assert_eq!(find_reference_peak(&samples, 0, 10), 50);
    }
}
