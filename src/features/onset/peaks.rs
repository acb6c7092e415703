//! Attack peak scanning
//!
//! Given the reference attack peak, finds every later sample that comes close
//! to it. Each hit is treated as a new attack and the scan jumps past its decay
//! tail before continuing.

/// Find attack peaks similar to the reference peak
///
/// # Arguments
///
/// * `samples` - Trimmed signal
/// * `reference` - Index of the reference attack peak
/// * `lookahead` - Scan window length
/// * `peak_width` - Samples skipped after each detected peak
/// * `sensitivity` - Fraction of the reference amplitude a sample may fall
///   short of and still count as a peak
///
/// # Returns
///
/// Peak indices (reference first), strictly increasing and at least
/// `peak_width` apart
pub fn find_peaks(
    samples: &[f64],
    reference: usize,
    lookahead: usize,
    peak_width: usize,
    sensitivity: f64,
) -> Vec<usize> {
    let reference_value = samples[reference];
    let tolerance = reference_value.abs() * sensitivity;

    let mut peaks = vec![reference];
    let mut cursor = reference + peak_width;

    // A full lookahead window must fit; attacks closer than that to the end of
    // the signal cannot be told apart from the previous note's tail
    while cursor + lookahead < samples.len() {
        let window = &samples[cursor..cursor + lookahead];
        match window
            .iter()
            .position(|&value| reference_value - value < tolerance)
        {
            Some(offset) => {
                let peak = cursor + offset;
                peaks.push(peak);
                cursor = peak + peak_width;
            }
            None => cursor += lookahead,
        }
    }

    peaks
}

/// Convert peak indices into note start indices
///
/// The first note starts at the end of the leading silence. Every later note
/// starts half a peak width before its peak, in untrimmed coordinates.
pub fn peaks_to_onsets(peaks: &[usize], offset: usize, peak_width: usize) -> Vec<usize> {
    let mut onsets: Vec<usize> = Vec::with_capacity(peaks.len());

    for (i, &peak) in peaks.iter().enumerate() {
        let onset = if i == 0 {
            offset
        } else {
            (offset + peak).saturating_sub(peak_width / 2)
        };

        if onsets.last().map_or(true, |&last| onset > last) {
            onsets.push(onset);
        }
    }

    onsets
}
