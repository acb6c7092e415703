//! Frequency to pitch quantization

use super::table::{frequencies, Pitch, CATALOGUE};

/// Round a frequency to the nearest catalogue pitch
///
/// Finds the tightest bracketing pair `lower.freq < f < upper.freq` and
/// returns whichever is numerically closer (equal distance rounds up). A
/// frequency that matches a catalogue entry exactly maps to that entry.
/// Frequencies above the catalogue map to the top pitch, frequencies below it
/// (and NaN) to the bottom pitch.
///
/// # Example
///
/// ```
/// use stratum_transcribe::features::pitch::round_to_nearest_pitch;
///
/// assert_eq!(round_to_nearest_pitch(441.2).name(), "A4");
/// assert_eq!(round_to_nearest_pitch(1.0).name(), "C0");
/// assert_eq!(round_to_nearest_pitch(20000.0).name(), "B7");
/// ```
pub fn round_to_nearest_pitch(frequency: f64) -> Pitch {
    let table = frequencies();
    let upper = table.partition_point(|&f| f < frequency);

    if upper == table.len() {
        return CATALOGUE[table.len() - 1];
    }
    if upper == 0 || table[upper] == frequency {
        return CATALOGUE[upper];
    }

    let lower = upper - 1;
    if table[upper] - frequency > frequency - table[lower] {
        CATALOGUE[lower]
    } else {
        CATALOGUE[upper]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_for_every_pitch() {
        for pitch in CATALOGUE.iter() {
            assert_eq!(
                round_to_nearest_pitch(pitch.frequency()),
                *pitch,
                "pitch {} did not round-trip",
                pitch
            );
        }
    }

    #[test]
    fn test_rounds_to_closer_neighbour() {
        // A4 = 440, A#4 = 466.16
        assert_eq!(round_to_nearest_pitch(452.0).name(), "A4");
        assert_eq!(round_to_nearest_pitch(454.0).name(), "A#4");
        assert_eq!(round_to_nearest_pitch(440.75).name(), "A4");
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(round_to_nearest_pitch(0.0), Pitch::lowest());
        assert_eq!(round_to_nearest_pitch(-5.0), Pitch::lowest());
        assert_eq!(round_to_nearest_pitch(f64::NAN), Pitch::lowest());
        assert_eq!(round_to_nearest_pitch(10_000.0), Pitch::highest());
    }
}
