//! Pitch estimation modules
//!
//! - Fixed equal-tempered pitch catalogue
//! - Frequency to pitch quantization
//! - FFT-based dominant/secondary peak extraction

pub mod estimator;
pub mod quantizer;
pub mod table;

pub use estimator::{PitchEstimator, SpectralPeaks};
pub use quantizer::round_to_nearest_pitch;
pub use table::{Pitch, PitchClass, CATALOGUE};
