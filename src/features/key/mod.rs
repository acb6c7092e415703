//! Key estimation modules
//!
//! Estimate the key of a transcription from the pitches it contains:
//! - Scale-membership scoring over the 24 major/minor keys
//! - Rare accidental removal against the estimated scale

pub mod accidentals;
pub mod detector;

pub use accidentals::remove_accidentals;
pub use detector::{estimate_key, KeyEstimate};

pub use crate::analysis::result::Key;
