//! Feature extraction modules
//!
//! This module contains the per-channel analysis stages:
//! - Onset detection (amplitude-peak segmentation)
//! - Pitch estimation (spectral peaks + quantization)
//! - Sustained note tracking
//! - Key estimation

pub mod key;
pub mod onset;
pub mod pitch;
pub mod sustain;
