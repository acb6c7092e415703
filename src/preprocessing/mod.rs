//! Audio preprocessing modules
//!
//! Utilities for preparing a channel for segmentation:
//! - Leading-silence trimming (offset correction)
//! - Silence boundary detection

pub mod silence;
