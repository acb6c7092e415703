//! Transcription orchestration and result modules
//!
//! Turns per-channel features into note events:
//! - Per-channel pipeline
//! - Tick and velocity conversion
//! - Slicing artifact merge
//! - Channel merge
//! - Result types and metadata

pub mod channel_merge;
pub mod duplicates;
pub mod metadata;
pub mod pipeline;
pub mod result;
pub mod timing;
