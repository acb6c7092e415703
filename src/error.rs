//! Error types for the transcription engine

use std::fmt;

/// Errors that can occur during transcription
///
/// Only caller-input problems and I/O failures are errors. Degenerate segments
/// and an undetermined key are reported as
/// [`TranscriptionFlag`](crate::analysis::result::TranscriptionFlag)s instead.
#[derive(Debug, Clone)]
pub enum TranscriptionError {
    /// Invalid input parameters (empty signal, no onsets, bad configuration)
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// MIDI encoding or file writing error
    EncodingError(String),

    /// Processing error during analysis
    ProcessingError(String),
}

impl fmt::Display for TranscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TranscriptionError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            TranscriptionError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            TranscriptionError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for TranscriptionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category_and_message() {
        let err = TranscriptionError::InvalidInput("no note onsets detected in channel".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: no note onsets detected in channel"
        );

        let err = TranscriptionError::EncodingError("disk full".to_string());
        assert_eq!(err.to_string(), "Encoding error: disk full");
    }
}
