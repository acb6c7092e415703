//! Audio decoding using Symphonia

use super::sample_buffer::ChannelBuffer;
use crate::error::TranscriptionError;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Decoded audio, one sample vector per channel
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Samples per channel, normalized to [-1.0, 1.0]
    pub channels: Vec<Vec<f64>>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        let frames = self.channels.first().map_or(0, |c| c.len());
        if self.sample_rate == 0 {
            0.0
        } else {
            frames as f64 / self.sample_rate as f64
        }
    }
}

fn decoding_error(context: &str, err: impl std::fmt::Display) -> TranscriptionError {
    TranscriptionError::DecodingError(format!("{}: {}", context, err))
}

/// Decode an audio file into per-channel samples
///
/// The container is probed using the file extension as a hint; the first
/// audio track is decoded. Packets that fail to decode are skipped.
///
/// # Arguments
///
/// * `path` - Path to audio file
///
/// # Errors
///
/// Returns `TranscriptionError::DecodingError` if the file cannot be opened or
/// probed, has no audio track, or produces no samples.
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, TranscriptionError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path).map_err(|e| decoding_error("cannot open file", e))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| decoding_error("unsupported format", e))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            TranscriptionError::DecodingError("No supported audio tracks found".to_string())
        })?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decoding_error("unsupported codec", e))?;

    let mut buffer: Option<ChannelBuffer> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(decoding_error("cannot read packet", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = sample_rate.or(Some(spec.rate));

                let mut interleaved = SampleBuffer::<f64>::new(decoded.capacity() as u64, spec);
                interleaved.copy_interleaved_ref(decoded);

                buffer
                    .get_or_insert_with(|| ChannelBuffer::new(spec.channels.count()))
                    .push_interleaved(interleaved.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(decoding_error("decoder failure", e)),
        }
    }

    let buffer = buffer
        .filter(|b| b.frames() > 0)
        .ok_or_else(|| TranscriptionError::DecodingError("No samples decoded".to_string()))?;
    let sample_rate = sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| TranscriptionError::DecodingError("Unknown sample rate".to_string()))?;

    let audio = DecodedAudio {
        channels: buffer.into_channels(),
        sample_rate,
    };

    log::debug!(
        "Decoded {} channel(s), {:.2}s at {} Hz",
        audio.channel_count(),
        audio.duration_seconds(),
        audio.sample_rate
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_decoding_error() {
        let result = decode_audio("/nonexistent/path/to/audio.wav");
        assert!(matches!(result, Err(TranscriptionError::DecodingError(_))));
    }

    #[test]
    fn test_duration() {
        let audio = DecodedAudio {
            channels: vec![vec![0.0; 22050], vec![0.0; 22050]],
            sample_rate: 44100,
        };
        assert_eq!(audio.channel_count(), 2);
        assert!((audio.duration_seconds() - 0.5).abs() < 1e-12);
    }
}
