//! Example: Transcribe an audio file to MIDI
//!
//! Usage: `cargo run --example transcribe_file -- <audio file> [output dir]`
//!
//! The MIDI file is named after the input and annotated with the estimated
//! key, e.g. `melody - C Major.mid`.

use std::path::{Path, PathBuf};
use stratum_transcribe::io::{annotated_file_name, decode_audio, save_midi};
use stratum_transcribe::{transcribe_audio, TranscriptionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or("usage: transcribe_file <audio file> [output dir]")?;
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let audio = decode_audio(&input)?;
    println!(
        "Decoded {} channel(s), {:.2}s at {} Hz",
        audio.channel_count(),
        audio.duration_seconds(),
        audio.sample_rate
    );

    let config = TranscriptionConfig::default();
    let result = transcribe_audio(&audio.channels, audio.sample_rate, config.clone())?;

    println!("Transcription Results:");
    println!("  Notes: {}", result.notes.len());
    match result.key {
        Some(key) => println!("  Key: {}", key),
        None => println!("  Key: undetermined"),
    }
    if !result.metadata.flags.is_empty() {
        println!("  Flags: {:?}", result.metadata.flags);
    }
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    let stem = Path::new(&input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("transcription");
    let output = output_dir.join(annotated_file_name(stem, result.key));
    save_midi(&result.notes, &config, &output)?;
    println!("Wrote {}", output.display());

    Ok(())
}
