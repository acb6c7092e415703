//! Audio and MIDI I/O modules
//!
//! Audio decoding using Symphonia, Standard MIDI File export using midly.

pub mod decoder;
pub mod midi_writer;
pub mod sample_buffer;

pub use decoder::{decode_audio, DecodedAudio};
pub use midi_writer::{annotated_file_name, save_midi, to_midi_bytes, write_midi};
