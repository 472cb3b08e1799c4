//! Audio input: format sniffing and the transcription contract.

pub mod detection;
pub mod transcribe;

pub use detection::{audio_mime, detect_mime, detect_mime_from_extension};
pub use transcribe::{NoTranscriber, Transcriber};
