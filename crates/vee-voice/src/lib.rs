//! # vee-voice
//!
//! The speech boundary: Whisper-style transcription with language
//! detection, TTS synthesis, and upload validation (format sniffing and the
//! 25 MB transcription size cap).
//!
//! Content here is bilingual: transcripts are normalized to an `ar`/`en`
//! language tag, falling back to Arabic-script detection when the
//! transcription API reports no usable language.
//!
//! ## Crate Position
//!
//! Depends on: vee-core. Depended on by: vee.

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod types;

pub use client::{OpenAiSpeechClient, SpeechClient, SpeechConfig};
pub use errors::{Result, VoiceError};
pub use types::{detect_format, normalize_language, validate_audio_size, AudioFormat, Transcript};
