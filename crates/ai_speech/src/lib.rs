//! AI Speech - Speech-to-Text and Text-to-Speech adapters
//!
//! Provides traits and local engine implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (whisper.cpp)
//! - `TextToSpeech` - Synthesize speech to an audio file (Piper)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//! - `scratch` bridges in-memory audio and the engines' file-based CLIs
//! - `converter` normalizes uploads with FFmpeg
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioData, AudioFormat, SpeechToText, TextToSpeech};
//!
//! let transcription = stt.transcribe(AudioData::new(bytes, AudioFormat::Webm)).await?;
//! let artifact = tts.synthesize(&transcription.text).await?;
//! println!("Reply written to {}", artifact.path().display());
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod ports;
pub mod providers;
pub mod scratch;
pub mod types;

pub use config::{LocalSttConfig, LocalTtsConfig, SpeechConfig};
pub use converter::AudioConverter;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::{PiperProvider, WhisperCppProvider};
pub use scratch::ScratchSpace;
pub use types::{AudioData, AudioFormat, SpeechArtifact, Transcription};
