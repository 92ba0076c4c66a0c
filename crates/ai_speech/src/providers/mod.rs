//! Speech engine adapters

pub mod piper;
pub mod whisper_cpp;

pub use piper::PiperProvider;
pub use whisper_cpp::WhisperCppProvider;
