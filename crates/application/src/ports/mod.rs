//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod speech_port;
mod text_generation_port;

#[cfg(test)]
pub use speech_port::{MockSynthesisPort, MockTranscriptionPort};
pub use speech_port::{SynthesisPort, SynthesizedSpeech, TranscriptionPort, TranscriptionResult};
#[cfg(test)]
pub use text_generation_port::MockTextGenerationPort;
pub use text_generation_port::TextGenerationPort;
