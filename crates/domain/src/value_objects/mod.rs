//! Value Objects - Immutable, identity-less domain primitives

mod audio_blob;
mod audio_format;
mod generated_text;
mod prompt;
mod provider_identity;

pub use audio_blob::AudioBlob;
pub use audio_format::AudioFormat;
pub use generated_text::GeneratedText;
pub use prompt::Prompt;
pub use provider_identity::ProviderIdentity;
