//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod provider_registry_adapter;
mod speech_adapter;

pub use provider_registry_adapter::ProviderRegistryAdapter;
pub use speech_adapter::SpeechAdapter;
