//! AI Core - Text-generation providers
//!
//! Provides a uniform `InferenceEngine` capability with two interchangeable
//! backends and a registry that resolves a `ProviderIdentity` to a live
//! engine:
//! - `LocalInferenceEngine` - OpenAI-compatible chat completions server
//!   (LM Studio by default)
//! - `CloudInferenceEngine` - Gemini `generateContent` API

pub mod cloud;
pub mod config;
pub mod error;
pub mod local;
pub mod ports;
pub mod registry;

pub use cloud::CloudInferenceEngine;
pub use config::{CloudInferenceConfig, LocalInferenceConfig, ProviderSettings};
pub use error::InferenceError;
pub use local::LocalInferenceEngine;
pub use ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};
pub use registry::ProviderRegistry;
