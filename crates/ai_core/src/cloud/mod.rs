//! Cloud inference engine
//!
//! Talks to the Gemini `generateContent` REST API.

mod client;

pub use client::CloudInferenceEngine;
