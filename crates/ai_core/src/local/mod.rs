//! Local inference engine
//!
//! Talks to an OpenAI-compatible chat completions server such as LM Studio.

mod client;

pub use client::LocalInferenceEngine;
