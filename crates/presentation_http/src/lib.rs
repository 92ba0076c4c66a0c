//! Voice assistant HTTP presentation layer
//!
//! This crate provides the HTTP API over the speech pipeline.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{BodyLimits, create_router};
pub use state::AppState;
