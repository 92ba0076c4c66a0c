//! Application layer - Use cases and orchestration
//!
//! Contains the speech pipeline orchestrator, the health aggregation service,
//! and the port definitions that infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, ErrorKind};
pub use ports::*;
pub use services::*;
