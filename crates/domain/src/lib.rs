//! Domain layer for the voice assistant
//!
//! Contains the value objects that flow through the speech pipeline and the
//! domain errors raised when they are constructed from caller input.
//! This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
