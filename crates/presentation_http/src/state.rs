//! Application state shared across handlers

use std::sync::Arc;

use application::{HealthService, PipelineService};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Speech and text pipeline
    pub pipeline: Arc<PipelineService>,
    /// Backend health aggregation
    pub health: Arc<HealthService>,
}
