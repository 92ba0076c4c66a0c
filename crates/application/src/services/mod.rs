//! Application services - Use case implementations

mod health_service;
mod pipeline_service;

pub use health_service::{HealthConfig, HealthReport, HealthService, ServiceHealth};
pub use pipeline_service::{AudioUpload, ErrorReply, PipelineReply, PipelineService, VoiceReply};
