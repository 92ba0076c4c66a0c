//! HTTP request handlers

pub mod generate;
pub mod health;
pub mod speech;
mod upload;

use application::PipelineReply;

use crate::error::ApiError;

/// Turn a pipeline reply into a handler result
pub(crate) fn into_result<T>(reply: PipelineReply<T>) -> Result<T, ApiError> {
    match reply {
        PipelineReply::Ok(value) => Ok(value),
        PipelineReply::Error(reply) => Err(ApiError::Pipeline(reply)),
    }
}
