//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with click pipeline status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub click_pipeline: PipelineCheck,
}

/// Click pipeline state as seen by the request path.
#[derive(Debug, Serialize)]
pub struct PipelineCheck {
    /// `async` or `synchronous`.
    pub mode: &'static str,
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}
