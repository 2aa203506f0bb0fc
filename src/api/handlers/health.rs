//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthResponse, PipelineCheck};
use crate::application::services::PipelineStatus;
use crate::state::AppState;

/// Returns service health with click pipeline status.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Pipeline accepting events (or running synchronously)
/// - **503 Service Unavailable**: Click queue is closed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "click_pipeline": {
///     "mode": "async",
///     "status": "ok",
///     "available": 998,
///     "capacity": 1000
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let pipeline = check_click_pipeline(state.click_ingestor.status());
    let healthy = pipeline.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        click_pipeline: pipeline,
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check_click_pipeline(status: PipelineStatus) -> PipelineCheck {
    match status {
        PipelineStatus::Asynchronous {
            available,
            capacity,
            closed,
        } => PipelineCheck {
            mode: "async",
            status: if closed { "error" } else { "ok" }.to_string(),
            available: Some(available),
            capacity: Some(capacity),
        },
        PipelineStatus::Synchronous => PipelineCheck {
            mode: "synchronous",
            status: "ok".to_string(),
            available: None,
            capacity: None,
        },
    }
}
