//! API route configuration.

use crate::api::handlers::{link_info_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, nested under `/api/v1`.
///
/// # Endpoints
///
/// - `POST /links`               - Create a short link
/// - `GET  /links/{code}`        - Link metadata
/// - `GET  /links/{code}/stats`  - Total click count
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(shorten_handler))
        .route("/links/{code}", get(link_info_handler))
        .route("/links/{code}/stats", get(stats_handler))
}
