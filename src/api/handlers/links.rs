//! Handler for link lookup without redirect.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::shorten::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a short link's metadata.
///
/// `GET /api/v1/links/{code}`. Does not record a click.
pub async fn link_info_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}
