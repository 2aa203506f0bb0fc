//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::application::services::ClickDisposition;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// A click event is handed to the [`ClickIngestor`](crate::application::services::ClickIngestor)
/// before the redirect is returned. Recording is best-effort: a full queue or a
/// failed inline write never changes the response.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.get_link(&code).await?;

    let event = ClickEvent::new(
        link.id,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );

    if state.click_ingestor.record(event).await == ClickDisposition::Dropped {
        tracing::debug!(link_id = link.id, code = %code, "Redirecting without recorded click");
    }

    Ok(Redirect::temporary(&link.long_url))
}
