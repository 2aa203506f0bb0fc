//! DTOs for link creation and lookup endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The original URL to shorten.
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub short_code: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            short_code: link.code,
            long_url: link.long_url,
            short_url,
            created_at: link.created_at,
        }
    }
}
