//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkStats;

/// Total click count for a short link.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub total_clicks: i64,
}

impl From<LinkStats> for LinkStatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            short_code: stats.link.code,
            long_url: stats.link.long_url,
            created_at: stats.link.created_at,
            total_clicks: stats.total_clicks,
        }
    }
}
