//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

use crate::domain::click_event::ClickEvent;

/// A click recorded when a shortened link is accessed.
///
/// Immutable once written. Missing client metadata is stored as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: String,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        user_agent: String,
        ip: String,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            user_agent,
            ip,
        }
    }
}

/// Input data for recording a click.
///
/// `link_id` must reference an existing link. The timestamp is the moment of
/// the redirect, not the moment of persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: String,
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        Self {
            link_id: event.link_id,
            clicked_at: event.clicked_at,
            user_agent: event.user_agent,
            ip: event.ip,
        }
    }
}
