//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// An in-memory representation of a click awaiting persistence.
///
/// Created by the redirect handler once the link lookup has succeeded, then
/// owned by the click queue until exactly one worker claims it and turns it
/// into a [`crate::domain::entities::NewClick`].
///
/// # Usage Flow
///
/// 1. Created in the redirect handler with request metadata
/// 2. Handed to [`crate::application::services::ClickIngestor::record`]
/// 3. Queued (non-blocking) or written inline in fallback mode
/// 4. Persisted by a worker of [`crate::domain::click_worker::ClickWorkerPool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: String,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// Missing headers are recorded as empty strings.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(42, Some("192.168.1.1".to_string()), Some("Mozilla/5.0"));
    /// ```
    pub fn new(link_id: i64, ip: Option<String>, user_agent: Option<&str>) -> Self {
        Self {
            link_id,
            clicked_at: Utc::now(),
            user_agent: user_agent.map(str::to_string).unwrap_or_default(),
            ip: ip.unwrap_or_default(),
        }
    }
}
