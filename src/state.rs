//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ClickIngestor, LinkService};

/// State shared across all request handlers.
///
/// Cheap to clone: services sit behind `Arc`, and the ingestor holds only a
/// producer handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub click_ingestor: ClickIngestor,
    /// Public prefix for short URLs, e.g. `https://s.example.com`.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        click_ingestor: ClickIngestor,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service,
            click_ingestor,
            base_url: base_url.into(),
        }
    }

    pub fn short_url(&self, code: &str) -> String {
        LinkService::short_url(&self.base_url, code)
    }
}
