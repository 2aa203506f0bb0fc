//! Business logic services for the application layer.

pub mod click_ingestor;
pub mod link_service;

pub use click_ingestor::{ClickDisposition, ClickIngestor, IngestConfig, PipelineStatus};
pub use link_service::{AllocatorConfig, LinkService, LinkStats};
