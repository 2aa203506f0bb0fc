//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls and business rules and give the HTTP
//! handlers and the admin CLI a single API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code allocation, lookup and stats
//! - [`services::click_ingestor::ClickIngestor`] - Click event ingestion
pub mod services;
