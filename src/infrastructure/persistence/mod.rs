//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval on PostgreSQL
//! - [`PgClickRepository`] - Click recording on PostgreSQL
//! - [`InMemoryStore`] - Both traits in process memory

pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory_store::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
