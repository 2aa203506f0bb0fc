//! Repository trait definitions for the domain layer.
//!
//! These traits are the persistence collaborators the core depends on. Concrete
//! implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link storage, lookup and click counting
//! - [`ClickRepository`] - Click recording
//!
//! # Conventions
//!
//! - "Not found" is `Ok(None)`, never an error
//! - Uniqueness violations are reported as [`crate::error::StoreError::Conflict`]

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
