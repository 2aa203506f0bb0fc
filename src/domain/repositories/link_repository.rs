//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// The store is the authoritative guard for uniqueness of both `code` and
/// `long_url`: [`LinkRepository::create`] must reject duplicates with
/// [`StoreError::Conflict`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] with
    /// [`crate::error::UniqueField::ShortCode`] if the code is taken, or
    /// [`crate::error::UniqueField::LongUrl`] if the URL is already shortened.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Finds a link by its original long URL.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, StoreError>;

    /// Counts the clicks recorded for a link. Zero for a link without clicks.
    async fn count_clicks(&self, link_id: i64) -> Result<i64, StoreError>;

    /// Lists the most recently created links, newest first.
    async fn list(&self, limit: i64) -> Result<Vec<Link>, StoreError>;

    /// Removes a link and its clicks.
    ///
    /// The code stays reserved: a later [`LinkRepository::create`] with the same
    /// code fails with a short code conflict. The long URL becomes free again.
    ///
    /// Returns `Ok(true)` if a link was deleted, `Ok(false)` if none matched.
    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError>;
}
