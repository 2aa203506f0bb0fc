//! Repository trait for click recording.

use crate::domain::entities::{Click, NewClick};
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for persisting clicks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click and returns it with its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails, including when the referenced
    /// link no longer exists.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, StoreError>;
}
