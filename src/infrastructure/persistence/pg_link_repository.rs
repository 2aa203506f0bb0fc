//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Relies on the `links_code_key` constraint and the `links_long_url_key`
/// partial index; violations surface as [`StoreError::Conflict`].
///
/// Uses soft delete: a row with `deleted_at IS NOT NULL` is invisible to
/// lookups but still holds its code.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (code, long_url, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, code, long_url, created_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .bind(new_link.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let link = sqlx::query_as::<_, Link>(
            "SELECT id, code, long_url, created_at FROM links WHERE code = $1 AND deleted_at IS NULL",
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, StoreError> {
        let link = sqlx::query_as::<_, Link>(
            "SELECT id, code, long_url, created_at FROM links WHERE long_url = $1 AND deleted_at IS NULL",
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn count_clicks(&self, link_id: i64) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list(&self, limit: i64) -> Result<Vec<Link>, StoreError> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, long_url, created_at
            FROM links
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let link_id: Option<i64> = sqlx::query_scalar(
            "UPDATE links SET deleted_at = NOW() WHERE code = $1 AND deleted_at IS NULL RETURNING id",
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(link_id) = link_id else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }
}
