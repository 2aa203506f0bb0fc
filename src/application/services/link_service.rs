//! Link allocation, lookup and statistics service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, StoreError, UniqueField};
use crate::utils::code_generator::CodeGenerator;
use chrono::Utc;

/// Default number of characters in a generated short code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default number of codes tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Tuning knobs for short code allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub code_length: usize,
    pub max_attempts: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// A link together with its total click count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
}

/// Service for creating and retrieving shortened links.
///
/// Uniqueness of short codes is enforced by the store: allocation inserts a
/// candidate optimistically and retries only when the insert reports a code
/// conflict.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    code_generator: Arc<dyn CodeGenerator>,
    config: AllocatorConfig,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        code_generator: Arc<dyn CodeGenerator>,
        config: AllocatorConfig,
    ) -> Self {
        Self {
            link_repository,
            code_generator,
            config,
        }
    }

    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    /// Creates a short link for `long_url`.
    ///
    /// # Errors
    ///
    /// - [`AppError::DuplicateUrl`] if the URL is already shortened
    /// - [`AppError::CodeSpaceExhausted`] if every attempt collided
    /// - [`AppError::RandomSource`] if no candidate code could be generated
    /// - [`AppError::Store`] on any other store failure (no further attempts)
    pub async fn create_link(&self, long_url: String) -> Result<Link, AppError> {
        if self
            .link_repository
            .find_by_long_url(&long_url)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateUrl { long_url });
        }

        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let code = self.code_generator.generate(self.config.code_length)?;

            let new_link = NewLink {
                code,
                long_url: long_url.clone(),
                created_at: Utc::now(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    tracing::info!(link_id = link.id, code = %link.code, attempt, "Short link created");
                    return Ok(link);
                }
                Err(StoreError::Conflict(UniqueField::ShortCode)) => {
                    metrics::counter!("short_code_collisions_total").increment(1);
                    tracing::warn!(attempt, max_attempts, "Short code collision, retrying");
                }
                Err(StoreError::Conflict(UniqueField::LongUrl)) => {
                    return Err(AppError::DuplicateUrl { long_url });
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(attempts = max_attempts, "Short code space exhausted");
        Err(AppError::CodeSpaceExhausted {
            attempts: max_attempts,
        })
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Store`] on store errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))
    }

    /// Retrieves a link and its total click count.
    ///
    /// The count is taken for the link resolved by this call. A link without
    /// clicks yields a count of zero.
    pub async fn get_link_stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let link = self.get_link(code).await?;
        let total_clicks = self.link_repository.count_clicks(link.id).await?;

        Ok(LinkStats { link, total_clicks })
    }

    /// Lists the most recent links, newest first.
    pub async fn list_links(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        Ok(self.link_repository.list(limit).await?)
    }

    /// Removes a link and its recorded clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if self.link_repository.delete_by_code(code).await? {
            tracing::info!(code, "Short link deleted");
            Ok(())
        } else {
            Err(AppError::not_found(code))
        }
    }

    /// Constructs the full short URL from a base URL and code.
    pub fn short_url(base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::{
        ALPHABET, CodeGenError, MockCodeGenerator, RandomCodeGenerator,
    };
    use mockall::Sequence;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), Utc::now())
    }

    fn service(repo: MockLinkRepository) -> LinkService {
        LinkService::new(
            Arc::new(repo),
            Arc::new(RandomCodeGenerator),
            AllocatorConfig::default(),
        )
    }

    fn created_from(new_link: NewLink) -> Link {
        Link::new(10, new_link.code, new_link.long_url, new_link.created_at)
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_long_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .withf(|new_link| {
                new_link.code.len() == 6
                    && new_link.code.bytes().all(|b| ALPHABET.contains(&b))
                    && new_link.long_url == "https://example.com"
            })
            .times(1)
            .returning(|new_link| Ok(created_from(new_link)));

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        let link = result.unwrap();
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.code.len(), 6);
    }

    #[tokio::test]
    async fn test_create_link_duplicate_url() {
        let mut mock_repo = MockLinkRepository::new();

        let existing = create_test_link(5, "aZ3kP9", "https://example.com");
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        mock_repo.expect_create().times(0);

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        assert!(matches!(result, Err(AppError::DuplicateUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_link_lookup_failure_is_store_error() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("db down".to_string())));
        mock_repo.expect_create().times(0);

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_create_link_retries_on_code_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::Conflict(UniqueField::ShortCode)));

        mock_repo
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(created_from(new_link)));

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_code_space_exhausted() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .times(DEFAULT_MAX_ATTEMPTS)
            .returning(|_| Err(StoreError::Conflict(UniqueField::ShortCode)));

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        assert!(matches!(
            result,
            Err(AppError::CodeSpaceExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_create_link_respects_configured_attempts() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_find_by_long_url().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .times(2)
            .returning(|_| Err(StoreError::Conflict(UniqueField::ShortCode)));

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(RandomCodeGenerator),
            AllocatorConfig {
                code_length: 8,
                max_attempts: 2,
            },
        );

        let result = service.create_link("https://example.com".to_string()).await;

        assert!(matches!(
            result,
            Err(AppError::CodeSpaceExhausted { attempts: 2 })
        ));
    }

    #[tokio::test]
    async fn test_create_link_store_error_aborts_retries() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_create_link_concurrent_duplicate_url() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(StoreError::Conflict(UniqueField::LongUrl)));

        let result = service(mock_repo)
            .create_link("https://example.com".to_string())
            .await;

        assert!(matches!(result, Err(AppError::DuplicateUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_link_random_source_failure() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_long_url().returning(|_| Ok(None));
        mock_repo.expect_create().times(0);

        let mut mock_generator = MockCodeGenerator::new();
        mock_generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(CodeGenError::RandomSource(getrandom::Error::UNSUPPORTED)));

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(mock_generator),
            AllocatorConfig::default(),
        );

        let result = service.create_link("https://example.com".to_string()).await;

        assert!(matches!(
            result,
            Err(AppError::RandomSource(CodeGenError::RandomSource(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_link_uses_generated_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_long_url().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(|new_link| new_link.code == "aZ3kP9")
            .times(1)
            .returning(|new_link| Ok(created_from(new_link)));

        let mut mock_generator = MockCodeGenerator::new();
        mock_generator
            .expect_generate()
            .withf(|length| *length == 6)
            .times(1)
            .returning(|_| Ok("aZ3kP9".to_string()));

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(mock_generator),
            AllocatorConfig::default(),
        );

        let link = service
            .create_link("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(link.code, "aZ3kP9");
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .withf(|code| code == "nope")
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).get_link("nope").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_link_stats_counts_resolved_link() {
        let mut mock_repo = MockLinkRepository::new();

        let link = create_test_link(42, "abc123", "https://example.com");
        mock_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        mock_repo
            .expect_count_clicks()
            .withf(|link_id| *link_id == 42)
            .times(1)
            .returning(|_| Ok(7));

        let stats = service(mock_repo).get_link_stats("abc123").await.unwrap();

        assert_eq!(stats.link.id, 42);
        assert_eq!(stats.total_clicks, 7);
    }

    #[tokio::test]
    async fn test_get_link_stats_zero_clicks() {
        let mut mock_repo = MockLinkRepository::new();

        let link = create_test_link(1, "abc123", "https://example.com");
        mock_repo
            .expect_find_by_code()
            .returning(move |_| Ok(Some(link.clone())));
        mock_repo.expect_count_clicks().returning(|_| Ok(0));

        let stats = service(mock_repo).get_link_stats("abc123").await.unwrap();

        assert_eq!(stats.total_clicks, 0);
    }

    #[tokio::test]
    async fn test_get_link_stats_not_found_skips_count() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_code().returning(|_| Ok(None));
        mock_repo.expect_count_clicks().times(0);

        let result = service(mock_repo).get_link_stats("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_delete_by_code().returning(|_| Ok(false));

        let result = service(mock_repo).delete_link("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            LinkService::short_url("http://localhost:8080/", "aZ3kP9"),
            "http://localhost:8080/aZ3kP9"
        );
        assert_eq!(
            LinkService::short_url("https://s.example.com", "abc"),
            "https://s.example.com/abc"
        );
    }
}
