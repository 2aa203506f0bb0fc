//! In-process link and click store.
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema, so the core
//! behaves identically on top of it. Data lives as long as the store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::{StoreError, UniqueField};

#[derive(Debug, Default)]
struct Tables {
    links: Vec<Link>,
    by_code: HashMap<String, usize>,
    by_long_url: HashMap<String, usize>,
    /// Codes of deleted links; never allocated again.
    retired_codes: HashSet<String>,
    clicks: Vec<Click>,
    next_link_id: i64,
    next_click_id: i64,
}

/// Store implementing both [`LinkRepository`] and [`ClickRepository`] in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded click, in insertion order.
    pub async fn clicks(&self) -> Vec<Click> {
        self.tables.read().await.clicks.clone()
    }

    pub async fn link_count(&self) -> usize {
        self.tables.read().await.links.len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.by_code.contains_key(&new_link.code)
            || tables.retired_codes.contains(&new_link.code)
        {
            return Err(StoreError::Conflict(UniqueField::ShortCode));
        }
        if tables.by_long_url.contains_key(&new_link.long_url) {
            return Err(StoreError::Conflict(UniqueField::LongUrl));
        }

        tables.next_link_id += 1;
        let link = Link::new(
            tables.next_link_id,
            new_link.code,
            new_link.long_url,
            new_link.created_at,
        );

        let index = tables.links.len();
        tables.by_code.insert(link.code.clone(), index);
        tables.by_long_url.insert(link.long_url.clone(), index);
        tables.links.push(link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.by_code.get(code).map(|&i| tables.links[i].clone()))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_long_url
            .get(long_url)
            .map(|&i| tables.links[i].clone()))
    }

    async fn count_clicks(&self, link_id: i64) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }

    async fn list(&self, limit: i64) -> Result<Vec<Link>, StoreError> {
        let tables = self.tables.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(tables.links.iter().rev().take(limit).cloned().collect())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables.by_code.get(code).copied() else {
            return Ok(false);
        };

        let link = tables.links.remove(index);
        tables.clicks.retain(|c| c.link_id != link.id);
        tables.retired_codes.insert(link.code);

        let Tables {
            links,
            by_code,
            by_long_url,
            ..
        } = &mut *tables;
        by_code.clear();
        by_long_url.clear();
        for (i, l) in links.iter().enumerate() {
            by_code.insert(l.code.clone(), i);
            by_long_url.insert(l.long_url.clone(), i);
        }

        Ok(true)
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.links.iter().any(|l| l.id == new_click.link_id) {
            return Err(StoreError::Unavailable(format!(
                "link {} does not exist",
                new_click.link_id
            )));
        }

        tables.next_click_id += 1;
        let click = Click::new(
            tables.next_click_id,
            new_click.link_id,
            new_click.clicked_at,
            new_click.user_agent,
            new_click.ip,
        );
        tables.clicks.push(click.clone());

        Ok(click)
    }
}
