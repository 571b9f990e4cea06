//! News service
//!
//! Business logic for the news section: the paginated home page
//! listing and single-item lookup.

use crate::db::repositories::NewsRepository;
use crate::models::{CreateNewsInput, News};
use anyhow::Context;
use std::sync::Arc;

/// Error types for news service operations
#[derive(Debug, thiserror::Error)]
pub enum NewsServiceError {
    /// News item not found
    #[error("News item not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// News service
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
    news_per_page: u32,
}

impl NewsService {
    /// Create a new news service.
    ///
    /// `news_per_page` caps the home page listing.
    pub fn new(repo: Arc<dyn NewsRepository>, news_per_page: u32) -> Self {
        Self {
            repo,
            news_per_page,
        }
    }

    /// The configured home page size
    pub fn news_per_page(&self) -> u32 {
        self.news_per_page
    }

    /// Home page listing: at most `news_per_page` items, newest first
    pub async fn home_page(&self) -> Result<Vec<News>, NewsServiceError> {
        let items = self
            .repo
            .list_recent(self.news_per_page as i64)
            .await
            .context("Failed to load home page news")?;
        Ok(items)
    }

    /// Look up a single news item
    pub async fn get(&self, id: i64) -> Result<News, NewsServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to load news item")?
            .ok_or(NewsServiceError::NotFound(id))
    }

    /// Create a news item (used by fixtures and administrative seeding)
    pub async fn create(&self, input: CreateNewsInput) -> Result<News, NewsServiceError> {
        if input.title.trim().is_empty() {
            return Err(NewsServiceError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }

        let news = self
            .repo
            .create(&input)
            .await
            .context("Failed to create news item")?;
        Ok(news)
    }
}
