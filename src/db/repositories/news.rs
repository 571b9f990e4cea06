//! News repository
//!
//! Database operations for news items.

use crate::db::DbPool;
use crate::models::{CreateNewsInput, News};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Create a news item
    async fn create(&self, input: &CreateNewsInput) -> Result<News>;

    /// Get a news item by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// List the most recent news items, newest first, at most `limit`
    async fn list_recent(&self, limit: i64) -> Result<Vec<News>>;

    /// Count total news items
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: DbPool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn create(&self, input: &CreateNewsInput) -> Result<News> {
        let now = Utc::now();
        let date = input.date.unwrap_or(now);

        let result = sqlx::query(
            r#"
            INSERT INTO news (title, body, date, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(date)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create news item")?;

        Ok(News {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            body: input.body.clone(),
            date,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, body, date, created_at
            FROM news
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get news item by ID")?;

        Ok(row.map(|r| row_to_news(&r)))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<News>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, date, created_at
            FROM news
            ORDER BY date DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list news items")?;

        Ok(rows.iter().map(row_to_news).collect())
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM news")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count news items")?;

        Ok(row.get("count"))
    }
}

fn row_to_news(row: &sqlx::sqlite::SqliteRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        date: row.get("date"),
        created_at: row.get("created_at"),
    }
}
