//! Comment repository
//!
//! Database operations for comments under news items.

use crate::db::DbPool;
use crate::models::{Comment, CommentWithAuthor, CreateCommentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, input: &CreateCommentInput, author_id: i64) -> Result<Comment>;

    /// Get a comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Get comments for a news item, oldest first, with author usernames
    async fn list_by_news(&self, news_id: i64) -> Result<Vec<CommentWithAuthor>>;

    /// Update a comment's text
    async fn update_text(&self, id: i64, text: &str) -> Result<bool>;

    /// Delete a comment
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count total comments
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DbPool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput, author_id: i64) -> Result<Comment> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO comments (news_id, author_id, text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.news_id)
        .bind(author_id)
        .bind(&input.text)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            news_id: input.news_id,
            author_id,
            text: input.text.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query(
            r#"
            SELECT id, news_id, author_id, text, created_at, updated_at
            FROM comments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get comment by ID")?;

        Ok(row.map(|r| Comment {
            id: r.get("id"),
            news_id: r.get("news_id"),
            author_id: r.get("author_id"),
            text: r.get("text"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn list_by_news(&self, news_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.news_id, c.author_id, c.text, c.created_at, u.username
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.news_id = ?
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(news_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")?;

        Ok(rows
            .iter()
            .map(|r| CommentWithAuthor {
                id: r.get("id"),
                news_id: r.get("news_id"),
                author_id: r.get("author_id"),
                author_username: r.get("username"),
                text: r.get("text"),
                created_at: r.get("created_at"),
            })
            .collect())
    }

    async fn update_text(&self, id: i64, text: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE comments SET text = ?, updated_at = ? WHERE id = ?")
            .bind(text)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update comment")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM comments")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count comments")?;

        Ok(row.get("count"))
    }
}
