//! Note repository
//!
//! Database operations for personal notes.

use crate::db::DbPool;
use crate::models::Note;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Note repository trait
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Create a new note
    async fn create(&self, note: &Note) -> Result<Note>;

    /// Get a note by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Note>>;

    /// List all notes owned by a user, newest first
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>>;

    /// Check whether any note already uses the given slug
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Update a note's title, body, and slug
    async fn update(&self, note: &Note) -> Result<Note>;

    /// Delete a note
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count total notes
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based note repository implementation
pub struct SqlxNoteRepository {
    pool: DbPool,
}

impl SqlxNoteRepository {
    /// Create a new SQLx note repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn NoteRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NoteRepository for SqlxNoteRepository {
    async fn create(&self, note: &Note) -> Result<Note> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO notes (title, body, slug, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.slug)
        .bind(note.author_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create note")?;

        Ok(Note {
            id: result.last_insert_rowid(),
            title: note.title.clone(),
            body: note.body.clone(),
            slug: note.slug.clone(),
            author_id: note.author_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, body, slug, author_id, created_at, updated_at
            FROM notes
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get note by slug")?;

        Ok(row.map(|r| row_to_note(&r)))
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Note>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, slug, author_id, created_at, updated_at
            FROM notes
            WHERE author_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list notes")?;

        Ok(rows.iter().map(row_to_note).collect())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check slug existence")?;

        Ok(count > 0)
    }

    async fn update(&self, note: &Note) -> Result<Note> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE notes
            SET title = ?, body = ?, slug = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.slug)
        .bind(now)
        .bind(note.id)
        .execute(&self.pool)
        .await
        .context("Failed to update note")?;

        self.get_by_slug(&note.slug)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Note not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete note")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM notes")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count notes")?;

        Ok(row.get("count"))
    }
}

fn row_to_note(row: &sqlx::sqlite::SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        slug: row.get("slug"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
