//! Note service
//!
//! Business logic for personal notes: slug derivation and uniqueness
//! on creation, and owner-only access to everything else. Non-owner
//! access is reported as `NotFound` so that other users' notes are
//! indistinguishable from nonexistent ones.

use crate::db::repositories::NoteRepository;
use crate::models::{CreateNoteInput, Note, UpdateNoteInput};
use crate::services::slug::{slugify, SLUG_MAX_LEN};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for note service operations
#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    /// Note not found, or the requester is not its owner
    #[error("Note not found")]
    NotFound,

    /// The requested slug is already taken
    #[error("{0} is already in use, pick a unique value")]
    DuplicateSlug(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Note service
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    /// Create a new note service
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// Create a note for a user.
    ///
    /// An explicit slug is validated for uniqueness; an omitted slug is
    /// derived from the title and truncated to the column limit.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if title or derived slug is empty, or an
    ///   explicit slug is too long
    /// - `DuplicateSlug` if the slug is already taken; nothing is
    ///   persisted in that case
    pub async fn create(
        &self,
        author_id: i64,
        input: CreateNoteInput,
    ) -> Result<Note, NoteServiceError> {
        if input.title.trim().is_empty() {
            return Err(NoteServiceError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }

        let slug = self.resolve_slug(input.slug.as_deref(), &input.title)?;

        if self
            .repo
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(NoteServiceError::DuplicateSlug(slug));
        }

        let now = Utc::now();
        let note = Note {
            id: 0,
            title: input.title,
            body: input.body,
            slug,
            author_id,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&note)
            .await
            .context("Failed to create note")?;

        Ok(created)
    }

    /// List all notes owned by a user
    pub async fn list_for(&self, author_id: i64) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self
            .repo
            .list_by_author(author_id)
            .await
            .context("Failed to list notes")?;
        Ok(notes)
    }

    /// Fetch a note on behalf of a user.
    ///
    /// Returns `NotFound` both when the slug does not exist and when
    /// the user is not the note's owner.
    pub async fn get_for(&self, slug: &str, user_id: i64) -> Result<Note, NoteServiceError> {
        let note = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to load note")?
            .ok_or(NoteServiceError::NotFound)?;

        if !note.is_owned_by(user_id) {
            return Err(NoteServiceError::NotFound);
        }

        Ok(note)
    }

    /// Update a note. Owner only.
    ///
    /// The slug follows the same rules as creation; the note's own
    /// current slug is not a collision.
    pub async fn update_for(
        &self,
        slug: &str,
        user_id: i64,
        input: UpdateNoteInput,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.get_for(slug, user_id).await?;

        if input.title.trim().is_empty() {
            return Err(NoteServiceError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }

        let new_slug = self.resolve_slug(input.slug.as_deref(), &input.title)?;

        if new_slug != note.slug
            && self
                .repo
                .exists_by_slug(&new_slug)
                .await
                .context("Failed to check slug uniqueness")?
        {
            return Err(NoteServiceError::DuplicateSlug(new_slug));
        }

        note.title = input.title;
        note.body = input.body;
        note.slug = new_slug;

        let updated = self
            .repo
            .update(&note)
            .await
            .context("Failed to update note")?;

        Ok(updated)
    }

    /// Delete a note. Owner only.
    pub async fn delete_for(&self, slug: &str, user_id: i64) -> Result<(), NoteServiceError> {
        let note = self.get_for(slug, user_id).await?;

        self.repo
            .delete(note.id)
            .await
            .context("Failed to delete note")?;

        Ok(())
    }

    /// Pick the note's slug: an explicit one as-is, otherwise derived
    /// from the title.
    fn resolve_slug(
        &self,
        explicit: Option<&str>,
        title: &str,
    ) -> Result<String, NoteServiceError> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => {
                if slug.len() > SLUG_MAX_LEN {
                    return Err(NoteServiceError::ValidationError(format!(
                        "Slug must be at most {} characters",
                        SLUG_MAX_LEN
                    )));
                }
                Ok(slug.to_string())
            }
            None => {
                let derived = slugify(title);
                if derived.is_empty() {
                    return Err(NoteServiceError::ValidationError(
                        "Cannot derive a slug from this title, supply one explicitly".to_string(),
                    ));
                }
                Ok(derived)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxNoteRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;

    struct Fixture {
        service: NoteService,
        author_id: i64,
        other_id: i64,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let author = user_repo
            .create(&User::new("author".to_string(), "hash".to_string()))
            .await
            .expect("Failed to create author");
        let other = user_repo
            .create(&User::new("anotheruser".to_string(), "hash".to_string()))
            .await
            .expect("Failed to create other user");

        Fixture {
            service: NoteService::new(SqlxNoteRepository::boxed(pool)),
            author_id: author.id,
            other_id: other.id,
        }
    }

    fn note_input(title: &str, slug: Option<&str>) -> CreateNoteInput {
        CreateNoteInput {
            title: title.to_string(),
            body: format!("Text for {}", title),
            slug: slug.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_create_note_with_explicit_slug() {
        let fx = setup().await;

        let note = fx
            .service
            .create(fx.author_id, note_input("Test Note", Some("test-note")))
            .await
            .expect("Failed to create note");

        assert_eq!(note.slug, "test-note");
        assert_eq!(note.author_id, fx.author_id);
    }

    #[tokio::test]
    async fn test_create_note_derives_slug_from_title() {
        let fx = setup().await;

        let note = fx
            .service
            .create(fx.author_id, note_input("Новая заметка", None))
            .await
            .expect("Failed to create note");

        assert_eq!(note.slug, slugify("Новая заметка"));
        assert_eq!(note.slug, "novaja-zametka");
    }

    #[tokio::test]
    async fn test_create_note_rejects_duplicate_slug() {
        let fx = setup().await;

        fx.service
            .create(fx.author_id, note_input("Existing Note", Some("existing-note")))
            .await
            .expect("Failed to create first note");

        let result = fx
            .service
            .create(fx.author_id, note_input("Duplicate Note", Some("existing-note")))
            .await;

        match result {
            Err(NoteServiceError::DuplicateSlug(slug)) => assert_eq!(slug, "existing-note"),
            other => panic!("Expected DuplicateSlug, got {:?}", other.map(|n| n.slug)),
        }

        // Only the first note exists
        let notes = fx
            .service
            .list_for(fx.author_id)
            .await
            .expect("Failed to list notes");
        assert_eq!(notes.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_crosses_users() {
        let fx = setup().await;

        fx.service
            .create(fx.author_id, note_input("Mine", Some("shared")))
            .await
            .expect("Failed to create first note");

        let result = fx
            .service
            .create(fx.other_id, note_input("Theirs", Some("shared")))
            .await;

        assert!(matches!(result, Err(NoteServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_create_note_rejects_empty_title() {
        let fx = setup().await;

        let result = fx.service.create(fx.author_id, note_input("  ", None)).await;

        assert!(matches!(result, Err(NoteServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_derived_slug_is_truncated() {
        let fx = setup().await;
        let long_title = "word ".repeat(50);

        let note = fx
            .service
            .create(fx.author_id, note_input(&long_title, None))
            .await
            .expect("Failed to create note");

        assert!(note.slug.len() <= SLUG_MAX_LEN);
    }

    #[tokio::test]
    async fn test_list_for_only_returns_own_notes() {
        let fx = setup().await;

        fx.service
            .create(fx.author_id, note_input("User Note", Some("user-note")))
            .await
            .expect("Failed to create note");
        fx.service
            .create(
                fx.other_id,
                note_input("Another User Note", Some("another-user-note")),
            )
            .await
            .expect("Failed to create note");

        let notes = fx
            .service
            .list_for(fx.author_id)
            .await
            .expect("Failed to list notes");

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].slug, "user-note");
    }

    #[tokio::test]
    async fn test_get_for_owner() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Mine", Some("mine")))
            .await
            .expect("Failed to create note");

        let note = fx
            .service
            .get_for("mine", fx.author_id)
            .await
            .expect("Failed to get note");

        assert_eq!(note.title, "Mine");
    }

    #[tokio::test]
    async fn test_get_for_non_owner_is_not_found() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Mine", Some("mine")))
            .await
            .expect("Failed to create note");

        let result = fx.service.get_for("mine", fx.other_id).await;

        assert!(matches!(result, Err(NoteServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_for_missing_slug() {
        let fx = setup().await;

        let result = fx.service.get_for("missing", fx.author_id).await;

        assert!(matches!(result, Err(NoteServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_owner_can_update_note() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Before", Some("keep-slug")))
            .await
            .expect("Failed to create note");

        let updated = fx
            .service
            .update_for(
                "keep-slug",
                fx.author_id,
                UpdateNoteInput {
                    title: "Updated Title".to_string(),
                    body: "Updated text".to_string(),
                    slug: Some("keep-slug".to_string()),
                },
            )
            .await
            .expect("Failed to update note");

        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.body, "Updated text");
        assert_eq!(updated.slug, "keep-slug");
    }

    #[tokio::test]
    async fn test_update_keeping_own_slug_is_not_a_collision() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Note", Some("my-slug")))
            .await
            .expect("Failed to create note");

        // Same slug resubmitted must not be treated as a duplicate
        let result = fx
            .service
            .update_for(
                "my-slug",
                fx.author_id,
                UpdateNoteInput {
                    title: "Note".to_string(),
                    body: "New body".to_string(),
                    slug: Some("my-slug".to_string()),
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_to_taken_slug_is_rejected() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("One", Some("one")))
            .await
            .expect("Failed to create note");
        fx.service
            .create(fx.author_id, note_input("Two", Some("two")))
            .await
            .expect("Failed to create note");

        let result = fx
            .service
            .update_for(
                "two",
                fx.author_id,
                UpdateNoteInput {
                    title: "Two".to_string(),
                    body: "text".to_string(),
                    slug: Some("one".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(NoteServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_note() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Mine", Some("mine")))
            .await
            .expect("Failed to create note");

        let result = fx
            .service
            .update_for(
                "mine",
                fx.other_id,
                UpdateNoteInput {
                    title: "Hacked Title".to_string(),
                    body: "Hacked text".to_string(),
                    slug: Some("mine".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(NoteServiceError::NotFound)));

        // The note must be unchanged
        let unchanged = fx
            .service
            .get_for("mine", fx.author_id)
            .await
            .expect("Failed to reload note");
        assert_eq!(unchanged.title, "Mine");
    }

    #[tokio::test]
    async fn test_owner_can_delete_note() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Delete Me", Some("delete-me")))
            .await
            .expect("Failed to create note");

        fx.service
            .delete_for("delete-me", fx.author_id)
            .await
            .expect("Failed to delete note");

        let result = fx.service.get_for("delete-me", fx.author_id).await;
        assert!(matches!(result, Err(NoteServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete_note() {
        let fx = setup().await;
        fx.service
            .create(fx.author_id, note_input("Mine", Some("mine")))
            .await
            .expect("Failed to create note");

        let result = fx.service.delete_for("mine", fx.other_id).await;

        assert!(matches!(result, Err(NoteServiceError::NotFound)));

        // The note still exists for its owner
        assert!(fx.service.get_for("mine", fx.author_id).await.is_ok());
    }
}
