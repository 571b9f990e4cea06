//! Comment service
//!
//! Business logic for comments: creation behind the banned-word
//! filter, and author-only editing and deletion. Non-author access is
//! reported as `NotFound` so that other users' comments are
//! indistinguishable from nonexistent ones.

use crate::db::repositories::{CommentRepository, NewsRepository};
use crate::models::{Comment, CommentWithAuthor, CreateCommentInput};
use crate::services::moderation::find_banned_word;
use anyhow::Context;
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Comment (or its news item) not found, or the requester is not
    /// the author
    #[error("Comment not found")]
    NotFound,

    /// Text contains a banned word
    #[error("The text contains words that are not allowed")]
    BannedWord,

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    news_repo: Arc<dyn NewsRepository>,
    banned_words: Vec<String>,
}

impl CommentService {
    /// Create a new comment service with the given banned-word list
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        news_repo: Arc<dyn NewsRepository>,
        banned_words: Vec<String>,
    ) -> Self {
        Self {
            comment_repo,
            news_repo,
            banned_words,
        }
    }

    /// Add a comment to a news item.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the news item does not exist
    /// - `ValidationError` if the text is empty
    /// - `BannedWord` if the text contains a banned word; nothing is
    ///   persisted in that case
    pub async fn add(
        &self,
        news_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, CommentServiceError> {
        if self
            .news_repo
            .get_by_id(news_id)
            .await
            .context("Failed to check news item")?
            .is_none()
        {
            return Err(CommentServiceError::NotFound);
        }

        self.check_text(text)?;

        let input = CreateCommentInput {
            news_id,
            text: text.to_string(),
        };

        let comment = self
            .comment_repo
            .create(&input, author_id)
            .await
            .context("Failed to create comment")?;

        Ok(comment)
    }

    /// List all comments under a news item, oldest first
    pub async fn list_for_news(
        &self,
        news_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, CommentServiceError> {
        let comments = self
            .comment_repo
            .list_by_news(news_id)
            .await
            .context("Failed to list comments")?;
        Ok(comments)
    }

    /// Fetch a comment on behalf of a user.
    ///
    /// Returns `NotFound` both when the comment does not exist and when
    /// the user is not its author.
    pub async fn get_for_author(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Comment, CommentServiceError> {
        let comment = self
            .comment_repo
            .get_by_id(id)
            .await
            .context("Failed to load comment")?
            .ok_or(CommentServiceError::NotFound)?;

        if !comment.is_authored_by(user_id) {
            return Err(CommentServiceError::NotFound);
        }

        Ok(comment)
    }

    /// Edit a comment's text. Author only; the new text goes through
    /// the same moderation as a new comment.
    pub async fn edit(
        &self,
        id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<Comment, CommentServiceError> {
        let comment = self.get_for_author(id, user_id).await?;

        self.check_text(text)?;

        self.comment_repo
            .update_text(comment.id, text)
            .await
            .context("Failed to update comment")?;

        self.comment_repo
            .get_by_id(comment.id)
            .await
            .context("Failed to reload comment")?
            .ok_or(CommentServiceError::NotFound)
    }

    /// Delete a comment. Author only.
    pub async fn remove(&self, id: i64, user_id: i64) -> Result<(), CommentServiceError> {
        let comment = self.get_for_author(id, user_id).await?;

        self.comment_repo
            .delete(comment.id)
            .await
            .context("Failed to delete comment")?;

        Ok(())
    }

    fn check_text(&self, text: &str) -> Result<(), CommentServiceError> {
        if text.trim().is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment text must not be empty".to_string(),
            ));
        }
        if find_banned_word(text, &self.banned_words).is_some() {
            return Err(CommentServiceError::BannedWord);
        }
        Ok(())
    }
}
