//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity.
///
/// A comment belongs to exactly one news item and one author. Only the
/// author may edit or delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Owning news item
    pub news_id: i64,
    /// Owning author
    pub author_id: i64,
    /// Comment text
    pub text: String,
    /// Creation timestamp, used for ordering
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Check whether the given user is the comment's author
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// Comment with the author's username joined in for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    /// Owning news item
    pub news_id: i64,
    /// Comment text
    pub text: String,
}
