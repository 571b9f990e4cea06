//! Note model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note entity.
///
/// A note belongs to exactly one author and is invisible to everyone
/// else. The slug is unique across all notes and addressable in URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Body text
    pub body: String,
    /// URL-friendly unique slug
    pub slug: String,
    /// Owning author
    pub author_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Check whether the given user owns the note
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// Input for creating a note
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteInput {
    /// Title
    pub title: String,
    /// Body text
    pub body: String,
    /// Explicit slug; derived from the title when omitted
    pub slug: Option<String>,
}

/// Input for updating a note
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoteInput {
    /// New title
    pub title: String,
    /// New body text
    pub body: String,
    /// New slug; derived from the title when omitted
    pub slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owned_by() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            title: "Title".to_string(),
            body: "Body".to_string(),
            slug: "title".to_string(),
            author_id: 7,
            created_at: now,
            updated_at: now,
        };

        assert!(note.is_owned_by(7));
        assert!(!note.is_owned_by(8));
    }
}
