//! News model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News entity.
///
/// News items are seeded by an administrator and read-only to end
/// users. Listing pages order them by `date`, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    /// Unique identifier
    pub id: i64,
    /// Headline
    pub title: String,
    /// Body text
    pub body: String,
    /// Publication timestamp, used for ordering
    pub date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating a news item
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNewsInput {
    /// Headline
    pub title: String,
    /// Body text
    pub body: String,
    /// Publication timestamp; defaults to now when omitted
    pub date: Option<DateTime<Utc>>,
}

impl CreateNewsInput {
    /// Create a new input with the publication date defaulting to now
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            date: None,
        }
    }

    /// Set an explicit publication date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}
