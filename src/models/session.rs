//! Session model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session entity representing an authenticated browser session.
///
/// The session id doubles as the cookie token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session token (UUID)
    pub id: String,
    /// Owning user ID
    pub user_id: i64,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user, expiring after the given number
    /// of days.
    pub fn new(user_id: i64, expiration_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(expiration_days),
            created_at: now,
        }
    }

    /// Check whether the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
