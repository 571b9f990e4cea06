//! User service
//!
//! Implements business logic for accounts and sessions:
//! - Signup with unique usernames
//! - Login/logout with cookie session tokens
//! - Session validation with lazy expiry cleanup

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 14;

/// Maximum username length
const USERNAME_MAX_LEN: usize = 150;

/// Minimum password length
const PASSWORD_MIN_LEN: usize = 4;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for user signup
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub password: String,
}

impl SignupInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Input for user login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// User service for managing accounts and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Create a new user service with custom session expiration
    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username or password is unacceptable
    /// - `UserExists` if the username is already taken
    /// - `InternalError` for database errors
    pub async fn signup(&self, input: SignupInput) -> Result<User, UserServiceError> {
        self.validate_signup_input(&input)?;

        if self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let password_hash = hash_password(&input.password)
            .context("Failed to hash password")?;

        let user = User::new(input.username, password_hash);

        let created_user = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        Ok(created_user)
    }

    /// Login with credentials.
    ///
    /// Validates the provided credentials and creates a new session if
    /// valid. The error message does not distinguish a missing user
    /// from a wrong password.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if credentials are invalid
    /// - `InternalError` for database errors
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError("Invalid username or password".to_string())
            })?;

        let valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid username or password".to_string(),
            ));
        }

        let session = Session::new(user.id, self.session_expiration_days);

        self.session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(session)
    }

    /// Validate a session token and return the logged-in user.
    ///
    /// Expired sessions are deleted on sight and treated as anonymous.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to look up session")?
        {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(&session.id)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        self.user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")
    }

    /// End a session. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")
    }

    fn validate_signup_input(&self, input: &SignupInput) -> Result<(), UserServiceError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username must not be empty".to_string(),
            ));
        }
        if username.len() > USERNAME_MAX_LEN {
            return Err(UserServiceError::ValidationError(format!(
                "Username must be at most {} characters",
                USERNAME_MAX_LEN
            )));
        }
        if input.password.len() < PASSWORD_MIN_LEN {
            return Err(UserServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LEN
            )));
        }
        Ok(())
    }
}
