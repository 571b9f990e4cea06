//! Web error type
//!
//! Converts service errors into HTTP responses. The contract is
//! deliberately small: a missing record and a record owned by someone
//! else both answer 404, everything unexpected answers 500.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::services::{
    CommentServiceError, NewsServiceError, NoteServiceError, UserServiceError,
};

/// Error for page handlers
#[derive(Debug)]
pub enum PageError {
    /// Object is missing, or the requester may not see it
    NotFound,
    /// Unexpected failure
    Internal(anyhow::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<h1>404 Not Found</h1>".to_string()),
            )
                .into_response(),
            PageError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>500 Internal Server Error</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        PageError::Internal(err)
    }
}

impl From<NewsServiceError> for PageError {
    fn from(err: NewsServiceError) -> Self {
        match err {
            NewsServiceError::NotFound(_) => PageError::NotFound,
            other => PageError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<CommentServiceError> for PageError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::NotFound => PageError::NotFound,
            other => PageError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<NoteServiceError> for PageError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::NotFound => PageError::NotFound,
            other => PageError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<UserServiceError> for PageError {
    fn from(err: UserServiceError) -> Self {
        PageError::Internal(anyhow::Error::new(err))
    }
}

/// A 302 Found redirect.
///
/// `axum::response::Redirect` answers 303 for its `to` constructor;
/// this site keeps the classic 302 for both login redirects and
/// post-mutation redirects.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
