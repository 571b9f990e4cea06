//! Web middleware
//!
//! Session-cookie authentication:
//! - `optional_auth` attaches the current user when a valid session
//!   cookie is present and continues either way
//! - `require_auth` additionally redirects anonymous requests to the
//!   login page, preserving the original path in `?next=`

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::models::User;
use crate::web::error::{found, PageError};
use crate::web::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// The authenticated user attached to a request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                PageError::Internal(anyhow::anyhow!(
                    "CurrentUser extracted on a route without auth middleware"
                ))
            })
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

/// Extract the session token from the request's cookies
fn extract_session_token(request: &Request) -> Option<String> {
    let cookie_header = request.headers().get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(token) = cookie.strip_prefix("session=") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    None
}

/// Build the redirect to the login page for an anonymous request,
/// keeping the original path in `?next=`.
pub fn login_redirect(next: &str) -> Response {
    found(&format!("/auth/login?next={}", next))
}

/// Optional authentication middleware.
///
/// Attaches `CurrentUser` when the session cookie is valid; anonymous
/// and expired sessions just continue without it.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_token(&request) {
        if let Ok(Some(user)) = state.user_service.validate_session(&token).await {
            request.extensions_mut().insert(CurrentUser(user));
        }
    }
    next.run(request).await
}

/// Required authentication middleware.
///
/// Anonymous requests are redirected to the login page with the
/// original path preserved.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let token = match extract_session_token(&request) {
        Some(token) => token,
        None => return login_redirect(&path),
    };

    match state.user_service.validate_session(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => login_redirect(&path),
        Err(err) => PageError::Internal(err).into_response(),
    }
}
