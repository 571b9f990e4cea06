//! Authentication pages
//!
//! - GET/POST /auth/signup - registration form
//! - GET/POST /auth/login  - login form, honoring `?next=`
//! - GET      /auth/logout - ends the session and renders a farewell
//!
//! All three pages are reachable anonymously.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::services::user::{LoginInput, SignupInput, UserServiceError};
use crate::web::error::{found, PageError};
use crate::web::middleware::SESSION_COOKIE;
use crate::web::templates::page_context;
use crate::web::AppState;

/// Session cookie lifetime, matching the session expiry
const SESSION_COOKIE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;

/// Query parameters for the login page
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Form body for signup
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

/// Form body for login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// GET /auth/signup
pub async fn signup_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let context = page_context(None);
    let html = state.templates.render("auth/signup.html", &context)?;
    Ok(Html(html))
}

/// POST /auth/signup
///
/// On success redirects to the login page. Validation problems
/// re-render the form with a field error and status 200.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, PageError> {
    let input = SignupInput::new(form.username.clone(), form.password);

    match state.user_service.signup(input).await {
        Ok(_) => Ok(found("/auth/login")),
        Err(UserServiceError::UserExists(message)) => {
            let mut context = page_context(None);
            context.insert("username", &form.username);
            context.insert("username_error", &message);
            let html = state.templates.render("auth/signup.html", &context)?;
            Ok(Html(html).into_response())
        }
        Err(UserServiceError::ValidationError(message)) => {
            let mut context = page_context(None);
            context.insert("username", &form.username);
            context.insert("form_error", &message);
            let html = state.templates.render("auth/signup.html", &context)?;
            Ok(Html(html).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /auth/login
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Html<String>, PageError> {
    let mut context = page_context(None);
    if let Some(next) = &query.next {
        context.insert("next", next);
    }
    let html = state.templates.render("auth/login.html", &context)?;
    Ok(Html(html))
}

/// POST /auth/login
///
/// On success sets the session cookie and redirects to `next` (when it
/// is a safe site-local path) or the home page. Bad credentials
/// re-render the form with an error and status 200.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let input = LoginInput::new(form.username, form.password);

    let session = match state.user_service.login(input).await {
        Ok(session) => session,
        Err(UserServiceError::AuthenticationError(_)) => {
            let mut context = page_context(None);
            context.insert("form_error", "Invalid username or password");
            if let Some(next) = &form.next {
                context.insert("next", next);
            }
            let html = state.templates.render("auth/login.html", &context)?;
            return Ok(Html(html).into_response());
        }
        Err(err) => return Err(err.into()),
    };

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, session.id, SESSION_COOKIE_MAX_AGE_SECS
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| PageError::Internal(anyhow::anyhow!("Invalid cookie value: {}", e)))?,
    );

    let destination = form
        .next
        .as_deref()
        .filter(|next| is_safe_next(next))
        .unwrap_or("/");

    Ok((headers, found(destination)).into_response())
}

/// GET /auth/logout
///
/// Ends the session when one exists and renders the logged-out page.
/// Safe to visit anonymously.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if let Some(token) = session_token_from_headers(&headers) {
        state
            .user_service
            .logout(&token)
            .await
            .map_err(PageError::Internal)?;
    }

    // Clear the session cookie
    let clear_cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&clear_cookie)
            .map_err(|e| PageError::Internal(anyhow::anyhow!("Invalid cookie value: {}", e)))?,
    );

    let context = page_context(None);
    let html = state.templates.render("auth/logged_out.html", &context)?;

    Ok((response_headers, Html(html)).into_response())
}

/// Only site-local paths qualify as a login destination
fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//")
}

fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_str = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_str
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix("session="))
        .filter(|t| !t.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestHarness;
    use axum::http::StatusCode;

    #[test]
    fn test_is_safe_next() {
        assert!(is_safe_next("/notes"));
        assert!(is_safe_next("/news/1"));
        assert!(!is_safe_next("//evil.example"));
        assert!(!is_safe_next("https://evil.example"));
        assert!(!is_safe_next(""));
    }

    #[tokio::test]
    async fn test_signup_page_renders() {
        let harness = TestHarness::new().await;
        let client = harness.client();

        let response = client.get("/auth/signup").await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("signup-form"));
    }

    #[tokio::test]
    async fn test_signup_redirects_to_login() {
        let harness = TestHarness::new().await;
        let client = harness.client();

        let response = client
            .post("/auth/signup")
            .form(&[("username", "newuser"), ("password", "password")])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/auth/login");
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_rerenders_with_error() {
        let harness = TestHarness::new().await;
        harness.create_user("taken", "password").await;
        let client = harness.client();

        let response = client
            .post("/auth/signup")
            .form(&[("username", "taken"), ("password", "password")])
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("field-error"));
        assert!(response.text().contains("already taken"));
    }

    #[tokio::test]
    async fn test_login_page_renders_with_next() {
        let harness = TestHarness::new().await;
        let client = harness.client();

        let response = client.get("/auth/login?next=/notes/add").await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("value=\"/notes/add\""));
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_redirects_home() {
        let harness = TestHarness::new().await;
        harness.create_user("testuser", "password").await;
        let client = harness.client();

        let response = client
            .post("/auth/login")
            .form(&[("username", "testuser"), ("password", "password")])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/");
        let set_cookie = response.header("set-cookie");
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_login_redirects_to_next() {
        let harness = TestHarness::new().await;
        harness.create_user("testuser", "password").await;
        let client = harness.client();

        let response = client
            .post("/auth/login")
            .form(&[
                ("username", "testuser"),
                ("password", "password"),
                ("next", "/notes/add"),
            ])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/notes/add");
    }

    #[tokio::test]
    async fn test_login_ignores_offsite_next() {
        let harness = TestHarness::new().await;
        harness.create_user("testuser", "password").await;
        let client = harness.client();

        let response = client
            .post("/auth/login")
            .form(&[
                ("username", "testuser"),
                ("password", "password"),
                ("next", "https://evil.example/"),
            ])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/");
    }

    #[tokio::test]
    async fn test_login_bad_credentials_rerenders() {
        let harness = TestHarness::new().await;
        harness.create_user("testuser", "password").await;
        let client = harness.client();

        let response = client
            .post("/auth/login")
            .form(&[("username", "testuser"), ("password", "wrong")])
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let harness = TestHarness::new().await;
        harness.create_user("testuser", "password").await;
        let client = harness.client();
        harness.login(&client, "testuser", "password").await;

        // Logged in: notes are reachable
        client.get("/notes").await.assert_status(StatusCode::OK);

        let response = client.get("/auth/logout").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("logged out"));

        // Session gone: notes redirect to login again
        let response = client.get("/notes").await;
        response.assert_status(StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_logout_for_anonymous_user_is_ok() {
        let harness = TestHarness::new().await;
        let client = harness.client();

        let response = client.get("/auth/logout").await;

        response.assert_status(StatusCode::OK);
    }
}
