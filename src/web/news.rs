//! News pages
//!
//! - GET  /                          - paginated home page, newest first
//! - GET  /news/{id}                 - news detail with comments, oldest first
//! - POST /news/{id}                 - add a comment (authenticated)
//! - GET/POST /news/comments/{id}/edit   - edit own comment
//! - GET/POST /news/comments/{id}/delete - delete own comment
//!
//! The comment form only renders for logged-in users; anonymous
//! submissions are redirected to the login page with the news detail
//! path in `?next=`.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::models::User;
use crate::services::CommentServiceError;
use crate::web::error::{found, PageError};
use crate::web::middleware::{login_redirect, CurrentUser};
use crate::web::templates::page_context;
use crate::web::AppState;

/// Form body for adding or editing a comment
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
) -> Result<Html<String>, PageError> {
    let news_list = state.news_service.home_page().await?;

    let mut context = page_context(user.as_ref().map(|u| &u.0));
    context.insert("news_list", &news_list);

    let html = state.templates.render("news/index.html", &context)?;
    Ok(Html(html))
}

/// GET /news/{id}
pub async fn news_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: Option<CurrentUser>,
) -> Result<Html<String>, PageError> {
    render_detail(&state, id, user.as_ref().map(|u| &u.0), "", None).await
}

/// POST /news/{id}
///
/// Adds a comment. Anonymous users are sent to the login page; a
/// banned word re-renders the detail page with a field error on the
/// text and no comment is stored.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: Option<CurrentUser>,
    Form(form): Form<CommentForm>,
) -> Result<Response, PageError> {
    let user = match user {
        Some(user) => user.0,
        None => return Ok(login_redirect(&format!("/news/{}", id))),
    };

    match state.comment_service.add(id, user.id, &form.text).await {
        Ok(_) => Ok(found(&format!("/news/{}#comments", id))),
        Err(err @ (CommentServiceError::BannedWord | CommentServiceError::ValidationError(_))) => {
            let html =
                render_detail(&state, id, Some(&user), &form.text, Some(&err.to_string()))
                    .await?;
            Ok(html.into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /news/comments/{id}/edit
///
/// Only the comment's author gets the form; everyone else gets 404.
pub async fn edit_comment_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;

    let mut context = page_context(Some(&user));
    context.insert("comment", &comment);
    context.insert("text", &comment.text);

    let html = state.templates.render("news/comment_edit.html", &context)?;
    Ok(Html(html))
}

/// POST /news/comments/{id}/edit
pub async fn edit_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CommentForm>,
) -> Result<Response, PageError> {
    match state.comment_service.edit(id, user.id, &form.text).await {
        Ok(comment) => Ok(found(&format!("/news/{}#comments", comment.news_id))),
        Err(err @ (CommentServiceError::BannedWord | CommentServiceError::ValidationError(_))) => {
            // The author failed moderation; show the form again
            let comment = state.comment_service.get_for_author(id, user.id).await?;

            let mut context = page_context(Some(&user));
            context.insert("comment", &comment);
            context.insert("text", &form.text);
            context.insert("text_error", &err.to_string());

            let html = state.templates.render("news/comment_edit.html", &context)?;
            Ok(Html(html).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /news/comments/{id}/delete
pub async fn delete_comment_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;

    let mut context = page_context(Some(&user));
    context.insert("comment", &comment);

    let html = state
        .templates
        .render("news/comment_delete.html", &context)?;
    Ok(Html(html))
}

/// POST /news/comments/{id}/delete
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, PageError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;

    state.comment_service.remove(id, user.id).await?;

    Ok(found(&format!("/news/{}#comments", comment.news_id)))
}

/// Render the news detail page with its comment section
async fn render_detail(
    state: &AppState,
    news_id: i64,
    user: Option<&User>,
    text: &str,
    text_error: Option<&str>,
) -> Result<Html<String>, PageError> {
    let news = state.news_service.get(news_id).await?;
    let comments = state.comment_service.list_for_news(news_id).await?;

    let mut context = page_context(user);
    context.insert("news", &news);
    context.insert("comments", &comments);
    context.insert("text", text);
    if let Some(message) = text_error {
        context.insert("text_error", message);
    }

    let html = state.templates.render("news/detail.html", &context)?;
    Ok(Html(html))
}
