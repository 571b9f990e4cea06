//! Web layer - HTTP handlers and routing
//!
//! Server-rendered pages for the two sections of the site:
//! - News: public home page and detail pages, authenticated comments
//! - Notes: private per-user notes
//!
//! Plus the authentication pages (signup, login, logout).

pub mod auth;
pub mod error;
pub mod middleware;
pub mod news;
pub mod notes;
pub mod templates;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::{CommentService, NewsService, NoteService, UserService};
use templates::PageTemplates;

pub use error::PageError;
pub use middleware::CurrentUser;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub news_service: Arc<NewsService>,
    pub comment_service: Arc<CommentService>,
    pub note_service: Arc<NoteService>,
    pub templates: Arc<PageTemplates>,
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    // News pages are public; the comment form handler decides for
    // itself what anonymous POSTs get
    let news_routes = Router::new()
        .route("/", get(news::home))
        .route("/news/{id}", get(news::news_detail).post(news::add_comment))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth,
        ));

    // Comment edit/delete pages require a logged-in user
    let comment_routes = Router::new()
        .route(
            "/news/comments/{id}/edit",
            get(news::edit_comment_page).post(news::edit_comment),
        )
        .route(
            "/news/comments/{id}/delete",
            get(news::delete_comment_page).post(news::delete_comment),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // The whole notes section requires a logged-in user
    let notes_routes = Router::new()
        .route("/notes", get(notes::list_notes))
        .route(
            "/notes/add",
            get(notes::add_note_page).post(notes::add_note),
        )
        .route("/notes/success", get(notes::note_success))
        .route("/notes/{slug}", get(notes::note_detail))
        .route(
            "/notes/{slug}/edit",
            get(notes::edit_note_page).post(notes::edit_note),
        )
        .route(
            "/notes/{slug}/delete",
            get(notes::delete_note_page).post(notes::delete_note),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let auth_routes = Router::new()
        .route("/auth/signup", get(auth::signup_page).post(auth::signup))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", get(auth::logout));

    Router::new()
        .merge(news_routes)
        .merge(comment_routes)
        .merge(notes_routes)
        .merge(auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
