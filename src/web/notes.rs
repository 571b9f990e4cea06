//! Notes pages
//!
//! - GET  /notes                 - the requesting user's notes, nobody else's
//! - GET/POST /notes/add         - create a note
//! - GET  /notes/success         - confirmation page after any mutation
//! - GET  /notes/{slug}          - note detail, owner only
//! - GET/POST /notes/{slug}/edit   - edit, owner only
//! - GET/POST /notes/{slug}/delete - delete, owner only
//!
//! The whole section sits behind `require_auth`: anonymous requests
//! are redirected to the login page with `?next=` set. Non-owner
//! access answers 404, never 403.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::models::{CreateNoteInput, UpdateNoteInput, User};
use crate::services::NoteServiceError;
use crate::web::error::{found, PageError};
use crate::web::middleware::CurrentUser;
use crate::web::templates::page_context;
use crate::web::AppState;

/// Form body for creating or editing a note
#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteForm {
    /// An empty slug field means "derive one from the title"
    fn slug_value(&self) -> Option<String> {
        let slug = self.slug.trim();
        if slug.is_empty() {
            None
        } else {
            Some(slug.to_string())
        }
    }
}

/// GET /notes
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let notes = state.note_service.list_for(user.id).await?;

    let mut context = page_context(Some(&user));
    context.insert("notes", &notes);

    let html = state.templates.render("notes/list.html", &context)?;
    Ok(Html(html))
}

/// GET /notes/add
pub async fn add_note_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let empty = NoteForm {
        title: String::new(),
        body: String::new(),
        slug: String::new(),
    };
    let html = render_form(&state, &user, "Add a note", "/notes/add", &empty, None, None)?;
    Ok(Html(html))
}

/// POST /notes/add
///
/// A duplicate slug re-renders the form with a field error on the slug
/// and stores nothing.
pub async fn add_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NoteForm>,
) -> Result<Response, PageError> {
    let input = CreateNoteInput {
        title: form.title.clone(),
        body: form.body.clone(),
        slug: form.slug_value(),
    };

    match state.note_service.create(user.id, input).await {
        Ok(_) => Ok(found("/notes/success")),
        Err(err @ NoteServiceError::DuplicateSlug(_)) => {
            let html = render_form(
                &state,
                &user,
                "Add a note",
                "/notes/add",
                &form,
                Some(&err.to_string()),
                None,
            )?;
            Ok(Html(html).into_response())
        }
        Err(NoteServiceError::ValidationError(message)) => {
            let html = render_form(
                &state,
                &user,
                "Add a note",
                "/notes/add",
                &form,
                None,
                Some(&message),
            )?;
            Ok(Html(html).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /notes/success
pub async fn note_success(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let context = page_context(Some(&user));
    let html = state.templates.render("notes/success.html", &context)?;
    Ok(Html(html))
}

/// GET /notes/{slug}
pub async fn note_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let note = state.note_service.get_for(&slug, user.id).await?;

    let mut context = page_context(Some(&user));
    context.insert("note", &note);

    let html = state.templates.render("notes/detail.html", &context)?;
    Ok(Html(html))
}

/// GET /notes/{slug}/edit
pub async fn edit_note_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let note = state.note_service.get_for(&slug, user.id).await?;

    let form = NoteForm {
        title: note.title.clone(),
        body: note.body.clone(),
        slug: note.slug.clone(),
    };
    let action = format!("/notes/{}/edit", note.slug);
    let html = render_form(&state, &user, "Edit note", &action, &form, None, None)?;
    Ok(Html(html))
}

/// POST /notes/{slug}/edit
pub async fn edit_note(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NoteForm>,
) -> Result<Response, PageError> {
    let input = UpdateNoteInput {
        title: form.title.clone(),
        body: form.body.clone(),
        slug: form.slug_value(),
    };

    match state.note_service.update_for(&slug, user.id, input).await {
        Ok(_) => Ok(found("/notes/success")),
        Err(err @ NoteServiceError::DuplicateSlug(_)) => {
            let action = format!("/notes/{}/edit", slug);
            let html = render_form(
                &state,
                &user,
                "Edit note",
                &action,
                &form,
                Some(&err.to_string()),
                None,
            )?;
            Ok(Html(html).into_response())
        }
        Err(NoteServiceError::ValidationError(message)) => {
            let action = format!("/notes/{}/edit", slug);
            let html = render_form(
                &state,
                &user,
                "Edit note",
                &action,
                &form,
                None,
                Some(&message),
            )?;
            Ok(Html(html).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /notes/{slug}/delete
pub async fn delete_note_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, PageError> {
    let note = state.note_service.get_for(&slug, user.id).await?;

    let mut context = page_context(Some(&user));
    context.insert("note", &note);

    let html = state.templates.render("notes/delete.html", &context)?;
    Ok(Html(html))
}

/// POST /notes/{slug}/delete
pub async fn delete_note(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, PageError> {
    state.note_service.delete_for(&slug, user.id).await?;

    Ok(found("/notes/success"))
}

/// Render the shared add/edit form
fn render_form(
    state: &AppState,
    user: &User,
    heading: &str,
    action: &str,
    form: &NoteForm,
    slug_error: Option<&str>,
    form_error: Option<&str>,
) -> Result<String, PageError> {
    let mut context = page_context(Some(user));
    context.insert("heading", heading);
    context.insert("form_action", action);
    context.insert("title", &form.title);
    context.insert("body", &form.body);
    context.insert("slug", &form.slug);
    if let Some(message) = slug_error {
        context.insert("slug_error", message);
    }
    if let Some(message) = form_error {
        context.insert("form_error", message);
    }

    Ok(state.templates.render("notes/form.html", &context)?)
}
