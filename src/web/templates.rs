//! Page templates
//!
//! Tera templates for all server-rendered pages. The template sources
//! are embedded in the binary with rust-embed, so the site runs from a
//! single executable without a templates directory on disk.

use anyhow::{Context as AnyhowContext, Result};
use rust_embed::RustEmbed;
use tera::{Context as TeraContext, Tera};

use crate::models::User;

/// Embedded template sources
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Compiled page templates
pub struct PageTemplates {
    tera: Tera,
}

impl PageTemplates {
    /// Compile all embedded templates.
    ///
    /// Templates are registered in one batch so inheritance works no
    /// matter how the embed iterates them.
    pub fn new() -> Result<Self> {
        let mut sources = Vec::new();

        for path in EmbeddedTemplates::iter() {
            let file = EmbeddedTemplates::get(&path)
                .with_context(|| format!("Missing embedded template: {}", path))?;
            let content = std::str::from_utf8(file.data.as_ref())
                .with_context(|| format!("Template is not valid UTF-8: {}", path))?
                .to_string();
            sources.push((path.to_string(), content));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)
            .context("Failed to compile page templates")?;

        Ok(Self { tera })
    }

    /// Render a template to an HTML string
    pub fn render(&self, name: &str, context: &TeraContext) -> Result<String> {
        self.tera
            .render(name, context)
            .with_context(|| format!("Failed to render template '{}'", name))
    }
}

/// Build a template context seeded with the current user (or lack of
/// one), which the base layout uses for the navigation bar.
pub fn page_context(user: Option<&User>) -> TeraContext {
    let mut context = TeraContext::new();
    context.insert("user", &user);
    context
}
