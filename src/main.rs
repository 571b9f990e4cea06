//! Gazette - a small server-rendered news and personal notes site

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gazette::{
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCommentRepository, SqlxNewsRepository, SqlxNoteRepository,
            SqlxSessionRepository, SqlxUserRepository,
        },
    },
    services::{
        comment::CommentService, news::NewsService, note::NoteService, user::UserService,
    },
    web::{self, templates::PageTemplates, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazette=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gazette...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let news_repo = SqlxNewsRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());
    let note_repo = SqlxNoteRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, session_repo));
    let news_service = Arc::new(NewsService::new(
        news_repo.clone(),
        config.pagination.news_per_page,
    ));
    let comment_service = Arc::new(CommentService::new(
        comment_repo,
        news_repo,
        config.moderation.banned_words.clone(),
    ));
    let note_service = Arc::new(NoteService::new(note_repo));

    // Load embedded page templates
    let templates = Arc::new(PageTemplates::new()?);
    tracing::info!("Page templates loaded");

    // Build application state
    let state = AppState {
        user_service,
        news_service,
        comment_service,
        note_service,
        templates,
    };

    // Build router
    let app = web::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
