//! Test utilities
//!
//! In-memory application harness and fixtures for HTTP tests. Each
//! harness owns a fresh SQLite database; `client()` hands out a
//! cookie-keeping test client, so separate clients act as separate
//! browsers against the same site.

use axum::http::StatusCode;
use axum_test::{TestServer, TestServerConfig};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::db::repositories::{
    NoteRepository, SqlxCommentRepository, SqlxNewsRepository, SqlxNoteRepository,
    SqlxSessionRepository, SqlxUserRepository,
};
use crate::db::{create_test_pool, migrations, DbPool};
use crate::models::{CreateNewsInput, CreateNoteInput, News, Note, User};
use crate::services::user::SignupInput;
use crate::services::{CommentService, NewsService, NoteService, UserService};
use crate::web::{build_router, templates::PageTemplates, AppState};

/// Banned words used by every test harness
pub const TEST_BANNED_WORDS: &[&str] = &["redcap", "scoundrel"];

/// News page size used by every test harness
pub const TEST_NEWS_PER_PAGE: u32 = 10;

/// A full application wired against an in-memory database
pub struct TestHarness {
    pub pool: DbPool,
    pub state: AppState,
    note_repo: Arc<dyn NoteRepository>,
}

/// A news item with one comment by "testuser"; "anotheruser" is a
/// registered bystander
pub struct NewsFixture {
    pub news_id: i64,
    pub comment_id: i64,
    pub author_id: i64,
    pub reader_id: i64,
}

/// A note owned by "author"; "anotheruser" is a registered bystander
pub struct NoteFixture {
    pub note_id: i64,
    pub slug: String,
    pub author_id: i64,
    pub other_id: i64,
}

impl TestHarness {
    pub async fn new() -> Self {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let news_repo = SqlxNewsRepository::boxed(pool.clone());
        let comment_repo = SqlxCommentRepository::boxed(pool.clone());
        let note_repo = SqlxNoteRepository::boxed(pool.clone());

        let user_service = Arc::new(UserService::new(user_repo, session_repo));
        let news_service = Arc::new(NewsService::new(news_repo.clone(), TEST_NEWS_PER_PAGE));
        let comment_service = Arc::new(CommentService::new(
            comment_repo,
            news_repo,
            TEST_BANNED_WORDS.iter().map(|w| w.to_string()).collect(),
        ));
        let note_service = Arc::new(NoteService::new(note_repo.clone()));

        let templates =
            Arc::new(PageTemplates::new().expect("Failed to compile page templates"));

        let state = AppState {
            user_service,
            news_service,
            comment_service,
            note_service,
            templates,
        };

        Self {
            pool,
            state,
            note_repo,
        }
    }

    /// A fresh client with its own cookie jar
    pub fn client(&self) -> TestServer {
        let config = TestServerConfig {
            save_cookies: true,
            ..TestServerConfig::default()
        };
        TestServer::new_with_config(build_router(self.state.clone()), config)
            .expect("Failed to start test server")
    }

    /// Register a user directly through the service
    pub async fn create_user(&self, username: &str, password: &str) -> User {
        self.state
            .user_service
            .signup(SignupInput::new(username, password))
            .await
            .expect("Failed to create user")
    }

    /// Log a client in through the login form
    pub async fn login(&self, client: &TestServer, username: &str, password: &str) {
        let response = client
            .post("/auth/login")
            .form(&[("username", username), ("password", password)])
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::FOUND,
            "login failed for {}",
            username
        );
    }

    pub async fn create_news(&self, title: &str, body: &str) -> News {
        self.state
            .news_service
            .create(CreateNewsInput::new(title, body))
            .await
            .expect("Failed to create news")
    }

    pub async fn create_news_at(&self, title: &str, body: &str, date: DateTime<Utc>) -> News {
        self.state
            .news_service
            .create(CreateNewsInput::new(title, body).with_date(date))
            .await
            .expect("Failed to create news")
    }

    /// Insert a comment with an explicit creation timestamp, for
    /// ordering tests
    pub async fn create_comment_at(
        &self,
        news_id: i64,
        author_id: i64,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> i64 {
        let result = sqlx::query(
            r#"
            INSERT INTO comments (news_id, author_id, text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(news_id)
        .bind(author_id)
        .bind(text)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .expect("Failed to insert comment");

        result.last_insert_rowid()
    }

    pub async fn create_note(&self, author_id: i64, title: &str, slug: &str) -> Note {
        self.state
            .note_service
            .create(
                author_id,
                CreateNoteInput {
                    title: title.to_string(),
                    body: format!("Text for {}", title),
                    slug: Some(slug.to_string()),
                },
            )
            .await
            .expect("Failed to create note")
    }

    pub async fn comment_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count comments")
    }

    pub async fn note_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count notes")
    }

    /// Text and author of the only comment in the database
    pub async fn single_comment(&self) -> (String, i64) {
        use sqlx::Row;
        let row = sqlx::query("SELECT text, author_id FROM comments")
            .fetch_one(&self.pool)
            .await
            .expect("Expected exactly one comment");
        (row.get("text"), row.get("author_id"))
    }

    pub async fn note_by_slug(&self, slug: &str) -> Note {
        self.note_repo
            .get_by_slug(slug)
            .await
            .expect("Failed to load note")
            .expect("Note not found")
    }

    /// News item with a comment by "testuser", plus "anotheruser"
    pub async fn news_fixture(&self) -> NewsFixture {
        let author = self.create_user("testuser", "password").await;
        let reader = self.create_user("anotheruser", "password").await;
        let news = self
            .create_news("Test News", "This is a test news item.")
            .await;

        let comment = self
            .state
            .comment_service
            .add(news.id, author.id, "This is a test comment.")
            .await
            .expect("Failed to create comment");

        NewsFixture {
            news_id: news.id,
            comment_id: comment.id,
            author_id: author.id,
            reader_id: reader.id,
        }
    }

    /// Note owned by "author", plus "anotheruser"
    pub async fn note_fixture(&self) -> NoteFixture {
        let author = self.create_user("author", "password").await;
        let other = self.create_user("anotheruser", "password").await;
        let note = self.create_note(author.id, "User's Note", "user-note").await;

        NoteFixture {
            note_id: note.id,
            slug: note.slug,
            author_id: author.id,
            other_id: other.id,
        }
    }
}
