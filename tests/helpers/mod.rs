//! Shared test helpers for integration tests.
//!
//! These tests need a running PostgreSQL instance; the connection URL
//! comes from `LIBRIS__DATABASE__URL` or config/test.toml.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use libris_core::config::AppConfig;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
}

/// A decoded test response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application against a clean database.
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db_pool = libris_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");

        libris_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let state = libris_api::app::build_state(config.clone(), db_pool.clone());
        let router = libris_api::app::build_app(state);

        Self {
            router,
            db_pool,
            config,
        }
    }

    async fn clean_database(pool: &PgPool) {
        sqlx::query("TRUNCATE loan_records, book_copies, books, users CASCADE")
            .execute(pool)
            .await
            .expect("Failed to clean database");
    }

    /// Insert a user and return its ID.
    pub async fn seed_user(&self, username: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (username, display_name) VALUES ($1, $2) RETURNING user_id",
        )
        .bind(username)
        .bind(format!("{username} (test)"))
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to seed user")
    }

    /// Insert a book and return its ID.
    pub async fn seed_book(&self, title: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO books (title, author) VALUES ($1, 'Test Author') RETURNING book_id",
        )
        .bind(title)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to seed book")
    }

    /// Insert an available copy and return its ID.
    pub async fn seed_copy(&self, book_id: i64, barcode: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO book_copies (book_id, barcode, status) \
             VALUES ($1, $2, 'available') RETURNING copy_id",
        )
        .bind(book_id)
        .bind(barcode)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to seed copy")
    }

    /// Issue a request with identity headers, returning status and body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        identity: Option<(Uuid, bool)>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some((user_id, is_admin)) = identity {
            builder = builder.header("x-user-id", user_id.to_string());
            if is_admin {
                builder = builder.header("x-user-admin", "true");
            }
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body was not JSON")
        };

        TestResponse { status, body }
    }

    /// Borrow a copy as the given user, asserting success, returning the
    /// record ID.
    pub async fn borrow(&self, user_id: Uuid, copy_id: i64) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/loans",
                Some(serde_json::json!({ "copy_id": copy_id })),
                Some((user_id, false)),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["record_id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("Missing record_id in borrow response")
    }
}
