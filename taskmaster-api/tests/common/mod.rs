/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup via the real migration runner
/// - Fixture account creation
/// - Bearer token generation
/// - Request/response helpers for driving the router

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use taskmaster_api::app::{build_router, AppState};
use taskmaster_api::config::Config;
use taskmaster_shared::auth::jwt::{create_token, Claims};
use taskmaster_shared::auth::password::hash_password;
use taskmaster_shared::db::migrations::run_migrations;
use taskmaster_shared::models::user::{CreateUser, User, UserRole};
use taskmaster_shared::notify::NullNotifier;
use uuid::Uuid;

/// Password every fixture account is created with
pub const TEST_PASSWORD: &str = "secret-pass-1";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh fixture account
    ///
    /// The router uses the NullNotifier so task creation never touches a
    /// mail transport.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        let suffix = Uuid::new_v4();
        let user = User::create(
            &db,
            CreateUser {
                username: format!("test-{}", suffix),
                email: format!("test-{}@example.com", suffix),
                password_hash: hash_password(TEST_PASSWORD)?,
                role: UserRole::User,
            },
        )
        .await?;

        let claims = Claims::new(user.id, user.username.clone(), user.role);
        let token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone(), Arc::new(NullNotifier));
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            token,
        })
    }

    /// Cleans up test data (tasks cascade with the account)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Builds a JSON request, optionally authenticated
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Drives one request through the router and decodes the response
pub async fn call(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    use tower::Service as _;

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Registers an account through the API
pub async fn register_account(
    ctx: &TestContext,
    username: &str,
    email: &str,
    password: &str,
) -> (StatusCode, Value) {
    call(
        &ctx.app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            })),
        ),
    )
    .await
}

/// Logs in through the API
pub async fn login(ctx: &TestContext, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        &ctx.app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({
                "email": email,
                "password": password,
            })),
        ),
    )
    .await
}

/// Creates a task through the API with the given token
pub async fn create_task(ctx: &TestContext, token: &str, body: Value) -> (StatusCode, Value) {
    call(
        &ctx.app,
        json_request("POST", "/api/tasks", Some(token), Some(body)),
    )
    .await
}
