/// Common test utilities for integration tests
///
/// Provides a TestContext with a fresh user, a signed token, and a router
/// wired to a mocked chat collaborator so no test needs network access.
///
/// Tests require a running PostgreSQL instance; set DATABASE_URL to enable
/// them. When it is unset, TestContext::new returns None and each test
/// returns early, so the suite passes on machines without a database.

use std::sync::Arc;

use sqlx::PgPool;
use taskchat_api::app::{build_router, AppState};
use taskchat_api::chat::MockChat;
use taskchat_api::config::{ApiConfig, ChatConfig, Config, DatabaseConfig, JwtConfig};
use taskchat_shared::auth::{jwt, password};
use taskchat_shared::models::user::{CreateUser, User};
use uuid::Uuid;

/// Reply the mocked collaborator gives for free-form chat
pub const MOCK_CHAT_REPLY: &str = "Hello! How can I help with your tasks today?";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    ///
    /// Returns None when DATABASE_URL is not set.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        Self::with_chat(Arc::new(MockChat::new(MOCK_CHAT_REPLY))).await
    }

    /// Creates a test context wired to a specific chat provider
    pub async fn with_chat(
        chat: Arc<dyn taskchat_api::chat::ChatProvider>,
    ) -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return Ok(None);
        };

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-0123456789abcdef".to_string(),
            },
            chat: ChatConfig {
                api_key: "test-key".to_string(),
                api_url: "http://localhost:1/unused".to_string(),
            },
        };

        let db = PgPool::connect(&database_url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = create_test_user(&db).await?;

        let claims = jwt::Claims::new(user.id, &user.email);
        let jwt_token = jwt::create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone(), chat);
        let app = build_router(state);

        Ok(Some(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        }))
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Creates a second user with their own token, for isolation tests
    pub async fn other_user(&self) -> anyhow::Result<(User, String)> {
        let user = create_test_user(&self.db).await?;
        let claims = jwt::Claims::new(user.id, &user.email);
        let token = jwt::create_token(&claims, &self.config.jwt.secret)?;
        Ok((user, token))
    }

    /// Cleans up test data (cascades to tasks, conversations, messages)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        delete_user(&self.db, self.user.id).await
    }

    /// Removes an extra user created via other_user
    pub async fn cleanup_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        delete_user(&self.db, user_id).await
    }
}

async fn create_test_user(db: &PgPool) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: password::hash_password("test-password-123")?,
            name: Some("Test User".to_string()),
        },
    )
    .await?;

    Ok(user)
}

async fn delete_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
