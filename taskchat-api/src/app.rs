/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskchat_api::{app::AppState, chat::MockChat, config::Config};
/// use std::sync::Arc;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Arc::new(MockChat::new("hi")));
/// let app = taskchat_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{chat::ChatProvider, config::Config};
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use taskchat_shared::auth::jwt;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// External chat collaborator
    pub chat: Arc<dyn ChatProvider>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, chat: Arc<dyn ChatProvider>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            chat,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Authenticated caller identity, injected by the auth layer
///
/// Handlers extract it with `Extension<AuthUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// Verified user ID (token subject)
    pub user_id: Uuid,

    /// Email carried in the token
    pub email: String,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /auth/                         # Authentication (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /api/v1/                       # Protected API (Bearer token)
///     ├── GET    /tasks
///     ├── POST   /tasks
///     ├── GET    /tasks/:id
///     ├── PATCH  /tasks/:id
///     ├── DELETE /tasks/:id
///     ├── PUT    /tasks/:id/complete
///     ├── GET    /conversations
///     ├── POST   /conversations
///     ├── GET    /conversations/:id
///     ├── POST   /conversations/initiate
///     └── POST   /conversations/:id/messages
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (permissive; this is an internal tool)
/// 3. JWT authentication on /api/v1 only
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Protected API (require JWT authentication)
    let api_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/complete", put(routes::tasks::set_task_completion))
        .route(
            "/conversations",
            get(routes::conversations::list_conversations)
                .post(routes::conversations::create_conversation),
        )
        .route(
            "/conversations/initiate",
            post(routes::conversations::initiate_conversation),
        )
        .route(
            "/conversations/:id",
            get(routes::conversations::get_conversation),
        )
        .route(
            "/conversations/:id/messages",
            post(routes::conversations::add_message),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/api/v1", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization header,
/// then injects [`AuthUser`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::Unauthorized("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}
