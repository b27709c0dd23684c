//! # TaskChat API Server
//!
//! HTTP backend for a task-management app with a built-in chatbot. Provides:
//! - JWT-authenticated task CRUD endpoints
//! - Conversations with transcripts
//! - A chatbot that routes messages to task operations or to Cohere
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskchat-api
//! ```
//!
//! Configuration comes from environment variables (a `.env` file is loaded
//! when present); see [`taskchat_api::config::Config`].

use std::sync::Arc;

use taskchat_api::{app, chat::CohereChat, config::Config};
use taskchat_shared::db;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskchat_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskChat API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = db::create_pool(db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..db::DatabaseConfig::default()
    })
    .await?;

    db::run_migrations(&pool).await?;

    let chat = Arc::new(CohereChat::new(
        config.chat.api_url.clone(),
        config.chat.api_key.clone(),
    ));

    let bind_address = config.bind_address();
    let state = app::AppState::new(pool, config, chat);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}
