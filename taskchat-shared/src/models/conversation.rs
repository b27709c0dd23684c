/// Conversation model and database operations
///
/// A conversation is a per-user chat thread holding an ordered list of
/// messages. The title is optional; when a conversation is initiated from a
/// first message, the API derives a truncated title from that message.
/// `updated_at` is bumped whenever a message is appended.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE conversations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::owned::Owned;

/// Conversation model representing a chat thread
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,

    /// User who owns this conversation
    pub user_id: Uuid,

    /// Optional thread title
    pub title: Option<String>,

    /// When the conversation was created
    pub created_at: DateTime<Utc>,

    /// When a message was last appended
    pub updated_at: DateTime<Utc>,
}

impl Owned for Conversation {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Conversation {
    /// Creates a new conversation owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        title: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(pool)
        .await?;

        Ok(conversation)
    }

    /// Finds a conversation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(conversation)
    }

    /// Finds a conversation by ID, filtered through the ownership guard
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let conversation = Self::find_by_id(pool, id).await?;
        Ok(super::owned::owned_by(conversation, user_id))
    }

    /// Lists all conversations owned by a user, most recently updated first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(conversations)
    }

    /// Bumps `updated_at` to NOW()
    ///
    /// Called after a message is appended. Callers treat failure as
    /// non-fatal.
    pub async fn touch(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
