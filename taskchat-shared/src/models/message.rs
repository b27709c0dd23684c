/// Message model and database operations
///
/// Messages are append-only records within a conversation, ordered by
/// `created_at` ascending. Assistant replies are stored under the same
/// user_id as the conversation owner so every message carries the owning
/// user.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE message_role AS ENUM ('user', 'assistant');
///
/// CREATE TABLE messages (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     conversation_id UUID NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role message_role NOT NULL DEFAULT 'user',
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::owned::Owned;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Sent by the human user
    User,

    /// Synthesized or model-generated reply
    Assistant,
}

impl MessageRole {
    /// Converts the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Message model representing one entry in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,

    /// Parent conversation
    pub conversation_id: Uuid,

    /// Conversation owner (assistant replies use the same user_id)
    pub user_id: Uuid,

    /// Who authored the message
    pub role: MessageRole,

    /// Message text
    pub content: String,

    /// When the message was appended
    pub created_at: DateTime<Utc>,
}

impl Owned for Message {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Message {
    /// Appends a message to a conversation
    ///
    /// Messages are never mutated or deleted afterwards.
    pub async fn create(
        pool: &PgPool,
        conversation_id: Uuid,
        user_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, user_id, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, user_id, role, content, created_at
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .bind(role)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Lists a conversation's messages, oldest first
    pub async fn list_by_conversation(
        pool: &PgPool,
        conversation_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, user_id, role, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    }
}
