/// Task model and database operations
///
/// This module provides the Task model representing a user's todo items.
/// Tasks are owned exclusively by one user, carry a priority and a free-text
/// status, and are mutated via partial updates that only touch supplied
/// fields. `updated_at` is refreshed on every mutation.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     due_date TIMESTAMPTZ,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskchat_shared::models::task::{CreateTask, Task, TaskPriority};
/// use taskchat_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, Uuid::new_v4(), CreateTask {
///     title: "Buy milk".to_string(),
///     description: None,
///     completed: false,
///     due_date: None,
///     priority: Some(TaskPriority::High),
/// }).await?;
///
/// Task::set_completed(&pool, task.id, true).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::owned::Owned;

/// Task priority level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority (the default when omitted)
    #[default]
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Converts the priority to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task model representing a single todo item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// User who owns this task
    pub user_id: Uuid,

    /// Task title (required, non-empty)
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Whether the task is completed
    pub completed: bool,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Priority level
    pub priority: TaskPriority,

    /// Free-text status (defaults to "pending")
    pub status: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for Task {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Initial completion state
    #[serde(default)]
    pub completed: bool,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    /// Priority (defaults to medium when omitted)
    #[serde(default)]
    pub priority: Option<TaskPriority>,
}

/// Input for partially updating a task
///
/// Only fields that are `Some` are applied; `updated_at` is refreshed
/// regardless of which fields changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New completion state
    pub completed: Option<bool>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New status text
    pub status: Option<String>,
}

/// Column list shared by all task queries
const TASK_COLUMNS: &str = "id, user_id, title, description, completed, due_date, \
                            priority, status, created_at, updated_at";

impl Task {
    /// Creates a new task owned by `user_id`
    ///
    /// Priority defaults to medium when omitted. Title validation (non-empty)
    /// happens at the API boundary, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, completed, due_date, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .bind(data.due_date)
        .bind(data.priority.unwrap_or_default())
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    ///
    /// Callers must pass the result through the ownership guard before
    /// returning it; prefer [`Task::find_owned`] in API handlers.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, filtered through the ownership guard
    ///
    /// Returns `None` both when the task does not exist and when it belongs
    /// to a different user.
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = Self::find_by_id(pool, id).await?;
        Ok(super::owned::owned_by(task, user_id))
    }

    /// Lists all tasks owned by a user (storage order)
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update to a task
    ///
    /// Only fields present in `data` are written. `updated_at` is always set
    /// to NOW(), even for an empty update.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Sets the completion flag, independent of the general update path
    ///
    /// Also refreshes `updated_at`.
    pub async fn set_completed(
        pool: &PgPool,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET completed = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Returns true when a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_create_task_priority_omitted_in_json() {
        let data: CreateTask = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();

        assert_eq!(data.title, "Buy milk");
        assert_eq!(data.priority, None);
        assert!(!data.completed);
        assert_eq!(data.priority.unwrap_or_default(), TaskPriority::Medium);
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let data = UpdateTask::default();

        assert!(data.title.is_none());
        assert!(data.description.is_none());
        assert!(data.completed.is_none());
        assert!(data.due_date.is_none());
        assert!(data.priority.is_none());
        assert!(data.status.is_none());
    }
}
