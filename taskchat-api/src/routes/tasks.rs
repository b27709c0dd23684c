/// Task CRUD endpoints
///
/// All routes here sit behind the JWT layer, so handlers receive the caller
/// identity as an `Extension<AuthUser>`. Every lookup goes through
/// `Task::find_owned`, which makes a task owned by another user look exactly
/// like one that doesn't exist (404 either way).
///
/// # Endpoints
///
/// - `GET    /api/v1/tasks` - List the caller's tasks
/// - `POST   /api/v1/tasks` - Create a task
/// - `GET    /api/v1/tasks/:id` - Fetch one task
/// - `PATCH  /api/v1/tasks/:id` - Partial update
/// - `DELETE /api/v1/tasks/:id` - Delete, returning a snapshot
/// - `PUT    /api/v1/tasks/:id/complete` - Set the completion flag

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskchat_shared::models::task::{CreateTask, Task, UpdateTask};
use uuid::Uuid;

/// Request body for `PUT /tasks/:id/complete`
#[derive(Debug, Deserialize)]
pub struct SetCompletionRequest {
    /// Desired completion state
    pub complete: bool,
}

/// Response for `DELETE /tasks/:id`
///
/// Includes a snapshot of the deleted task so clients can show an undo-style
/// confirmation without a second round trip.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub message: String,
    pub deleted_task: DeletedTask,
}

/// Minimal snapshot of a task that no longer exists
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedTask {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Lists all tasks owned by the caller
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(tasks))
}

/// Creates a new task
///
/// # Errors
///
/// - `400 Bad Request`: Empty or whitespace-only title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTask>,
) -> ApiResult<Json<Task>> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Task title is required".to_string()));
    }

    let task = Task::create(&state.db, auth.user_id, req).await?;

    tracing::info!(task_id = %task.id, user_id = %auth.user_id, "Created task");

    Ok(Json(task))
}

/// Fetches a single task
///
/// # Errors
///
/// - `404 Not Found`: Task absent or owned by another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Applies a partial update to a task
///
/// Only fields present in the body are written. An empty body is accepted
/// and still refreshes `updated_at`.
///
/// # Errors
///
/// - `400 Bad Request`: Title present but empty
/// - `404 Not Found`: Task absent or owned by another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("Task title is required".to_string()));
        }
    }

    // Ownership check before the write so the update can't touch another
    // user's row
    Task::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task, returning a snapshot of what was removed
///
/// # Errors
///
/// - `404 Not Found`: Task absent or owned by another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let task = Task::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Task::delete(&state.db, id).await?;

    tracing::info!(task_id = %id, user_id = %auth.user_id, "Deleted task");

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
        deleted_task: DeletedTask {
            id: task.id,
            title: task.title,
            description: task.description,
        },
    }))
}

/// Sets the completion flag on a task
///
/// Idempotent: setting an already-completed task to complete is a no-op
/// apart from refreshing `updated_at`.
///
/// # Errors
///
/// - `404 Not Found`: Task absent or owned by another user
pub async fn set_task_completion(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetCompletionRequest>,
) -> ApiResult<Json<Task>> {
    Task::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::set_completed(&state.db, id, req.complete)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}
