/// Conversation and chatbot endpoints
///
/// Conversations hold an ordered message transcript. Two endpoints run a
/// full chat turn (`initiate` and `messages`): the inbound text goes through
/// the intent classifier and either executes a task operation with a
/// templated confirmation, or falls through to the external chat
/// collaborator. Both share [`run_chat_turn`] so the two entry points can
/// never drift apart.
///
/// # Endpoints
///
/// - `GET  /api/v1/conversations` - List the caller's conversations
/// - `POST /api/v1/conversations` - Create an empty conversation
/// - `GET  /api/v1/conversations/:id` - Fetch one with its transcript
/// - `POST /api/v1/conversations/initiate` - Start a conversation with a
///   first message and get the assistant reply
/// - `POST /api/v1/conversations/:id/messages` - Append a message and get
///   the assistant reply

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
    intent::{infer_update, Intent},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskchat_shared::models::{
    conversation::Conversation,
    message::{Message, MessageRole},
    task::{CreateTask, Task, UpdateTask},
};
use uuid::Uuid;

/// Conversation titles derive from the first message, truncated to this
/// many characters (plus an ellipsis)
const TITLE_MAX_CHARS: usize = 50;

/// Reply when the external collaborator fails
const APOLOGY_REPLY: &str =
    "I'm sorry, I encountered an error processing your request. Could you please try again?";

/// Request body for `POST /conversations`
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    /// Optional title; chat turns derive one from the first message
    pub title: Option<String>,
}

/// Request body for `initiate` and `messages`: just the text
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub content: String,
}

/// A conversation together with its full transcript
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationWithMessages {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Result of one chat turn: the stored user message, the stored assistant
/// reply, and (for task operations) the refreshed task list
///
/// `conversation_id` is only present on `initiate` responses, where the
/// client doesn't know the id yet.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<Uuid>,
    pub user_message: Message,
    pub ai_response: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_tasks: Option<Vec<Task>>,
}

/// Lists the caller's conversations, most recently active first
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Conversation>>> {
    let conversations = Conversation::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(conversations))
}

/// Creates an empty conversation
pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<Json<Conversation>> {
    let conversation = Conversation::create(&state.db, auth.user_id, req.title).await?;

    tracing::info!(
        conversation_id = %conversation.id,
        user_id = %auth.user_id,
        "Created conversation"
    );

    Ok(Json(conversation))
}

/// Fetches a conversation with its transcript in chronological order
///
/// # Errors
///
/// - `404 Not Found`: Conversation absent or owned by another user
pub async fn get_conversation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConversationWithMessages>> {
    let conversation = Conversation::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

    let messages = Message::list_by_conversation(&state.db, id).await?;

    Ok(Json(ConversationWithMessages {
        conversation,
        messages,
    }))
}

/// Starts a conversation with a first message and runs a chat turn
///
/// The conversation title is derived from the message content, truncated
/// to 50 characters.
pub async fn initiate_conversation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ChatMessageRequest>,
) -> ApiResult<Json<ChatTurnResponse>> {
    let title = derive_title(&req.content);
    let conversation = Conversation::create(&state.db, auth.user_id, Some(title)).await?;

    tracing::info!(
        conversation_id = %conversation.id,
        user_id = %auth.user_id,
        "Initiated conversation"
    );

    let mut response = run_chat_turn(&state, auth.user_id, conversation.id, &req.content).await?;
    response.conversation_id = Some(conversation.id);

    Ok(Json(response))
}

/// Appends a message to an existing conversation and runs a chat turn
///
/// # Errors
///
/// - `404 Not Found`: Conversation absent or owned by another user
pub async fn add_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatMessageRequest>,
) -> ApiResult<Json<ChatTurnResponse>> {
    Conversation::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

    let response = run_chat_turn(&state, auth.user_id, id, &req.content).await?;

    Ok(Json(response))
}

/// Truncates the first message into a conversation title
fn derive_title(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        content.to_string()
    }
}

/// Runs one full chat turn against a conversation
///
/// Stores the user message, classifies it, executes the matched task
/// operation (or defers to the chat collaborator), stores the assistant
/// reply, and bumps the conversation's `updated_at`. Task operations return
/// the refreshed task list so clients can re-render without another fetch;
/// not-found outcomes return no list.
async fn run_chat_turn(
    state: &AppState,
    user_id: Uuid,
    conversation_id: Uuid,
    content: &str,
) -> ApiResult<ChatTurnResponse> {
    // Transcript before this turn, needed for the free-form chat branch
    let prior_messages = Message::list_by_conversation(&state.db, conversation_id).await?;

    let user_message =
        Message::create(&state.db, conversation_id, user_id, MessageRole::User, content).await?;

    let (reply, include_tasks) = match Intent::classify(content) {
        Intent::CreateTask { title, description } => {
            let task = Task::create(
                &state.db,
                user_id,
                CreateTask {
                    title,
                    description,
                    completed: false,
                    due_date: None,
                    priority: None,
                },
            )
            .await?;

            tracing::info!(task_id = %task.id, user_id = %user_id, "Chat created task");

            (
                format!("I've created the task '{}' for you successfully!", task.title),
                true,
            )
        }

        Intent::ListTasks => {
            let tasks = Task::list_by_user(&state.db, user_id).await?;

            let reply = if tasks.is_empty() {
                "You don't have any tasks yet.".to_string()
            } else {
                let lines = tasks
                    .iter()
                    .map(|task| {
                        let status = if task.completed { "(Completed)" } else { "(Pending)" };
                        format!("- {} {}", task.title, status)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Here are your tasks:\n{}", lines)
            };

            (reply, true)
        }

        Intent::UpdateTask { identifier, clause } => {
            match resolve_task(state, user_id, &identifier).await? {
                Some(task) => {
                    let update = infer_update(&clause);
                    let updated = Task::update(&state.db, task.id, update)
                        .await?
                        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

                    tracing::info!(task_id = %updated.id, user_id = %user_id, "Chat updated task");

                    (
                        format!(
                            "I've updated the task '{}' for you successfully!",
                            updated.title
                        ),
                        true,
                    )
                }
                None => (not_found_reply(&identifier), false),
            }
        }

        Intent::CompleteTask { identifier } => {
            match resolve_task(state, user_id, &identifier).await? {
                Some(task) => {
                    let updated = Task::update(
                        &state.db,
                        task.id,
                        UpdateTask {
                            completed: Some(true),
                            ..UpdateTask::default()
                        },
                    )
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

                    tracing::info!(task_id = %updated.id, user_id = %user_id, "Chat completed task");

                    (
                        format!("I've marked the task '{}' as completed!", updated.title),
                        true,
                    )
                }
                None => (not_found_reply(&identifier), false),
            }
        }

        Intent::DeleteTask { identifier } => {
            match resolve_task(state, user_id, &identifier).await? {
                Some(task) => {
                    Task::delete(&state.db, task.id).await?;

                    tracing::info!(task_id = %task.id, user_id = %user_id, "Chat deleted task");

                    (
                        format!("I've deleted the task '{}' successfully!", task.title),
                        true,
                    )
                }
                None => (not_found_reply(&identifier), false),
            }
        }

        Intent::Chat => {
            let history = transcript_to_turns(&prior_messages);

            let reply = match state.chat.reply(content, &history).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!(error = %err, "Chat collaborator call failed");
                    APOLOGY_REPLY.to_string()
                }
            };

            (reply, true)
        }
    };

    let ai_response = Message::create(
        &state.db,
        conversation_id,
        user_id,
        MessageRole::Assistant,
        &reply,
    )
    .await?;

    // Activity bump is best-effort, a failure must not lose the turn
    if let Err(err) = Conversation::touch(&state.db, conversation_id).await {
        tracing::warn!(
            conversation_id = %conversation_id,
            error = %err,
            "Could not update conversation timestamp"
        );
    }

    let updated_tasks = if include_tasks {
        Some(Task::list_by_user(&state.db, user_id).await?)
    } else {
        None
    };

    Ok(ChatTurnResponse {
        conversation_id: None,
        user_message,
        ai_response,
        updated_tasks,
    })
}

/// Resolves a chat identifier to one of the caller's tasks
///
/// Tried as a UUID first; otherwise the first task whose title contains the
/// identifier (case-insensitive) wins. Ownership applies in both paths.
async fn resolve_task(
    state: &AppState,
    user_id: Uuid,
    identifier: &str,
) -> Result<Option<Task>, ApiError> {
    if let Ok(id) = Uuid::parse_str(identifier) {
        if let Some(task) = Task::find_owned(&state.db, id, user_id).await? {
            return Ok(Some(task));
        }
    }

    let needle = identifier.to_lowercase();
    let tasks = Task::list_by_user(&state.db, user_id).await?;

    Ok(tasks
        .into_iter()
        .find(|task| task.title.to_lowercase().contains(&needle)))
}

fn not_found_reply(identifier: &str) -> String {
    format!(
        "Sorry, I couldn't find a task with ID or title '{}'.",
        identifier
    )
}

/// Converts stored messages into the collaborator's turn format
fn transcript_to_turns(messages: &[Message]) -> Vec<crate::chat::ChatTurn> {
    messages
        .iter()
        .map(|message| crate::chat::ChatTurn {
            role: match message.role {
                MessageRole::User => crate::chat::ChatRole::User,
                MessageRole::Assistant => crate::chat::ChatRole::Chatbot,
            },
            message: message.content.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short_message() {
        assert_eq!(derive_title("add task: Buy milk"), "add task: Buy milk");
    }

    #[test]
    fn test_derive_title_truncates_long_message() {
        let long = "a".repeat(80);
        let title = derive_title(&long);

        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_derive_title_exact_boundary_untouched() {
        let exact = "b".repeat(TITLE_MAX_CHARS);
        assert_eq!(derive_title(&exact), exact);
    }

    #[test]
    fn test_not_found_reply_format() {
        assert_eq!(
            not_found_reply("doesnotexist"),
            "Sorry, I couldn't find a task with ID or title 'doesnotexist'."
        );
    }
}
