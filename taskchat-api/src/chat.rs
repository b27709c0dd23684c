/// External chat collaborator client
///
/// When no task intent matches an inbound message, the conversation router
/// defers to a hosted text-completion service: send the latest message plus
/// the prior transcript, receive a reply. The service is opaque — callers
/// never see its errors, because the router substitutes a fixed apology on
/// any failure.
///
/// # Providers
///
/// - [`CohereChat`]: Production client for the Cohere v1 chat API
/// - [`MockChat`]: Deterministic canned replies for tests and demos
///
/// # Example
///
/// ```
/// use taskchat_api::chat::{ChatProvider, ChatTurn, MockChat};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = MockChat::new("Happy to help!");
/// let reply = provider.reply("hello", &[]).await?;
/// assert_eq!(reply, "Happy to help!");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// System preamble sent with every fallback completion
const PREAMBLE: &str = "You are an AI assistant helping users manage their tasks. \
    Respond to their queries about tasks, help them create tasks, update tasks, \
    or provide other assistance related to task management.";

/// Error type for chat collaborator calls
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Transport-level failure (connection, timeout, TLS)
    #[error("Chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Chat service returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,

        /// Response body, for server-side logging only
        body: String,
    },
}

/// Speaker role in a transcript turn
///
/// Uses the wire names the Cohere chat API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatRole {
    /// The human user
    User,

    /// The assistant
    Chatbot,
}

/// One prior turn of a conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke
    pub role: ChatRole,

    /// What they said
    pub message: String,
}

/// An opaque text-completion collaborator
///
/// Implementations take the latest message plus the rolling history
/// (oldest first, excluding the latest message) and return a reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generates a reply to `message` given the prior transcript
    async fn reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError>;
}

/// Request body for the Cohere v1 chat endpoint
#[derive(Debug, Serialize)]
struct CohereRequest<'a> {
    message: &'a str,

    preamble: &'a str,

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    chat_history: &'a [ChatTurn],
}

/// Response body from the Cohere v1 chat endpoint
#[derive(Debug, Deserialize)]
struct CohereResponse {
    text: String,
}

/// Production chat provider backed by the Cohere chat API
pub struct CohereChat {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl CohereChat {
    /// Creates a client for the given endpoint and API key
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for CohereChat {
    async fn reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError> {
        let request = CohereRequest {
            message,
            preamble: PREAMBLE,
            chat_history: history,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CohereResponse = response.json().await?;

        Ok(parsed.text)
    }
}

/// Deterministic chat provider for tests and demos
///
/// Returns the configured reply for every message, or fails every call
/// when constructed with [`MockChat::failing`] — useful for exercising the
/// router's apology fallback.
pub struct MockChat {
    reply: Option<String>,
}

impl MockChat {
    /// Creates a provider that always returns `reply`
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }

    /// Creates a provider that fails every call
    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn reply(&self, _message: &str, _history: &[ChatTurn]) -> Result<String, ChatError> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ChatError::Api {
                status: 503,
                body: "mock provider configured to fail".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_chat_replies() {
        let provider = MockChat::new("canned reply");
        let reply = provider.reply("anything", &[]).await.unwrap();
        assert_eq!(reply, "canned reply");
    }

    #[tokio::test]
    async fn test_mock_chat_failing() {
        let provider = MockChat::failing();
        let result = provider.reply("anything", &[]).await;
        assert!(matches!(result, Err(ChatError::Api { status: 503, .. })));
    }

    #[test]
    fn test_request_serialization_omits_empty_history() {
        let request = CohereRequest {
            message: "hello",
            preamble: PREAMBLE,
            chat_history: &[],
        };
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("chat_history").is_none());
        assert_eq!(json["message"], "hello");
    }

    #[test]
    fn test_chat_roles_use_wire_names() {
        let turn = ChatTurn {
            role: ChatRole::Chatbot,
            message: "hi".to_string(),
        };
        let json = serde_json::to_value(&turn).unwrap();

        assert_eq!(json["role"], "CHATBOT");
    }
}
