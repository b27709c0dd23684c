/// Keyword/regex intent classification for chat messages
///
/// The chatbot layer inspects each inbound message and decides whether it
/// is a task operation or free-form chat. Classification is an ordered list
/// of (keyword predicate, extractor) pairs evaluated in a single pass —
/// first match wins. A branch whose keywords match but whose extractor
/// fails to capture falls through to [`Intent::Chat`], mirroring the
/// behavior users already rely on.
///
/// # Match order
///
/// 1. Create: "add task" / "create task" / "new task"
/// 2. List: "show my tasks" / "list tasks" / "view tasks" / "my tasks"
/// 3. Update: "update task" / "change task" / "modify task"
/// 4. Complete: "complete task" / "finish task" / "done task" / "mark task"
/// 5. Delete: "delete task" / "remove task"
/// 6. Chat fallback
///
/// # Example
///
/// ```
/// use taskchat_api::intent::Intent;
///
/// match Intent::classify("add task: Buy milk") {
///     Intent::CreateTask { title, .. } => assert_eq!(title, "Buy milk"),
///     other => panic!("unexpected intent: {:?}", other),
/// }
/// ```

use regex::Regex;
use std::sync::LazyLock;
use taskchat_shared::models::task::UpdateTask;

static CREATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:add|create|new) task[:\-]?\s*(.+?)(?:\s+with\s+description\s+(.+))?$")
        .expect("create-task pattern is valid")
});

static UPDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:update|change|modify)\s+task\s+([\w-]+)(?:\s+to\s+(.+?))?(?:\s+and\s+(.+))?$")
        .expect("update-task pattern is valid")
});

static COMPLETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:complete|finish|done|mark)\s+task\s+([\w-]+)")
        .expect("complete-task pattern is valid")
});

static DELETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:delete|remove)\s+task\s+([\w-]+)").expect("delete-task pattern is valid")
});

static TITLE_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)title\s+to\s+(.+)$").expect("title clause pattern is valid"));

static DESCRIPTION_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)description\s+to\s+(.+)$").expect("description clause pattern is valid")
});

/// The classified purpose behind a free-text chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a new task
    CreateTask {
        /// Extracted task title
        title: String,

        /// Optional "with description ..." suffix
        description: Option<String>,
    },

    /// Enumerate the caller's tasks
    ListTasks,

    /// Update a task identified by ID or title substring
    UpdateTask {
        /// Raw identifier token (tried as UUID, then as title substring)
        identifier: String,

        /// Free-text update clause ("to ..." and "and ..." parts joined)
        clause: String,
    },

    /// Mark a task as completed
    CompleteTask {
        /// Raw identifier token
        identifier: String,
    },

    /// Delete a task
    DeleteTask {
        /// Raw identifier token
        identifier: String,
    },

    /// No task intent matched; defer to the external chat collaborator
    Chat,
}

impl Intent {
    /// Classifies a message, first keyword match wins
    pub fn classify(content: &str) -> Intent {
        let lower = content.to_lowercase();

        let contains_any =
            |keywords: &[&str]| keywords.iter().any(|keyword| lower.contains(keyword));

        if contains_any(&["add task", "create task", "new task"]) {
            if let Some(caps) = CREATE_RE.captures(content) {
                let title = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                if !title.is_empty() {
                    return Intent::CreateTask {
                        title,
                        description: caps.get(2).map(|m| m.as_str().trim().to_string()),
                    };
                }
            }
            // Extractor failed: fall through to chat
            return Intent::Chat;
        }

        if contains_any(&["show my tasks", "list tasks", "view tasks", "my tasks"]) {
            return Intent::ListTasks;
        }

        if contains_any(&["update task", "change task", "modify task"]) {
            if let Some(caps) = UPDATE_RE.captures(content) {
                let identifier = caps[1].to_string();

                let clause = [caps.get(2), caps.get(3)]
                    .into_iter()
                    .flatten()
                    .map(|m| m.as_str().trim())
                    .collect::<Vec<_>>()
                    .join(" ");

                return Intent::UpdateTask { identifier, clause };
            }
            return Intent::Chat;
        }

        if contains_any(&["complete task", "finish task", "done task", "mark task"]) {
            if let Some(caps) = COMPLETE_RE.captures(content) {
                return Intent::CompleteTask {
                    identifier: caps[1].to_string(),
                };
            }
            return Intent::Chat;
        }

        if contains_any(&["delete task", "remove task"]) {
            if let Some(caps) = DELETE_RE.captures(content) {
                return Intent::DeleteTask {
                    identifier: caps[1].to_string(),
                };
            }
            return Intent::Chat;
        }

        Intent::Chat
    }
}

/// Infers which single field an update clause targets
///
/// The chain is mutually exclusive: completion keywords win over "title to
/// ...", which wins over "description to ...". At most one field of the
/// returned update is set; a clause mentioning none of the keywords yields
/// an empty update (which still refreshes the task's `updated_at`).
///
/// "incomplete"/"pending" are checked before "complete"/"done" so that
/// "mark it incomplete" flips the flag off rather than on.
pub fn infer_update(clause: &str) -> UpdateTask {
    let lower = clause.to_lowercase();
    let mut update = UpdateTask::default();

    if lower.contains("incomplete") || lower.contains("pending") {
        update.completed = Some(false);
    } else if lower.contains("complete") || lower.contains("done") {
        update.completed = Some(true);
    } else if lower.contains("title") {
        if let Some(caps) = TITLE_CLAUSE_RE.captures(clause) {
            update.title = Some(caps[1].trim().to_string());
        }
    } else if lower.contains("description") {
        if let Some(caps) = DESCRIPTION_CLAUSE_RE.captures(clause) {
            update.description = Some(caps[1].trim().to_string());
        }
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_with_colon() {
        let intent = Intent::classify("add task: Buy milk");
        assert_eq!(
            intent,
            Intent::CreateTask {
                title: "Buy milk".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn test_create_with_dash_and_description() {
        let intent = Intent::classify("create task- Call mom with description ask about dinner");
        assert_eq!(
            intent,
            Intent::CreateTask {
                title: "Call mom".to_string(),
                description: Some("ask about dinner".to_string()),
            }
        );
    }

    #[test]
    fn test_create_without_separator() {
        let intent = Intent::classify("new task water the plants");
        assert_eq!(
            intent,
            Intent::CreateTask {
                title: "water the plants".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn test_create_without_title_falls_through() {
        assert_eq!(Intent::classify("add task"), Intent::Chat);
        assert_eq!(Intent::classify("add task:   "), Intent::Chat);
    }

    #[test]
    fn test_list_keywords() {
        assert_eq!(Intent::classify("show my tasks"), Intent::ListTasks);
        assert_eq!(Intent::classify("please list tasks"), Intent::ListTasks);
        assert_eq!(Intent::classify("view tasks now"), Intent::ListTasks);
        assert_eq!(Intent::classify("what are my tasks?"), Intent::ListTasks);
    }

    #[test]
    fn test_update_with_clause() {
        let intent = Intent::classify("update task groceries to title to Buy groceries");
        assert_eq!(
            intent,
            Intent::UpdateTask {
                identifier: "groceries".to_string(),
                clause: "title to Buy groceries".to_string(),
            }
        );
    }

    #[test]
    fn test_update_without_clause() {
        let intent = Intent::classify("change task report");
        assert_eq!(
            intent,
            Intent::UpdateTask {
                identifier: "report".to_string(),
                clause: String::new(),
            }
        );
    }

    #[test]
    fn test_update_identifier_accepts_uuid() {
        let intent =
            Intent::classify("modify task 0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9 to mark it done");
        assert_eq!(
            intent,
            Intent::UpdateTask {
                identifier: "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9".to_string(),
                clause: "mark it done".to_string(),
            }
        );
    }

    #[test]
    fn test_complete_keywords() {
        let intent = Intent::classify("complete task groceries");
        assert_eq!(
            intent,
            Intent::CompleteTask {
                identifier: "groceries".to_string(),
            }
        );

        let intent = Intent::classify("mark task report");
        assert_eq!(
            intent,
            Intent::CompleteTask {
                identifier: "report".to_string(),
            }
        );
    }

    #[test]
    fn test_delete_keywords() {
        let intent = Intent::classify("delete task doesnotexist");
        assert_eq!(
            intent,
            Intent::DeleteTask {
                identifier: "doesnotexist".to_string(),
            }
        );

        let intent = Intent::classify("remove task groceries");
        assert_eq!(
            intent,
            Intent::DeleteTask {
                identifier: "groceries".to_string(),
            }
        );
    }

    #[test]
    fn test_create_wins_over_list() {
        // First match wins: message mentions both create and list keywords
        let intent = Intent::classify("add task: review my tasks");
        assert!(matches!(intent, Intent::CreateTask { .. }));
    }

    #[test]
    fn test_free_form_is_chat() {
        assert_eq!(Intent::classify("how was your day?"), Intent::Chat);
        assert_eq!(Intent::classify("tell me a joke"), Intent::Chat);
    }

    #[test]
    fn test_infer_update_completion() {
        let update = infer_update("mark it complete");
        assert_eq!(update.completed, Some(true));
        assert!(update.title.is_none());

        let update = infer_update("it is done");
        assert_eq!(update.completed, Some(true));
    }

    #[test]
    fn test_infer_update_incomplete_before_complete() {
        let update = infer_update("set it incomplete");
        assert_eq!(update.completed, Some(false));

        let update = infer_update("back to pending");
        assert_eq!(update.completed, Some(false));
    }

    #[test]
    fn test_infer_update_title() {
        let update = infer_update("title to Buy groceries");
        assert_eq!(update.title, Some("Buy groceries".to_string()));
        assert!(update.completed.is_none());
    }

    #[test]
    fn test_infer_update_description() {
        let update = infer_update("description to pick up after work");
        assert_eq!(update.description, Some("pick up after work".to_string()));
    }

    #[test]
    fn test_infer_update_completion_wins_over_title() {
        // Mutually exclusive chain: completion keyword beats title keyword
        let update = infer_update("title to Done deal, mark complete");
        assert_eq!(update.completed, Some(true));
        assert!(update.title.is_none());
    }

    #[test]
    fn test_infer_update_empty_clause() {
        let update = infer_update("");
        assert!(update.completed.is_none());
        assert!(update.title.is_none());
        assert!(update.description.is_none());
    }
}
