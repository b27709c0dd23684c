/// Database models and operations
///
/// This module contains the core entities of the taskchat system:
///
/// - `user`: User accounts (auth and ownership anchor)
/// - `task`: Per-user todo tasks with priority and completion lifecycle
/// - `conversation`: Per-user chat threads
/// - `message`: Ordered messages within a conversation
/// - `owned`: The generic ownership guard shared by all owned resources

pub mod conversation;
pub mod message;
pub mod owned;
pub mod task;
pub mod user;

pub use conversation::Conversation;
pub use message::{Message, MessageRole};
pub use owned::{owned_by, Owned};
pub use task::{Task, TaskPriority};
pub use user::User;
