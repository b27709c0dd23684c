/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task CRUD endpoints
/// - `conversations`: Conversation endpoints and the chat intent router

pub mod auth;
pub mod conversations;
pub mod health;
pub mod tasks;
