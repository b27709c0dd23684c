//! # Taskchat API Server Library
//!
//! This library provides the core functionality for the taskchat API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `chat`: External chat collaborator (Cohere) client
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `intent`: Keyword/regex intent classification for chat messages
//! - `routes`: API route handlers

pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod intent;
pub mod routes;
