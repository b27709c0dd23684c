//! # Taskchat Shared Library
//!
//! This crate contains shared types and business logic used by the taskchat
//! API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: JWT tokens and password hashing
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the taskchat shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
