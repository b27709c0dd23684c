/// Authentication utilities
///
/// This module provides the building blocks for user authentication:
///
/// - `jwt`: Token generation and validation (HS256)
/// - `password`: Argon2id password hashing and verification

pub mod jwt;
pub mod password;

pub use jwt::{create_token, validate_token, Claims, JwtError};
pub use password::{hash_password, verify_password, PasswordError};
