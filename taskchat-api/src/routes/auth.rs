/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (creates the account and issues a token)
/// - Login (verifies credentials and issues a token)
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a token
///
/// Tokens are 30-minute HS256 JWTs carrying the user id as subject. Both
/// endpoints respond with `{"access_token": "...", "token_type": "bearer"}`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskchat_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token response shared by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token (30 minutes)
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Flattens validator errors into a single detail string
fn validation_detail(errors: validator::ValidationErrors) -> ApiError {
    let detail = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string())
                )
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    ApiError::BadRequest(detail)
}

/// Register a new user
///
/// Creates the account (email must not already exist — the match is exact
/// and case-sensitive) and issues a signed, time-limited token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "name": "Jordan"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_detail)?;

    // Case-sensitive exact match, like the clients expect
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.clone(),
            password_hash,
            name: Some(req.name),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Registered new user");

    let claims = jwt::Claims::new(user.id, &user.email);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Login endpoint
///
/// Verifies the password against the stored Argon2id hash and issues a
/// token. Unknown email and wrong password produce the same 401 so the
/// response doesn't reveal which accounts exist.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_detail)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let claims = jwt::Claims::new(user.id, &user.email);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse::bearer(access_token)))
}
