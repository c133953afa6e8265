//! Axum route handlers for registration and login.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

const INVALID_LOGIN: &str = "Invalid email or password";

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let email = normalize_email(&creds.email);
    if email.is_empty() || creds.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }

    let password_hash = hash_password(creds.password).await?;
    let user = state.users.create(&email, &password_hash).await?;
    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// POST /login
///
/// Unknown email and wrong password produce the same error.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&creds.email);
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Validation(INVALID_LOGIN.to_string()))?;

    if !verify_password(creds.password, user.password_hash.clone()).await? {
        return Err(AppError::Validation(INVALID_LOGIN.to_string()));
    }

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Illinois.EDU "), "ada@illinois.edu");
    }
}
