//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::user::{ProfileAttributes, UserProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: UserProfile,
}

/// GET /profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let row = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(row.into()))
}

/// PUT /profile
///
/// Replaces all ten editable attributes; omitted fields are cleared.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(attrs): Json<ProfileAttributes>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    info!("Updating profile for user {}", user.user_id);

    let row = state
        .users
        .update_attributes(user.user_id, &attrs)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: row.into(),
    }))
}
